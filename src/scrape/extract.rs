//! HTML extraction for rendered tool detail pages.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use super::config::SectionHeadings;
use crate::models::{PricingTier, Ratings, ScrapedToolData};
use crate::utils::normalize_whitespace;
use crate::verify::VideoRef;

static META_DESCRIPTION: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"meta[property="og:description"], meta[name="description"]"#).unwrap()
});
static OG_IMAGE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[property="og:image"]"#).unwrap());
static TWITTER_IMAGE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[name="twitter:image"]"#).unwrap());
static IMG: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img").unwrap());
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());
static YOUTUBE_IFRAME: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"iframe[src*="youtube.com"], iframe[src*="youtu.be"]"#).unwrap()
});
static VIDEO_SOURCE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("video source, video").unwrap());
static YOUTUBE_ANCHOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"a[href*="youtube.com"], a[href*="youtu.be"]"#).unwrap()
});
static SECTION_HEADING: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1, h2, h3, h4").unwrap());
static MAJOR_HEADING: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1, h2, h3").unwrap());
static LIST_ITEM: LazyLock<Selector> = LazyLock::new(|| Selector::parse("li").unwrap());

static EMBED_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/embed/([a-zA-Z0-9_-]{11})").unwrap());
static TIER_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([^:]+):\s*(.+)").unwrap());
static TIER_PRICE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\$[\d.]+(?:/\w+)?|free").unwrap());
static RATING_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^:]+):\s*([\d.]+)/5").unwrap());

/// Hosts that never count as the tool's own site.
const NON_OFFICIAL_HOSTS: &[&str] = &["futurepedia.io", "youtube.com", "twitter.com", "linkedin.com"];

/// Extract every field of a detail page rendered from `page_url`.
pub fn extract_tool_data(
    html: &str,
    tool_name: &str,
    page_url: &str,
    headings: &SectionHeadings,
) -> ScrapedToolData {
    let document = Html::parse_document(html);

    let pricing_items = extract_list(&document, &headings.pricing);
    let rating_items = extract_list(&document, &headings.how_we_rated);
    let who_is_using = extract_list(&document, &headings.who_is_using);

    let uncommon: Vec<String> = who_is_using
        .iter()
        .filter(|item| item.to_lowercase().contains("uncommon"))
        .cloned()
        .collect();

    ScrapedToolData {
        name: tool_name.to_string(),
        description: meta_description(&document),
        website_url: official_link(&document, page_url),
        image_url: product_image(&document),
        video_url: embedded_video(&document),
        key_features: extract_list(&document, &headings.key_features),
        pros: extract_list(&document, &headings.pros),
        cons: extract_list(&document, &headings.cons),
        pricing_tiers: pricing_items
            .iter()
            .filter_map(|item| parse_pricing_tier(item))
            .collect(),
        what_makes_unique: extract_unique(
            &document,
            &headings.unique_prefix,
            &headings.unique_suffix,
        ),
        ratings: parse_ratings(&rating_items),
        uncommon_use_cases: (!uncommon.is_empty()).then_some(uncommon),
        who_is_using,
    }
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>()
}

fn meta_description(document: &Html) -> String {
    document
        .select(&META_DESCRIPTION)
        .next()
        .and_then(|el| el.value().attr("content"))
        .unwrap_or_default()
        .to_string()
}

fn meta_content(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .filter(|content| content.starts_with("http"))
        .map(str::to_string)
}

/// Open Graph image, then Twitter card, then the first logo-looking `<img>`.
fn product_image(document: &Html) -> Option<String> {
    meta_content(document, &OG_IMAGE)
        .or_else(|| meta_content(document, &TWITTER_IMAGE))
        .or_else(|| {
            document.select(&IMG).find_map(|img| {
                let src = img.value().attr("src").unwrap_or_default();
                let alt = img.value().attr("alt").unwrap_or_default().to_lowercase();
                let src_lower = src.to_lowercase();
                let looks_like_logo = alt.contains("logo")
                    || src_lower.contains("logo")
                    || src_lower.contains("icon");
                (looks_like_logo && src.starts_with("http")).then(|| src.to_string())
            })
        })
}

/// "Visit"/"official" link, else the first external non-social link, else the page itself.
fn official_link(document: &Html, page_url: &str) -> String {
    let anchors: Vec<(String, String, &str)> = document
        .select(&ANCHOR)
        .map(|a| {
            (
                text_of(a).to_lowercase(),
                a.value().attr("aria-label").unwrap_or_default().to_lowercase(),
                a.value().attr("href").unwrap_or_default(),
            )
        })
        .collect();

    let labelled = anchors.iter().find(|(text, label, href)| {
        let says_visit = ["visit", "official"]
            .iter()
            .any(|word| text.contains(word) || label.contains(word));
        says_visit && href.starts_with("http") && !href.contains("futurepedia.io")
    });
    if let Some((_, _, href)) = labelled {
        return href.to_string();
    }

    anchors
        .iter()
        .map(|(_, _, href)| *href)
        .find(|href| {
            href.starts_with("http") && !NON_OFFICIAL_HOSTS.iter().any(|host| href.contains(host))
        })
        .unwrap_or(page_url)
        .to_string()
}

/// YouTube video embedded or linked on the detail page.
fn embedded_video(document: &Html) -> Option<String> {
    if let Some(iframe) = document.select(&YOUTUBE_IFRAME).next() {
        let src = iframe.value().attr("src").unwrap_or_default();
        if let Some(caps) = EMBED_ID.captures(src) {
            return Some(VideoRef::youtube_watch_url(&caps[1]));
        }
    }

    if let Some(video) = document.select(&VIDEO_SOURCE).next() {
        if let Some(src) = video.value().attr("src") {
            if src.contains("youtube") {
                return Some(src.to_string());
            }
        }
    }

    document
        .select(&YOUTUBE_ANCHOR)
        .filter_map(|a| a.value().attr("href"))
        .find(|href| href.contains("/watch?v=") || href.contains("youtu.be/"))
        .map(str::to_string)
}

/// List items from every `<ul>`/`<ol>` between the first heading containing
/// `heading` and the next heading.
pub fn extract_list(document: &Html, heading: &str) -> Vec<String> {
    let Some(start) = document
        .select(&SECTION_HEADING)
        .find(|h| text_of(*h).contains(heading))
    else {
        return Vec::new();
    };

    let mut items = Vec::new();
    for sibling in start.next_siblings().filter_map(ElementRef::wrap) {
        let name = sibling.value().name();
        if matches!(name, "h1" | "h2" | "h3" | "h4") {
            break;
        }
        if matches!(name, "ul" | "ol") {
            items.extend(
                sibling
                    .select(&LIST_ITEM)
                    .map(|li| text_of(li).trim().to_string())
                    .filter(|text| !text.is_empty()),
            );
        }
    }
    items
}

/// Text following the "What Makes ... Unique" heading, up to the next major heading.
fn extract_unique(document: &Html, prefix: &str, suffix: &str) -> String {
    let Some(start) = document.select(&MAJOR_HEADING).find(|h| {
        let text = text_of(*h);
        text.contains(prefix) && text.contains(suffix)
    }) else {
        return String::new();
    };

    let mut parts = Vec::new();
    for sibling in start.next_siblings().filter_map(ElementRef::wrap) {
        if matches!(sibling.value().name(), "h1" | "h2" | "h3") {
            break;
        }
        parts.push(text_of(sibling));
    }
    normalize_whitespace(&parts.join(" "))
}

/// `"Pro: $20/month"` into a tier; lines without a price or "free" are dropped.
pub fn parse_pricing_tier(item: &str) -> Option<PricingTier> {
    let caps = TIER_LINE.captures(item)?;
    let price = TIER_PRICE.find(&caps[2])?;
    Some(PricingTier {
        name: caps[1].trim().to_string(),
        price: price.as_str().to_string(),
        features: None,
    })
}

/// Lowercased label with "and" and punctuation removed: "Ease of Use" -> "easeofuse".
fn rating_key(label: &str) -> String {
    label
        .split_whitespace()
        .filter(|word| !word.eq_ignore_ascii_case("and"))
        .flat_map(|word| word.chars())
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Parse "How We Rated" lines (`Category: 4.5/5`) into the fixed rating axes.
///
/// Scores outside 0 to 5 are dropped.
pub fn parse_ratings(items: &[String]) -> Option<Ratings> {
    let scores: HashMap<String, f32> = items
        .iter()
        .filter_map(|item| {
            let caps = RATING_LINE.captures(item)?;
            let score = caps[2]
                .parse::<f32>()
                .ok()
                .filter(|score| (0.0..=5.0).contains(score))?;
            Some((rating_key(&caps[1]), score))
        })
        .collect();

    let axis = |keys: &[&str]| keys.iter().find_map(|key| scores.get(*key).copied());

    let ratings = Ratings {
        accuracy_reliability: axis(&["accuracyreliability", "accuracy"]),
        ease_of_use: axis(&["easeofuse"]),
        functionality_features: axis(&["functionalityfeatures", "functionality"]),
        performance_speed: axis(&["performancespeed", "performance"]),
        customization_flexibility: axis(&["customizationflexibility", "customization"]),
        data_privacy_security: axis(&["dataprivacysecurity", "privacy"]),
        support_resources: axis(&["supportresources", "support"]),
        cost_efficiency: axis(&["costefficiency", "cost"]),
        integration_capabilities: axis(&["integrationcapabilities", "integration"]),
        overall_score: axis(&["overallscore", "overall"]),
    };

    (!ratings.is_empty()).then_some(ratings)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
<html><head>
  <meta property="og:description" content="Notion is an all-in-one workspace &amp; wiki.">
  <meta property="og:image" content="https://cdn.futurepedia.io/notion-og.png">
</head><body>
  <a href="/tools">Browse</a>
  <a href="https://twitter.com/notion">Twitter</a>
  <a href="https://www.notion.so/?ref=futurepedia" aria-label="Visit Notion website">Go</a>
  <iframe src="https://www.youtube.com/embed/oTahLEX3NXo?rel=0"></iframe>
  <h2>Notion Key Features</h2>
  <ul><li> Databases </li><li>Docs</li><li>   </li></ul>
  <p>More below</p>
  <ol><li>AI writing</li></ol>
  <h2>Pros</h2>
  <ul><li>Flexible</li></ul>
  <h2>Cons</h2>
  <ul><li>Learning curve</li></ul>
  <h2>Who is Using Notion?</h2>
  <ul><li>Students</li><li>Uncommon use: wedding planners</li></ul>
  <h2>Pricing</h2>
  <ul>
    <li>Free: $0</li>
    <li>Plus: $10/month billed yearly</li>
    <li>Enterprise: Contact sales</li>
    <li>No colon here</li>
  </ul>
  <h2>What Makes Notion Unique?</h2>
  <p>Blocks everywhere.</p>
  <div>Flexible   pages.</div>
  <h3>How We Rated It</h3>
  <ul>
    <li>Accuracy and Reliability: 4.5/5</li>
    <li>Ease of Use: 4.8/5</li>
    <li>Overall Score: 4.6/5</li>
    <li>Vibes: great</li>
  </ul>
</body></html>
"#;

    fn scrape(html: &str) -> ScrapedToolData {
        extract_tool_data(
            html,
            "Notion",
            "https://www.futurepedia.io/tool/notion",
            &SectionHeadings::default(),
        )
    }

    #[test]
    fn test_extracts_full_page() {
        let data = scrape(PAGE);

        assert_eq!(data.name, "Notion");
        assert_eq!(data.description, "Notion is an all-in-one workspace & wiki.");
        assert_eq!(data.website_url, "https://www.notion.so/?ref=futurepedia");
        assert_eq!(
            data.image_url.as_deref(),
            Some("https://cdn.futurepedia.io/notion-og.png")
        );
        assert_eq!(
            data.video_url.as_deref(),
            Some("https://www.youtube.com/watch?v=oTahLEX3NXo")
        );
        assert_eq!(data.key_features, vec!["Databases", "Docs", "AI writing"]);
        assert_eq!(data.pros, vec!["Flexible"]);
        assert_eq!(data.cons, vec!["Learning curve"]);
        assert_eq!(data.who_is_using.len(), 2);
        assert_eq!(
            data.uncommon_use_cases,
            Some(vec!["Uncommon use: wedding planners".to_string()])
        );
        assert_eq!(data.what_makes_unique, "Blocks everywhere. Flexible pages.");
    }

    #[test]
    fn test_pricing_drops_unpriced_tiers() {
        let data = scrape(PAGE);
        let tiers: Vec<(&str, &str)> = data
            .pricing_tiers
            .iter()
            .map(|t| (t.name.as_str(), t.price.as_str()))
            .collect();
        assert_eq!(tiers, vec![("Free", "$0"), ("Plus", "$10/month")]);
        assert!(data.pricing_tiers.iter().any(|t| t.is_free()));
    }

    #[test]
    fn test_parse_pricing_tier() {
        let tier = parse_pricing_tier("Pro: $20/month").unwrap();
        assert_eq!(tier.name, "Pro");
        assert_eq!(tier.price, "$20/month");

        let tier = parse_pricing_tier("Starter: FREE forever").unwrap();
        assert_eq!(tier.price, "FREE");

        assert!(parse_pricing_tier("Team: talk to us").is_none());
        assert!(parse_pricing_tier("$20/month").is_none());
    }

    #[test]
    fn test_ratings_normalise_labels() {
        let ratings = scrape(PAGE).ratings.unwrap();
        assert_eq!(ratings.accuracy_reliability, Some(4.5));
        assert_eq!(ratings.ease_of_use, Some(4.8));
        assert_eq!(ratings.overall_score, Some(4.6));
        assert_eq!(ratings.cost_efficiency, None);
    }

    #[test]
    fn test_ratings_aliases_and_absence() {
        let items = vec![
            "Privacy: 3/5".to_string(),
            "Data Privacy & Security: 4/5".to_string(),
        ];
        let ratings = parse_ratings(&items).unwrap();
        assert_eq!(ratings.data_privacy_security, Some(4.0));

        assert!(parse_ratings(&["Vibes: 5/5".to_string()]).is_none());
        assert!(parse_ratings(&[]).is_none());
    }

    #[test]
    fn test_ratings_drop_out_of_scale_scores() {
        let items = vec![
            "Ease of Use: 9/5".to_string(),
            "Cost Efficiency: 3.5/5".to_string(),
        ];
        let ratings = parse_ratings(&items).unwrap();
        assert_eq!(ratings.ease_of_use, None);
        assert_eq!(ratings.cost_efficiency, Some(3.5));

        assert!(parse_ratings(&["Overall Score: 12/5".to_string()]).is_none());
    }

    #[test]
    fn test_missing_sections_are_empty() {
        let data = scrape("<html><body><p>Nothing here</p></body></html>");
        assert!(data.key_features.is_empty());
        assert!(data.pricing_tiers.is_empty());
        assert!(data.ratings.is_none());
        assert!(data.uncommon_use_cases.is_none());
        assert_eq!(data.what_makes_unique, "");
        assert_eq!(data.description, "");
        assert_eq!(data.website_url, "https://www.futurepedia.io/tool/notion");
        assert!(data.image_url.is_none());
        assert!(data.video_url.is_none());
    }

    #[test]
    fn test_fallback_link_skips_social() {
        let html = r#"<body>
            <a href="https://www.futurepedia.io/tool/other">Other</a>
            <a href="https://www.linkedin.com/company/x">In</a>
            <a href="https://acme.ai/pricing">Pricing</a>
        </body>"#;
        assert_eq!(scrape(html).website_url, "https://acme.ai/pricing");
    }

    #[test]
    fn test_image_falls_back_to_logo() {
        let html = r#"<head><meta property="og:image" content="/relative.png"></head><body>
            <img src="https://cdn.example.com/hero.jpg" alt="hero">
            <img src="https://cdn.example.com/acme-icon.png" alt="">
        </body>"#;
        assert_eq!(
            scrape(html).image_url.as_deref(),
            Some("https://cdn.example.com/acme-icon.png")
        );
    }

    #[test]
    fn test_video_from_youtube_link() {
        let html = r#"<body>
            <a href="https://www.youtube.com/@notion">Channel</a>
            <a href="https://youtu.be/oTahLEX3NXo">Demo</a>
        </body>"#;
        assert_eq!(
            scrape(html).video_url.as_deref(),
            Some("https://youtu.be/oTahLEX3NXo")
        );
    }

    #[test]
    fn test_custom_headings() {
        let html = "<body><h2>Plans</h2><ul><li>Pro: $5</li></ul></body>";
        let headings = SectionHeadings {
            pricing: "Plans".to_string(),
            ..SectionHeadings::default()
        };
        let data = extract_tool_data(html, "Acme", "https://x.test/acme", &headings);
        assert_eq!(data.pricing_tiers.len(), 1);
    }
}
