//! Video discovery in a tool's own website HTML.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

use crate::utils::absolutize;
use crate::verify::VideoRef;

static YOUTUBE_EMBED_IFRAME: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"iframe[src*="youtube.com/embed"], iframe[src*="youtu.be"]"#).unwrap()
});
static VIDEO_SOURCE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("video source, video").unwrap());
static VIDEO_SECTION: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"section, div[class*="video"], div[id*="video"]"#).unwrap()
});
static YOUTUBE_ANCHOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"a[href*="youtube.com"], a[href*="youtu.be"]"#).unwrap()
});
static YOUTUBE_WATCH_ANCHOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"a[href*="youtube.com/watch"], a[href*="youtu.be/"]"#).unwrap()
});
static VIMEO_IFRAME: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"iframe[src*="vimeo.com"]"#).unwrap());

static EMBED_OR_SHORT_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:/embed/|youtu\.be/)([a-zA-Z0-9_-]{11})").unwrap()
});
static SOURCE_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:v=|/embed/|youtu\.be/)([a-zA-Z0-9_-]{11})").unwrap()
});
static LINK_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:v=|youtu\.be/)([a-zA-Z0-9_-]{11})").unwrap());

/// Words that mark a page section as likely to hold a demo video.
const VIDEO_SECTION_KEYWORDS: &[&str] = &[
    "demo",
    "video",
    "watch",
    "tutorial",
    "overview",
    "introduction",
];

fn watch_url(re: &Regex, src: &str) -> Option<String> {
    re.captures(src).map(|caps| VideoRef::youtube_watch_url(&caps[1]))
}

/// Find a demo video on a rendered website page.
///
/// Tries, in order: a YouTube embed iframe, a `<video>` with a YouTube
/// source, YouTube links inside video-ish sections, any YouTube watch link,
/// then a Vimeo embed (returned as-is). YouTube results are normalised to
/// watch URLs.
pub fn extract_video_url(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    if let Some(iframe) = document.select(&YOUTUBE_EMBED_IFRAME).next() {
        let src = iframe.value().attr("src").unwrap_or_default();
        if let Some(url) = watch_url(&EMBED_OR_SHORT_ID, src) {
            return Some(url);
        }
    }

    let from_video_tag = document
        .select(&VIDEO_SOURCE)
        .filter_map(|el| el.value().attr("src"))
        .filter(|src| src.contains("youtube.com") || src.contains("youtu.be"))
        .find_map(|src| watch_url(&SOURCE_ID, src));
    if from_video_tag.is_some() {
        return from_video_tag;
    }

    for section in document.select(&VIDEO_SECTION) {
        let text = section.text().collect::<String>().to_lowercase();
        if !VIDEO_SECTION_KEYWORDS.iter().any(|kw| text.contains(kw)) {
            continue;
        }
        let found = section
            .select(&YOUTUBE_ANCHOR)
            .filter_map(|a| a.value().attr("href"))
            .find_map(|href| watch_url(&LINK_ID, href));
        if found.is_some() {
            return found;
        }
    }

    let from_link = document
        .select(&YOUTUBE_WATCH_ANCHOR)
        .filter_map(|a| a.value().attr("href"))
        .find_map(|href| watch_url(&LINK_ID, href));
    if from_link.is_some() {
        return from_link;
    }

    document
        .select(&VIMEO_IFRAME)
        .next()
        .and_then(|iframe| iframe.value().attr("src"))
        .filter(|src| !src.is_empty())
        .map(absolutize)
}
