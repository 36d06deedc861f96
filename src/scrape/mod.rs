//! Structured scraping of tool detail pages (the rich path).
//!
//! A detail page is located by slug and probed with a cheap HEAD request
//! first; only pages that exist are rendered in a browser and extracted.

mod config;
mod extract;

pub use config::{RichSourceConfig, SectionHeadings};
pub use extract::{extract_list, extract_tool_data, parse_pricing_tier, parse_ratings};

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::browser::PageRenderer;
use crate::models::ScrapedToolData;

/// Slug used in detail page URLs: lowercase, spaces to hyphens, other
/// punctuation dropped.
pub fn slugify(tool_name: &str) -> String {
    tool_name
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect()
}

/// Existence check for a page, without downloading it.
#[async_trait]
pub trait PageProbe: Send + Sync {
    async fn exists(&self, url: &str) -> bool;
}

/// HEAD-request probe.
pub struct HttpPageProbe {
    client: Client,
}

impl HttpPageProbe {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageProbe for HttpPageProbe {
    async fn exists(&self, url: &str) -> bool {
        match self.client.head(url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                debug!("Probe failed for {}: {}", url, e);
                false
            }
        }
    }
}

/// Rich-path scraper: slug → probe → render → extract.
pub struct RichScraper {
    probe: Arc<dyn PageProbe>,
    renderer: Arc<dyn PageRenderer>,
    config: RichSourceConfig,
}

impl RichScraper {
    pub fn new(
        probe: Arc<dyn PageProbe>,
        renderer: Arc<dyn PageRenderer>,
        config: RichSourceConfig,
    ) -> Self {
        Self {
            probe,
            renderer,
            config,
        }
    }

    /// Scrape `tool_name`'s detail page. `None` means the source does not
    /// know the tool or the page could not be processed.
    pub async fn scrape(&self, tool_name: &str) -> Option<ScrapedToolData> {
        let slug = slugify(tool_name);
        if slug.is_empty() {
            debug!("No usable slug for '{}'", tool_name);
            return None;
        }

        let page_url = self.config.detail_url(&slug);
        if !self.probe.exists(&page_url).await {
            info!("No detail page for '{}' at {}", tool_name, page_url);
            return None;
        }

        let html = match self.renderer.render(&page_url).await {
            Ok(html) => html,
            Err(e) => {
                warn!("Failed to render {}: {:#}", page_url, e);
                return None;
            }
        };

        let data = extract_tool_data(&html, tool_name, &page_url, &self.config.headings);
        info!(
            "Scraped '{}': website={}, features={}, pricing tiers={}, ratings={}",
            tool_name,
            data.website_url,
            data.key_features.len(),
            data.pricing_tiers.len(),
            data.ratings.is_some()
        );
        Some(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct FixedProbe(bool);

    #[async_trait]
    impl PageProbe for FixedProbe {
        async fn exists(&self, _url: &str) -> bool {
            self.0
        }
    }

    #[derive(Default)]
    struct RecordingRenderer {
        html: Option<&'static str>,
        calls: AtomicUsize,
        urls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl PageRenderer for RecordingRenderer {
        async fn render(&self, url: &str) -> anyhow::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.urls.lock().unwrap().push(url.to_string());
            self.html
                .map(str::to_string)
                .ok_or_else(|| anyhow::anyhow!("renderer crashed"))
        }
    }

    fn scraper(exists: bool, renderer: Arc<RecordingRenderer>) -> RichScraper {
        RichScraper::new(
            Arc::new(FixedProbe(exists)),
            renderer,
            RichSourceConfig::default(),
        )
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Notion"), "notion");
        assert_eq!(slugify("  Stable   Diffusion XL "), "stable-diffusion-xl");
        assert_eq!(slugify("Copy.ai"), "copyai");
        assert_eq!(slugify("Midjourney (v6)!"), "midjourney-v6");
        assert_eq!(slugify("日本"), "");
    }

    #[tokio::test]
    async fn test_missing_page_skips_renderer() {
        let renderer = Arc::new(RecordingRenderer::default());
        let result = scraper(false, renderer.clone()).scrape("Notion").await;
        assert!(result.is_none());
        assert_eq!(renderer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_render_failure_is_none() {
        let renderer = Arc::new(RecordingRenderer::default());
        let result = scraper(true, renderer.clone()).scrape("Notion").await;
        assert!(result.is_none());
        assert_eq!(renderer.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_renders_detail_page() {
        let renderer = Arc::new(RecordingRenderer {
            html: Some(
                r#"<html><head><meta name="description" content="Docs and wikis"></head>
                <body><h2>Pricing</h2><ul><li>Free: $0</li></ul></body></html>"#,
            ),
            ..Default::default()
        });
        let data = scraper(true, renderer.clone())
            .scrape("Notion AI")
            .await
            .unwrap();

        assert_eq!(
            *renderer.urls.lock().unwrap(),
            vec!["https://www.futurepedia.io/tool/notion-ai"]
        );
        assert_eq!(data.description, "Docs and wikis");
        assert_eq!(data.pricing_tiers.len(), 1);
        assert_eq!(data.website_url, "https://www.futurepedia.io/tool/notion-ai");
    }

    #[tokio::test]
    async fn test_http_probe() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("HEAD", "/tool/notion")
            .with_status(200)
            .create_async()
            .await;
        server
            .mock("HEAD", "/tool/unknown")
            .with_status(404)
            .create_async()
            .await;

        let probe = HttpPageProbe::new(Client::new());
        assert!(probe.exists(&format!("{}/tool/notion", server.url())).await);
        assert!(!probe.exists(&format!("{}/tool/unknown", server.url())).await);
        assert!(!probe.exists("http://127.0.0.1:1/tool/x").await);
    }
}
