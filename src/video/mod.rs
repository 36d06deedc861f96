//! Demo video discovery.
//!
//! [`VideoLocator`] always produces a URL. Sources are tried in priority
//! order: the tool's own website, a video already found by the rich
//! scraper, the quota-gated YouTube search API, then a YouTube search
//! results URL built from the tool name.

mod extract;
mod youtube;

pub use extract::extract_video_url;
pub use youtube::{search_query, select_most_viewed, VideoCandidate, YouTubeClient};

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::browser::PageRenderer;
use crate::models::QuotaService;
use crate::quota::QuotaTracker;

/// Errors from the video search API.
#[derive(Debug, thiserror::Error)]
pub enum VideoSearchError {
    #[error("YOUTUBE_API_KEY not set")]
    NotConfigured,
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{0}")]
    Api(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Video platform search returning the best matching watch URL.
#[async_trait]
pub trait VideoSearch: Send + Sync {
    fn is_configured(&self) -> bool;

    async fn find_most_viewed(&self, tool_name: &str) -> Result<Option<String>, VideoSearchError>;
}

/// Deterministic last-resort video URL: a YouTube search for the tool.
pub fn search_url(tool_name: &str) -> String {
    format!(
        "https://www.youtube.com/results?search_query={}",
        urlencoding::encode(&search_query(tool_name))
    )
}

/// Ordered video lookup that never fails.
#[derive(Clone)]
pub struct VideoLocator {
    renderer: Arc<dyn PageRenderer>,
    search: Arc<dyn VideoSearch>,
    quota: QuotaTracker,
}

impl VideoLocator {
    pub fn new(
        renderer: Arc<dyn PageRenderer>,
        search: Arc<dyn VideoSearch>,
        quota: QuotaTracker,
    ) -> Self {
        Self {
            renderer,
            search,
            quota,
        }
    }

    /// Best available video for the tool. `rich_video` is a video already
    /// found on the rich source page, if any.
    pub async fn locate(
        &self,
        website_url: &str,
        tool_name: &str,
        rich_video: Option<&str>,
    ) -> String {
        if let Some(url) = self.from_website(website_url).await {
            info!("Video for '{}' found on website: {}", tool_name, url);
            return url;
        }

        if let Some(url) = rich_video.filter(|u| !u.trim().is_empty()) {
            info!("Video for '{}' taken from rich source: {}", tool_name, url);
            return url.to_string();
        }

        if let Some(url) = self.from_api(tool_name).await {
            info!("Video for '{}' found via YouTube API: {}", tool_name, url);
            return url;
        }

        let url = search_url(tool_name);
        debug!("Using search URL for '{}': {}", tool_name, url);
        url
    }

    async fn from_website(&self, website_url: &str) -> Option<String> {
        if website_url.trim().is_empty() {
            return None;
        }
        match self.renderer.render(website_url).await {
            Ok(html) => extract_video_url(&html),
            Err(e) => {
                debug!("Could not render {} for video lookup: {:#}", website_url, e);
                None
            }
        }
    }

    async fn from_api(&self, tool_name: &str) -> Option<String> {
        if !self.search.is_configured() {
            debug!("Video search not configured");
            return None;
        }
        if !self.quota.can_use(QuotaService::Video).await {
            warn!("Video search quota exhausted, using search URL");
            return None;
        }

        match self.search.find_most_viewed(tool_name).await {
            Ok(Some(url)) => {
                self.quota.increment_quota(QuotaService::Video).await;
                Some(url)
            }
            Ok(None) => None,
            Err(e) => {
                warn!("Video search failed for '{}': {}", tool_name, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QuotaLimit;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticRenderer(Option<&'static str>);

    #[async_trait]
    impl PageRenderer for StaticRenderer {
        async fn render(&self, _url: &str) -> anyhow::Result<String> {
            self.0
                .map(str::to_string)
                .ok_or_else(|| anyhow::anyhow!("navigation timed out"))
        }
    }

    struct StubSearch {
        result: Option<&'static str>,
        calls: AtomicUsize,
    }

    impl StubSearch {
        fn new(result: Option<&'static str>) -> Arc<Self> {
            Arc::new(Self {
                result,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl VideoSearch for StubSearch {
        fn is_configured(&self) -> bool {
            true
        }

        async fn find_most_viewed(&self, _tool: &str) -> Result<Option<String>, VideoSearchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.result.map(str::to_string))
        }
    }

    const EMBED_PAGE: &str =
        r#"<iframe src="https://www.youtube.com/embed/dQw4w9WgXcQ"></iframe>"#;
    const API_VIDEO: &str = "https://www.youtube.com/watch?v=bbbbbbbbbbb";

    #[test]
    fn test_search_url_encodes_tool() {
        assert_eq!(
            search_url("Stable Diffusion"),
            "https://www.youtube.com/results?search_query=Stable%20Diffusion%20AI%20tutorial%20review"
        );
    }

    #[tokio::test]
    async fn test_website_video_wins() {
        let search = StubSearch::new(Some(API_VIDEO));
        let locator = VideoLocator::new(
            Arc::new(StaticRenderer(Some(EMBED_PAGE))),
            search.clone(),
            QuotaTracker::in_memory(),
        );
        let url = locator
            .locate("https://acme.ai", "Acme", Some("https://youtu.be/ccccccccccc"))
            .await;
        assert_eq!(url, "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
        assert_eq!(search.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_rich_video_before_api() {
        let search = StubSearch::new(Some(API_VIDEO));
        let locator = VideoLocator::new(
            Arc::new(StaticRenderer(None)),
            search.clone(),
            QuotaTracker::in_memory(),
        );
        let url = locator
            .locate("https://acme.ai", "Acme", Some("https://youtu.be/ccccccccccc"))
            .await;
        assert_eq!(url, "https://youtu.be/ccccccccccc");
        assert_eq!(search.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_api_result_increments_quota() {
        let quota = QuotaTracker::in_memory();
        let locator = VideoLocator::new(
            Arc::new(StaticRenderer(Some("<p>no video</p>"))),
            StubSearch::new(Some(API_VIDEO)),
            quota.clone(),
        );
        assert_eq!(locator.locate("https://acme.ai", "Acme", None).await, API_VIDEO);
        assert_eq!(quota.check_quota(QuotaService::Video).await.used_daily, 1);
    }

    #[tokio::test]
    async fn test_api_miss_does_not_increment() {
        let quota = QuotaTracker::in_memory();
        let locator = VideoLocator::new(
            Arc::new(StaticRenderer(None)),
            StubSearch::new(None),
            quota.clone(),
        );
        let url = locator.locate("https://acme.ai", "Acme", None).await;
        assert_eq!(url, search_url("Acme"));
        assert_eq!(quota.check_quota(QuotaService::Video).await.used_daily, 0);
    }

    #[tokio::test]
    async fn test_exhausted_quota_skips_api() {
        let quota = QuotaTracker::in_memory()
            .with_limits(HashMap::from([(QuotaService::Video, QuotaLimit::new(0, 0))]));
        let search = StubSearch::new(Some(API_VIDEO));
        let locator = VideoLocator::new(Arc::new(StaticRenderer(None)), search.clone(), quota);

        let url = locator.locate("", "Acme", None).await;
        assert!(url.starts_with("https://www.youtube.com/results?search_query=Acme"));
        assert_eq!(search.calls.load(Ordering::SeqCst), 0);
    }
}
