//! Wiring of the production collaborators from [`Settings`].

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::{debug, info};

use super::{AutoGenerator, BasicSource, RichSource};
use crate::browser::{BrowserRenderer, PageRenderer};
use crate::config::Settings;
use crate::http_client::{api_client, probe_client, API_TIMEOUT};
use crate::image::{GoogleImageSearch, ImageLocator};
use crate::llm::{LlmClient, LlmRole, TextGenerator};
use crate::quota::{QuotaTracker, SqliteQuotaStore};
use crate::scrape::{HttpPageProbe, RichScraper};
use crate::search::{BraveSearchBackend, DuckDuckGoProvider, SearchService, WebSearchProvider};
use crate::translate::Translator;
use crate::verify::{HttpVerifier, ResourceVerifier};
use crate::video::{VideoLocator, YouTubeClient};

/// Everything a front end (HTTP server or CLI) needs.
#[derive(Clone)]
pub struct Components {
    pub generator: AutoGenerator,
    pub quota: QuotaTracker,
    pub translator: Translator,
}

impl Components {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let store = SqliteQuotaStore::open(&settings.quota.database_path).with_context(|| {
            format!(
                "Failed to open quota database {}",
                settings.quota.database_path.display()
            )
        })?;
        let quota = QuotaTracker::new(Arc::new(store)).with_limits(settings.quota.resolved_limits());
        Self::with_quota(settings, quota)
    }

    /// Build with an existing quota tracker (in-memory in tests and dry runs).
    pub fn with_quota(settings: &Settings, quota: QuotaTracker) -> anyhow::Result<Self> {
        let api = api_client(API_TIMEOUT).context("Failed to build API client")?;
        let probe = probe_client(Duration::from_secs(settings.verify.timeout_secs))
            .context("Failed to build probe client")?;

        let verifier: Arc<dyn ResourceVerifier> = Arc::new(HttpVerifier::with_client(probe.clone()));
        let renderer: Arc<dyn PageRenderer> = Arc::new(BrowserRenderer::new(settings.browser.clone()));

        let search = SearchService::new(
            Arc::new(WebSearchProvider::new(
                Arc::new(BraveSearchBackend::new(api.clone(), &settings.search)),
                verifier.clone(),
                settings.search.result_count,
            )),
            Arc::new(DuckDuckGoProvider::new(
                api.clone(),
                settings.search.fallback_endpoint.clone(),
            )),
            quota.clone(),
        );

        let images = ImageLocator::new(
            verifier.clone(),
            Arc::new(GoogleImageSearch::new(api.clone(), settings.images.clone())),
        );
        let videos = VideoLocator::new(
            renderer.clone(),
            Arc::new(YouTubeClient::new(api.clone(), &settings.video)),
            quota.clone(),
        );

        let primary = LlmClient::with_client(settings.llm.primary.clone(), LlmRole::Primary, api.clone());
        let fallback =
            LlmClient::with_client(settings.llm.fallback.clone(), LlmRole::Fallback, api.clone());
        debug!(
            "Text models: primary {} ({}), fallback {} ({})",
            primary.config().model,
            if primary.config().is_configured() { "configured" } else { "no key" },
            fallback.config().model,
            if fallback.config().is_configured() { "configured" } else { "no key" },
        );
        let text = TextGenerator::new(Arc::new(primary), Arc::new(fallback), quota.clone());

        let scraper = RichScraper::new(
            Arc::new(HttpPageProbe::new(probe)),
            renderer,
            settings.rich.clone(),
        );
        let rich = RichSource::new(scraper, images.clone(), videos.clone(), text.clone());
        let basic = BasicSource::new(search, images, videos, text.clone(), verifier);

        info!(
            "Pipeline ready (search key: {}, video key: {}, image search: {})",
            settings.search.api_key.is_some(),
            settings.video.api_key.is_some(),
            settings.images.is_configured()
        );

        Ok(Self {
            generator: AutoGenerator::new(Arc::new(rich), Arc::new(basic)),
            quota,
            translator: Translator::new(text),
        })
    }
}
