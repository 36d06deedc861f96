//! End-to-end generation scenarios through the public pipeline API, with
//! every network-facing collaborator replaced by an in-process fake.

use std::sync::Arc;

use async_trait::async_trait;

use toolscout::browser::PageRenderer;
use toolscout::image::{brandfetch_url, ImageLocator, ImageSearch};
use toolscout::llm::{DisabledModel, LlmError, TextGenerator, TextModel};
use toolscout::models::{
    Category, DataSource, QuotaService, SearchResult, ToolType, VerificationResult,
};
use toolscout::pipeline::{AutoGenerator, BasicSource, GenerateError, RichSource};
use toolscout::quota::QuotaTracker;
use toolscout::scrape::{PageProbe, RichScraper, RichSourceConfig};
use toolscout::search::{
    FallbackSearchProvider, SearchBackend, SearchError, SearchHit, SearchService,
    WebSearchProvider,
};
use toolscout::verify::ResourceVerifier;
use toolscout::video::{search_url, VideoSearch, VideoSearchError};

const DETAIL_PAGE: &str = r#"
<html><head>
  <meta property="og:description" content="Notion is an all-in-one workspace for notes &amp; docs.">
</head><body>
  <a href="https://www.notion.so/" aria-label="Visit Notion website">Visit</a>
  <h2>Key Features</h2>
  <ul><li>Databases</li><li>Docs</li></ul>
  <h2>Pricing</h2>
  <ul>
    <li>Free: $0</li>
    <li>Plus: $10/month</li>
  </ul>
</body></html>
"#;

struct Probe(bool);

#[async_trait]
impl PageProbe for Probe {
    async fn exists(&self, _url: &str) -> bool {
        self.0
    }
}

/// Serves the detail page for detail URLs and an empty page elsewhere.
struct StaticRenderer;

#[async_trait]
impl PageRenderer for StaticRenderer {
    async fn render(&self, url: &str) -> anyhow::Result<String> {
        if url.contains("/tool/") {
            Ok(DETAIL_PAGE.to_string())
        } else {
            Ok("<html><body><p>Welcome</p></body></html>".to_string())
        }
    }
}

struct StubVerifier {
    image_error: Option<&'static str>,
}

#[async_trait]
impl ResourceVerifier for StubVerifier {
    async fn verify_url(&self, _url: &str) -> VerificationResult {
        VerificationResult::valid("websiteUrl")
    }

    async fn verify_image(&self, _url: &str) -> VerificationResult {
        match self.image_error {
            Some(error) => VerificationResult::invalid("imageUrl", error),
            None => VerificationResult::valid("imageUrl"),
        }
    }

    async fn verify_video(&self, _url: &str) -> VerificationResult {
        VerificationResult::valid("videoUrl")
    }
}

struct Hits(Vec<SearchHit>);

#[async_trait]
impl SearchBackend for Hits {
    async fn query(&self, _query: &str, _count: u32) -> Result<Vec<SearchHit>, SearchError> {
        Ok(self.0.clone())
    }
}

struct NoFallback;

#[async_trait]
impl FallbackSearchProvider for NoFallback {
    fn name(&self) -> &'static str {
        "none"
    }

    async fn search(&self, _tool_name: &str) -> Option<SearchResult> {
        None
    }
}

struct NoImageSearch;

#[async_trait]
impl ImageSearch for NoImageSearch {
    fn is_configured(&self) -> bool {
        false
    }

    async fn search_logo(&self, _tool_name: &str, _domain: Option<&str>) -> Option<String> {
        None
    }
}

struct NoVideoSearch;

#[async_trait]
impl VideoSearch for NoVideoSearch {
    fn is_configured(&self) -> bool {
        false
    }

    async fn find_most_viewed(&self, _tool_name: &str) -> Result<Option<String>, VideoSearchError> {
        Ok(None)
    }
}

/// Answers every category prompt with the same label.
struct FixedCategory(&'static str);

#[async_trait]
impl TextModel for FixedCategory {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn quota_service(&self) -> QuotaService {
        QuotaService::TextPrimary
    }

    fn is_configured(&self) -> bool {
        true
    }

    async fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
        Ok(self.0.to_string())
    }
}

fn hit(url: &str, title: &str, description: &str) -> SearchHit {
    SearchHit {
        url: url.to_string(),
        title: title.to_string(),
        description: description.to_string(),
    }
}

struct Scenario {
    detail_page_exists: bool,
    hits: Vec<SearchHit>,
    image_error: Option<&'static str>,
    primary: Arc<dyn TextModel>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            detail_page_exists: false,
            hits: Vec::new(),
            image_error: None,
            primary: Arc::new(DisabledModel::new(QuotaService::TextPrimary)),
        }
    }
}

impl Scenario {
    fn generator(self) -> AutoGenerator {
        let quota = QuotaTracker::in_memory();
        let verifier: Arc<dyn ResourceVerifier> = Arc::new(StubVerifier {
            image_error: self.image_error,
        });
        let renderer: Arc<dyn PageRenderer> = Arc::new(StaticRenderer);

        let images = ImageLocator::new(verifier.clone(), Arc::new(NoImageSearch));
        let videos = toolscout::video::VideoLocator::new(
            renderer.clone(),
            Arc::new(NoVideoSearch),
            quota.clone(),
        );
        let text = TextGenerator::new(
            self.primary,
            Arc::new(DisabledModel::new(QuotaService::TextFallback)),
            quota.clone(),
        );
        let search = SearchService::new(
            Arc::new(WebSearchProvider::new(
                Arc::new(Hits(self.hits)),
                verifier.clone(),
                10,
            )),
            Arc::new(NoFallback),
            quota,
        );

        let scraper = RichScraper::new(
            Arc::new(Probe(self.detail_page_exists)),
            renderer,
            RichSourceConfig::default(),
        );
        let rich = RichSource::new(scraper, images.clone(), videos.clone(), text.clone());
        let basic = BasicSource::new(search, images, videos, text, verifier);
        AutoGenerator::new(Arc::new(rich), Arc::new(basic))
    }
}

#[tokio::test]
async fn test_known_tool_uses_rich_record() {
    let generator = Scenario {
        detail_page_exists: true,
        primary: Arc::new(FixedCategory("Productivity")),
        ..Scenario::default()
    }
    .generator();

    let result = generator.auto_generate("Notion").await.unwrap();
    assert!(result.success);
    let data = result.data.unwrap();
    assert_eq!(data.data_source, DataSource::Scraped);
    assert_eq!(data.website_url, "https://www.notion.so/");
    assert_eq!(data.image_url, brandfetch_url("notion.so"));
    assert_eq!(data.category, Category::Productivity);
    assert_eq!(data.tool_type, ToolType::Free);
    assert_eq!(
        data.description,
        "Notion is an all-in-one workspace for notes & docs."
    );
    assert_eq!(data.pricing_tiers.map(|tiers| tiers.len()), Some(2));
    assert_eq!(data.video_url, search_url("Notion"));
}

#[tokio::test]
async fn test_nonsense_name_is_unknown_tool() {
    let generator = Scenario::default().generator();

    match generator.auto_generate("Zzyzxqplorer123").await {
        Err(GenerateError::UnknownTool { tool_name, reason }) => {
            assert_eq!(tool_name, "Zzyzxqplorer123");
            assert_eq!(reason, "No search results found");
        }
        other => panic!("expected unknown tool, got {:?}", other.map(|r| r.success)),
    }
}

#[tokio::test]
async fn test_aggregator_only_results_are_unknown_tool() {
    let generator = Scenario {
        hits: vec![
            hit("https://www.producthunt.com/posts/acme", "Acme on Product Hunt", ""),
            hit("https://en.wikipedia.org/wiki/Acme", "Acme - Wikipedia", ""),
        ],
        ..Scenario::default()
    }
    .generator();

    match generator.auto_generate("Acme").await {
        Err(GenerateError::UnknownTool { reason, .. }) => {
            assert_eq!(reason, "Only generic or aggregator results found");
        }
        other => panic!("expected unknown tool, got {:?}", other.map(|r| r.success)),
    }
}

#[tokio::test]
async fn test_unverifiable_image_yields_partial_result() {
    let snippet = "Acme Notes turns meeting recordings into searchable notes, \
                   summaries and action items, with integrations for calendars, \
                   chat tools and the project trackers teams already use daily.";
    let generator = Scenario {
        hits: vec![hit("https://acmenotes.ai", "Acme Notes", snippet)],
        image_error: Some("Not an image: text/html"),
        ..Scenario::default()
    }
    .generator();

    let result = generator.auto_generate("Acme Notes").await.unwrap();
    assert!(!result.success);
    assert!(result.data.is_none());

    let errors = result.errors.unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field, "imageUrl");
    assert_eq!(errors[0].error.as_deref(), Some("Not an image: text/html"));

    let partial = result.partial_data.unwrap();
    assert_eq!(partial.website_url.as_deref(), Some("https://acmenotes.ai"));
    assert_eq!(partial.category, Some(Category::AiTools));
    assert_eq!(partial.tool_type, Some(ToolType::Free));
    assert_eq!(partial.description.as_deref(), Some(snippet));
}
