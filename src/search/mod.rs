//! Official-website search.
//!
//! Resolution is two-tier: a scored web-search provider (Brave) and a
//! keyless fallback (DuckDuckGo Instant Answer). [`SearchService`] applies the
//! quota and fallback policy between them.

mod brave;
mod duckduckgo;

pub use brave::{build_query, is_excluded_url, score_result, select_best, BraveSearchBackend, SearchHit, WebSearchProvider};
pub use duckduckgo::DuckDuckGoProvider;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::models::{QuotaService, SearchResult};
use crate::quota::QuotaTracker;

/// Errors from search providers.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// No usable source identifies the tool.
    #[error("Unknown tool: {tool_name}")]
    UnknownTool { tool_name: String, reason: String },
    #[error("Search provider not configured: {0}")]
    NotConfigured(String),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Search API error: {0}")]
    Api(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

impl SearchError {
    pub fn unknown_tool(tool_name: &str, reason: impl Into<String>) -> Self {
        SearchError::UnknownTool {
            tool_name: tool_name.to_string(),
            reason: reason.into(),
        }
    }

    pub fn is_unknown_tool(&self) -> bool {
        matches!(self, SearchError::UnknownTool { .. })
    }
}

/// Raw web search API returning unfiltered hits.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn query(&self, query: &str, count: u32) -> Result<Vec<SearchHit>, SearchError>;
}

/// Primary provider: resolves a tool name to its website or explains why not.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn search(&self, tool_name: &str) -> Result<SearchResult, SearchError>;
}

/// Fallback provider: best effort, never fails.
#[async_trait]
pub trait FallbackSearchProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn search(&self, tool_name: &str) -> Option<SearchResult>;
}

/// Quota-aware website resolution with primary-to-fallback substitution.
#[derive(Clone)]
pub struct SearchService {
    primary: Arc<dyn SearchProvider>,
    fallback: Arc<dyn FallbackSearchProvider>,
    quota: QuotaTracker,
}

impl SearchService {
    pub fn new(
        primary: Arc<dyn SearchProvider>,
        fallback: Arc<dyn FallbackSearchProvider>,
        quota: QuotaTracker,
    ) -> Self {
        Self {
            primary,
            fallback,
            quota,
        }
    }

    /// Resolve `tool_name` to its official website.
    ///
    /// The fallback runs only when the primary's quota is exhausted or the
    /// primary fails for a reason other than "unknown tool". Every error this
    /// returns is [`SearchError::UnknownTool`].
    pub async fn resolve(&self, tool_name: &str) -> Result<SearchResult, SearchError> {
        if !self.quota.can_use(QuotaService::Search).await {
            warn!(
                "{} quota exhausted, using {} fallback",
                self.primary.name(),
                self.fallback.name()
            );
            return self
                .fallback
                .search(tool_name)
                .await
                .ok_or_else(|| SearchError::unknown_tool(tool_name, "No search results found"));
        }

        match self.primary.search(tool_name).await {
            Ok(result) => {
                self.quota.increment_quota(QuotaService::Search).await;
                info!("{} resolved '{}' to {}", self.primary.name(), tool_name, result.url);
                Ok(result)
            }
            Err(e) if e.is_unknown_tool() => Err(e),
            Err(e) => {
                warn!(
                    "{} search failed for '{}', trying {}: {}",
                    self.primary.name(),
                    tool_name,
                    self.fallback.name(),
                    e
                );
                self.fallback.search(tool_name).await.ok_or_else(|| {
                    SearchError::unknown_tool(
                        tool_name,
                        "Search failed and fallback returned no results",
                    )
                })
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

    enum PrimaryOutcome {
        Found,
        Unknown,
        Broken,
    }

    struct StubPrimary {
        outcome: PrimaryOutcome,
        calls: AtomicUsize,
    }

    impl StubPrimary {
        fn new(outcome: PrimaryOutcome) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl SearchProvider for StubPrimary {
        fn name(&self) -> &'static str {
            "stub-primary"
        }

        async fn search(&self, tool_name: &str) -> Result<SearchResult, SearchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.outcome {
                PrimaryOutcome::Found => Ok(SearchResult::new(
                    "https://primary.ai".to_string(),
                    tool_name.to_string(),
                    String::new(),
                )),
                PrimaryOutcome::Unknown => Err(SearchError::unknown_tool(
                    tool_name,
                    "Only generic or aggregator results found",
                )),
                PrimaryOutcome::Broken => Err(SearchError::Api("HTTP 500".to_string())),
            }
        }
    }

    struct StubFallback(Option<&'static str>);

    #[async_trait]
    impl FallbackSearchProvider for StubFallback {
        fn name(&self) -> &'static str {
            "stub-fallback"
        }

        async fn search(&self, tool_name: &str) -> Option<SearchResult> {
            self.0.map(|url| {
                SearchResult::new(url.to_string(), tool_name.to_string(), String::new())
            })
        }
    }

    fn reason(err: SearchError) -> String {
        match err {
            SearchError::UnknownTool { reason, .. } => reason,
            other => panic!("expected unknown tool, got {other}"),
        }
    }

    #[tokio::test]
    async fn test_primary_success_increments_quota() {
        let quota = QuotaTracker::in_memory();
        let service = SearchService::new(
            StubPrimary::new(PrimaryOutcome::Found),
            Arc::new(StubFallback(None)),
            quota.clone(),
        );

        let result = service.resolve("Acme").await.unwrap();
        assert_eq!(result.url, "https://primary.ai");
        assert_eq!(quota.check_quota(QuotaService::Search).await.used_daily, 1);
    }

    #[tokio::test]
    async fn test_unknown_tool_does_not_fall_back() {
        let service = SearchService::new(
            StubPrimary::new(PrimaryOutcome::Unknown),
            Arc::new(StubFallback(Some("https://fallback.com"))),
            QuotaTracker::in_memory(),
        );

        let err = service.resolve("Acme").await.unwrap_err();
        assert_eq!(reason(err), "Only generic or aggregator results found");
    }

    #[tokio::test]
    async fn test_primary_error_uses_fallback() {
        let quota = QuotaTracker::in_memory();
        let service = SearchService::new(
            StubPrimary::new(PrimaryOutcome::Broken),
            Arc::new(StubFallback(Some("https://fallback.com"))),
            quota.clone(),
        );

        let result = service.resolve("Acme").await.unwrap();
        assert_eq!(result.url, "https://fallback.com");
        assert_eq!(quota.check_quota(QuotaService::Search).await.used_daily, 0);
    }

    #[tokio::test]
    async fn test_primary_error_and_empty_fallback() {
        let service = SearchService::new(
            StubPrimary::new(PrimaryOutcome::Broken),
            Arc::new(StubFallback(None)),
            QuotaTracker::in_memory(),
        );

        let err = service.resolve("Acme").await.unwrap_err();
        assert_eq!(reason(err), "Search failed and fallback returned no results");
    }

    #[tokio::test]
    async fn test_quota_exhausted_skips_primary() {
        let quota = QuotaTracker::in_memory()
            .with_limits(HashMap::from([(QuotaService::Search, QuotaLimit::new(0, 0))]));
        let primary = StubPrimary::new(PrimaryOutcome::Found);
        let service = SearchService::new(
            primary.clone(),
            Arc::new(StubFallback(None)),
            quota,
        );

        let err = service.resolve("Acme").await.unwrap_err();
        assert_eq!(reason(err), "No search results found");
        assert_eq!(primary.calls.load(Ordering::SeqCst), 0);
    }
}
