//! Brave Search backend and the scored website provider built on it.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::Deserialize;
use tracing::{debug, info};

use super::{SearchBackend, SearchError, SearchProvider};
use crate::config::SearchConfig;
use crate::models::SearchResult;
use crate::utils::registrable_host;
use crate::verify::ResourceVerifier;

/// Reference sites that describe a word rather than a product.
const GENERIC_DOMAINS: &[&str] = &[
    "wikipedia.org",
    "dictionary.com",
    "urbandictionary.com",
    "wiktionary.org",
];

/// Directories and review sites that list tools rather than host them.
const AGGREGATOR_DOMAINS: &[&str] = &[
    "producthunt.com",
    "alternativeto.net",
    "g2.com",
    "capterra.com",
    "trustpilot.com",
    "getapp.com",
];

/// Unfiltered hit from a web search API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchHit {
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
struct BraveResponse {
    #[serde(default)]
    web: Option<BraveWeb>,
}

#[derive(Debug, Deserialize)]
struct BraveWeb {
    #[serde(default)]
    results: Vec<SearchHit>,
}

/// Brave Web Search API client.
pub struct BraveSearchBackend {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl BraveSearchBackend {
    pub fn new(client: Client, config: &SearchConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
        }
    }
}

#[async_trait]
impl SearchBackend for BraveSearchBackend {
    async fn query(&self, query: &str, count: u32) -> Result<Vec<SearchHit>, SearchError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| SearchError::NotConfigured("BRAVE_SEARCH_API_KEY not set".to_string()))?;

        debug!("Brave search: {}", query);
        let count = count.to_string();
        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query), ("count", count.as_str())])
            .header(header::ACCEPT, "application/json")
            .header("X-Subscription-Token", api_key)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(SearchError::Api(format!(
                "Brave Search API error: {}",
                resp.status()
            )));
        }

        let body: BraveResponse = resp
            .json()
            .await
            .map_err(|e| SearchError::Parse(e.to_string()))?;
        Ok(body.web.map(|w| w.results).unwrap_or_default())
    }
}

/// Query used to find a tool's official site; multi-word names are quoted.
pub fn build_query(tool_name: &str) -> String {
    let tool_name = tool_name.trim();
    if tool_name.contains(' ') {
        format!("\"{}\" official site AI tool", tool_name)
    } else {
        format!("{} official site AI tool", tool_name)
    }
}

/// Whether `url` belongs to a generic reference or aggregator site.
pub fn is_excluded_url(url: &str) -> bool {
    let url = url.to_lowercase();
    GENERIC_DOMAINS
        .iter()
        .chain(AGGREGATOR_DOMAINS)
        .any(|domain| url.contains(domain))
}

/// Relevance of a hit to `tool_name`; `None` when the URL does not parse.
pub fn score_result(tool_name: &str, hit: &SearchHit) -> Option<u32> {
    let domain = registrable_host(&hit.url)?.to_lowercase();
    let name = tool_name.trim().to_lowercase();
    let mut score = 0;

    if name.split_whitespace().any(|keyword| domain.contains(keyword)) {
        score += 10;
    }
    if domain.ends_with(".ai") {
        score += 5;
    }
    if domain.ends_with(".com") {
        score += 3;
    }
    if domain.ends_with(".io") {
        score += 3;
    }
    if hit.title.to_lowercase().contains(&name) {
        score += 5;
    }
    if hit.description.to_lowercase().contains(&name) {
        score += 2;
    }

    Some(score)
}

/// Highest-scoring hit; ties keep the provider's original order.
pub fn select_best<'a>(tool_name: &str, hits: &'a [SearchHit]) -> Option<&'a SearchHit> {
    let mut best: Option<(&SearchHit, u32)> = None;
    for hit in hits {
        let Some(score) = score_result(tool_name, hit) else {
            continue;
        };
        debug!("Candidate {} scored {}", hit.url, score);
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((hit, score));
        }
    }
    best.map(|(hit, _)| hit)
}

/// Primary provider: query, filter, score, then confirm the winner is reachable.
pub struct WebSearchProvider {
    backend: Arc<dyn SearchBackend>,
    verifier: Arc<dyn ResourceVerifier>,
    result_count: u32,
}

impl WebSearchProvider {
    pub fn new(
        backend: Arc<dyn SearchBackend>,
        verifier: Arc<dyn ResourceVerifier>,
        result_count: u32,
    ) -> Self {
        Self {
            backend,
            verifier,
            result_count,
        }
    }
}

#[async_trait]
impl SearchProvider for WebSearchProvider {
    fn name(&self) -> &'static str {
        "brave"
    }

    async fn search(&self, tool_name: &str) -> Result<SearchResult, SearchError> {
        let hits = self
            .backend
            .query(&build_query(tool_name), self.result_count)
            .await?;

        if hits.is_empty() {
            return Err(SearchError::unknown_tool(tool_name, "No search results found"));
        }

        let candidates: Vec<SearchHit> = hits
            .into_iter()
            .filter(|hit| !is_excluded_url(&hit.url) && registrable_host(&hit.url).is_some())
            .collect();

        let Some(best) = select_best(tool_name, &candidates) else {
            return Err(SearchError::unknown_tool(
                tool_name,
                "Only generic or aggregator results found",
            ));
        };

        let check = self.verifier.verify_url(&best.url).await;
        if !check.valid {
            return Err(SearchError::unknown_tool(
                tool_name,
                format!(
                    "Website URL not accessible: {}",
                    check.error.unwrap_or_default()
                ),
            ));
        }

        info!("Selected {} for '{}'", best.url, tool_name);
        Ok(SearchResult::new(
            best.url.clone(),
            best.title.clone(),
            best.description.clone(),
        ))
    }
}
