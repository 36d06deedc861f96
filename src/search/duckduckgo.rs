//! DuckDuckGo Instant Answer fallback.
//!
//! Keyless and unmetered, but it only knows about well-known tools.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::FallbackSearchProvider;
use crate::models::SearchResult;

#[derive(Debug, Default, Deserialize)]
struct InstantAnswer {
    #[serde(rename = "AbstractURL", default)]
    abstract_url: String,
    #[serde(rename = "Redirect", default)]
    redirect: String,
    #[serde(rename = "Heading", default)]
    heading: String,
    #[serde(rename = "AbstractText", default)]
    abstract_text: String,
}

impl InstantAnswer {
    fn into_result(self, tool_name: &str) -> Option<SearchResult> {
        let url = non_empty(self.abstract_url).or_else(|| non_empty(self.redirect))?;
        let title = non_empty(self.heading).unwrap_or_else(|| tool_name.to_string());
        Some(SearchResult::new(url, title, self.abstract_text))
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Fallback provider using the DuckDuckGo Instant Answer API.
pub struct DuckDuckGoProvider {
    client: Client,
    endpoint: String,
}

impl DuckDuckGoProvider {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    async fn lookup(&self, tool_name: &str) -> Result<InstantAnswer, String> {
        let query = format!("{} official website", tool_name);
        debug!("DuckDuckGo instant answer: {}", query);

        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("q", query.as_str()),
                ("format", "json"),
                ("no_html", "1"),
            ])
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !resp.status().is_success() {
            return Err(format!("DuckDuckGo returned {}", resp.status()));
        }

        // The API answers with a javascript content type, so parse the text.
        let body = resp.text().await.map_err(|e| e.to_string())?;
        serde_json::from_str(&body).map_err(|e| format!("Failed to parse response: {}", e))
    }
}

#[async_trait]
impl FallbackSearchProvider for DuckDuckGoProvider {
    fn name(&self) -> &'static str {
        "duckduckgo"
    }

    async fn search(&self, tool_name: &str) -> Option<SearchResult> {
        match self.lookup(tool_name).await {
            Ok(answer) => answer.into_result(tool_name),
            Err(e) => {
                warn!("DuckDuckGo lookup failed for '{}': {}", tool_name, e);
                None
            }
        }
    }
}
