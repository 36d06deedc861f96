//! Google Custom Search image client.

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::Deserialize;
use tracing::{debug, warn};

use super::ImageSearch;
use crate::config::ImageSearchConfig;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<ImageItem>,
}

#[derive(Debug, Deserialize)]
struct ImageItem {
    link: String,
}

/// Logo query, scoped to the tool's own domain when one is known.
pub fn logo_query(tool_name: &str, domain: Option<&str>) -> String {
    match domain {
        Some(domain) => format!("{} logo site:{}", tool_name, domain),
        None => format!("{} official logo brand", tool_name),
    }
}

pub struct GoogleImageSearch {
    client: Client,
    config: ImageSearchConfig,
}

impl GoogleImageSearch {
    pub fn new(client: Client, config: ImageSearchConfig) -> Self {
        Self { client, config }
    }

    async fn query(&self, query: &str) -> Result<Option<String>, String> {
        let (Some(key), Some(cx)) = (
            self.config.api_key.as_deref(),
            self.config.engine_id.as_deref(),
        ) else {
            return Ok(None);
        };

        let resp = self
            .client
            .get(&self.config.endpoint)
            .header(header::ACCEPT, "application/json")
            .query(&[
                ("key", key),
                ("cx", cx),
                ("q", query),
                ("searchType", "image"),
                ("num", "5"),
                ("imgSize", "medium"),
                ("imgType", "photo"),
                ("fileType", "png"),
                ("safe", "active"),
            ])
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !resp.status().is_success() {
            return Err(format!("Google Image Search API error: {}", resp.status()));
        }

        let body: SearchResponse = resp.json().await.map_err(|e| e.to_string())?;
        Ok(body.items.into_iter().next().map(|item| item.link))
    }
}

#[async_trait]
impl ImageSearch for GoogleImageSearch {
    fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    async fn search_logo(&self, tool_name: &str, domain: Option<&str>) -> Option<String> {
        let query = logo_query(tool_name, domain);
        debug!("Google image search: {}", query);
        match self.query(&query).await {
            Ok(link) => link,
            Err(e) => {
                warn!("Image search failed for '{}': {}", tool_name, e);
                None
            }
        }
    }
}
