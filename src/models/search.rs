//! Search result model.

use serde::{Deserialize, Serialize};

use crate::utils::registrable_host;

/// Candidate official website for a tool, as returned by a search provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub url: String,
    pub title: String,
    pub description: String,
    /// Host of `url` with any leading `www.` removed.
    pub domain: String,
}

impl SearchResult {
    /// Build a result, deriving `domain` from the URL.
    pub fn new(url: String, title: String, description: String) -> Self {
        let domain = registrable_host(&url).unwrap_or_default();
        Self {
            url,
            title,
            description,
            domain,
        }
    }
}
