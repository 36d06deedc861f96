//! Rich source configuration.

use serde::{Deserialize, Serialize};

/// Where tool detail pages live and how their sections are titled.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RichSourceConfig {
    /// Detail pages are `{base_url}{slug}`.
    pub base_url: String,
    pub headings: SectionHeadings,
}

impl Default for RichSourceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.futurepedia.io/tool/".to_string(),
            headings: SectionHeadings::default(),
        }
    }
}

impl RichSourceConfig {
    /// Detail page URL for `slug`.
    pub fn detail_url(&self, slug: &str) -> String {
        if self.base_url.ends_with('/') {
            format!("{}{}", self.base_url, slug)
        } else {
            format!("{}/{}", self.base_url, slug)
        }
    }
}

/// Heading text that introduces each section of a detail page.
///
/// Matching is by substring, so "Pros" also matches "Pros and Cons".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionHeadings {
    pub key_features: String,
    pub pros: String,
    pub cons: String,
    pub who_is_using: String,
    pub pricing: String,
    pub how_we_rated: String,
    /// The unique-selling-point heading must contain both parts.
    pub unique_prefix: String,
    pub unique_suffix: String,
}

impl Default for SectionHeadings {
    fn default() -> Self {
        Self {
            key_features: "Key Features".to_string(),
            pros: "Pros".to_string(),
            cons: "Cons".to_string(),
            who_is_using: "Who is Using".to_string(),
            pricing: "Pricing".to_string(),
            how_we_rated: "How We Rated".to_string(),
            unique_prefix: "What Makes".to_string(),
            unique_suffix: "Unique".to_string(),
        }
    }
}
