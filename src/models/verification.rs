//! Field verification results.

use serde::{Deserialize, Serialize};

/// Outcome of checking a single field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub field: String,
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl VerificationResult {
    pub fn valid(field: &str) -> Self {
        Self {
            field: field.to_string(),
            valid: true,
            error: None,
        }
    }

    pub fn invalid(field: &str, error: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            valid: false,
            error: Some(error.into()),
        }
    }
}

/// Combined outcome of verifying a field set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationSummary {
    /// True only when every check passed.
    pub all_valid: bool,
    /// Failing checks only.
    pub results: Vec<VerificationResult>,
}
