//! Text models for descriptions, classification and translation.
//!
//! Supports Gemini, OpenAI-compatible chat APIs (Groq by default) and Ollama.

mod client;
mod config;
mod generator;
pub mod prompts;

pub use client::LlmClient;
pub use config::{LlmConfig, LlmProvider, LlmRole};
pub use generator::{default_description, finalize_description, TextGenerator};

use async_trait::async_trait;

use crate::models::QuotaService;

/// Errors that can occur during LLM operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// Failed to connect to LLM service
    #[error("Connection error: {0}")]
    Connection(String),
    /// API returned an error
    #[error("API error: {0}")]
    Api(String),
    /// Failed to parse response
    #[error("Parse error: {0}")]
    Parse(String),
    /// No API key for a hosted provider
    #[error("{0} API key not configured")]
    NotConfigured(String),
    /// LLM is disabled
    #[error("LLM is disabled")]
    Disabled,
}

/// A single text completion backend.
#[async_trait]
pub trait TextModel: Send + Sync {
    fn name(&self) -> &'static str;

    /// Quota counter charged for each successful completion.
    fn quota_service(&self) -> QuotaService;

    fn is_configured(&self) -> bool;

    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Stand-in for a model that is switched off.
pub struct DisabledModel {
    service: QuotaService,
}

impl DisabledModel {
    pub fn new(service: QuotaService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl TextModel for DisabledModel {
    fn name(&self) -> &'static str {
        "disabled"
    }

    fn quota_service(&self) -> QuotaService {
        self.service
    }

    fn is_configured(&self) -> bool {
        false
    }

    async fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
        Err(LlmError::Disabled)
    }
}
