//! Text model configuration.

use serde::{Deserialize, Serialize};

use crate::models::QuotaService;

/// Text generation API flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// Google Gemini `generateContent` API
    #[default]
    Gemini,
    /// OpenAI-compatible chat completions (OpenAI, Groq, Together.ai, etc.)
    OpenAI,
    /// Ollama API (local)
    Ollama,
}

impl LlmProvider {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "gemini" | "google" => Some(Self::Gemini),
            "openai" | "groq" | "together" => Some(Self::OpenAI),
            "ollama" => Some(Self::Ollama),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::OpenAI => "openai",
            Self::Ollama => "ollama",
        }
    }

    pub fn default_endpoint(&self) -> &'static str {
        match self {
            Self::Gemini => "https://generativelanguage.googleapis.com",
            Self::OpenAI => "https://api.groq.com/openai",
            Self::Ollama => "http://localhost:11434",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini-1.5-flash",
            Self::OpenAI => "llama-3.1-70b-versatile",
            Self::Ollama => "llama3.1:8b",
        }
    }
}

/// Endpoint for a provider name as typed by the user. Distinguishes the
/// OpenAI-compatible hosts that share [`LlmProvider::OpenAI`].
fn endpoint_for_name(name: &str) -> Option<&'static str> {
    match name.to_lowercase().as_str() {
        "groq" => Some("https://api.groq.com/openai"),
        "openai" => Some("https://api.openai.com"),
        "together" => Some("https://api.together.xyz"),
        other => LlmProvider::from_str(other).map(|p| p.default_endpoint()),
    }
}

/// Position of a model in the primary-to-fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmRole {
    Primary,
    Fallback,
}

impl LlmRole {
    fn env_prefix(&self) -> &'static str {
        match self {
            Self::Primary => "LLM_PRIMARY",
            Self::Fallback => "LLM_FALLBACK",
        }
    }

    /// Quota counter charged for calls in this role.
    pub fn quota_service(&self) -> QuotaService {
        match self {
            Self::Primary => QuotaService::TextPrimary,
            Self::Fallback => QuotaService::TextFallback,
        }
    }
}

/// Configuration for one text model.
///
/// `endpoint` and `model` may be left empty in a config file; they are
/// filled from the provider's defaults by [`LlmConfig::with_env_overrides`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub provider: LlmProvider,
    #[serde(default)]
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default)]
    pub model: String,
    /// Maximum tokens in response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Temperature for generation (0.0 - 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_max_tokens() -> u32 {
    500
}

fn default_temperature() -> f32 {
    0.3
}

impl LlmConfig {
    pub fn for_provider(provider: LlmProvider) -> Self {
        Self {
            provider,
            endpoint: provider.default_endpoint().to_string(),
            api_key: None,
            model: provider.default_model().to_string(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }

    /// Built-in configuration: Gemini as primary, Groq as fallback.
    pub fn default_for(role: LlmRole) -> Self {
        match role {
            LlmRole::Primary => Self::for_provider(LlmProvider::Gemini),
            LlmRole::Fallback => Self::for_provider(LlmProvider::OpenAI),
        }
    }

    /// A model is usable when it has a key or runs locally.
    pub fn is_configured(&self) -> bool {
        self.provider == LlmProvider::Ollama
            || self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    /// Apply environment variable overrides for the model in `role`.
    ///
    /// Supported env vars, with `<ROLE>` being `LLM_PRIMARY` or `LLM_FALLBACK`:
    /// - `<ROLE>_PROVIDER`: "gemini", "openai", "groq", "together" or "ollama"
    /// - `<ROLE>_ENDPOINT`: API endpoint (defaults based on provider)
    /// - `<ROLE>_API_KEY`: API key
    /// - `<ROLE>_MODEL`, `<ROLE>_MAX_TOKENS`, `<ROLE>_TEMPERATURE`
    ///
    /// Without an explicit key the provider's conventional variable is read:
    /// `GEMINI_API_KEY` for Gemini, `GROQ_API_KEY` then `OPENAI_API_KEY` for
    /// OpenAI-compatible providers.
    pub fn with_env_overrides(mut self, role: LlmRole) -> Self {
        let prefix = role.env_prefix();
        let var = |suffix: &str| {
            std::env::var(format!("{}_{}", prefix, suffix))
                .ok()
                .filter(|v| !v.trim().is_empty())
        };

        let explicit_provider = var("PROVIDER");
        if let Some(ref name) = explicit_provider {
            if let Some(provider) = LlmProvider::from_str(name) {
                self.provider = provider;
            }
        }

        let explicit_endpoint = var("ENDPOINT");
        if let Some(ref endpoint) = explicit_endpoint {
            self.endpoint = endpoint.clone();
        } else if let Some(endpoint) = explicit_provider.as_deref().and_then(endpoint_for_name) {
            self.endpoint = endpoint.to_string();
        }

        if let Some(key) = var("API_KEY") {
            self.api_key = Some(key);
        }
        if self.api_key.is_none() {
            self.api_key = match self.provider {
                LlmProvider::Gemini => std::env::var("GEMINI_API_KEY").ok(),
                LlmProvider::OpenAI => std::env::var("GROQ_API_KEY")
                    .or_else(|_| std::env::var("OPENAI_API_KEY"))
                    .ok(),
                LlmProvider::Ollama => None,
            }
            .filter(|k| !k.trim().is_empty());
        }

        if let Some(model) = var("MODEL") {
            self.model = model;
        } else if explicit_provider.is_some() && self.model.is_empty() {
            self.model = self.provider.default_model().to_string();
        }
        if let Some(n) = var("MAX_TOKENS").and_then(|v| v.parse().ok()) {
            self.max_tokens = n;
        }
        if let Some(t) = var("TEMPERATURE").and_then(|v| v.parse().ok()) {
            self.temperature = t;
        }

        self.fill_provider_defaults()
    }

    /// Fill an empty endpoint or model from the provider defaults.
    pub fn fill_provider_defaults(mut self) -> Self {
        if self.endpoint.trim().is_empty() {
            self.endpoint = self.provider.default_endpoint().to_string();
        }
        if self.model.trim().is_empty() {
            self.model = self.provider.default_model().to_string();
        }
        self.endpoint = self.endpoint.trim_end_matches('/').to_string();
        self
    }
}
