//! Configuration management for toolscout.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! environment variables applied per section through `with_env_overrides`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::browser::BrowserEngineConfig;
use crate::llm::{LlmConfig, LlmRole};
use crate::models::{QuotaLimit, QuotaService};
use crate::scrape::RichSourceConfig;

/// Environment variable naming an alternate config file.
pub const CONFIG_ENV: &str = "TOOLSCOUT_CONFIG";

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    env_string(name).and_then(|v| v.parse().ok())
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind, `host:port`, bare host, or bare port.
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3030".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(bind) = env_string("TOOLSCOUT_BIND") {
            self.bind = bind;
        }
        self
    }
}

/// Quota tracker settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuotaConfig {
    /// SQLite file holding the `api_quotas` table.
    pub database_path: PathBuf,
    /// Per-service limit overrides keyed by service name (`search`, `video`, ...).
    pub limits: HashMap<String, QuotaLimit>,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("toolscout.db"),
            limits: HashMap::new(),
        }
    }
}

impl QuotaConfig {
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(path) = env_string("QUOTA_DB_PATH") {
            self.database_path = PathBuf::from(path);
        }
        self
    }

    /// Effective limit for a service: override, else its built-in limit.
    pub fn limit_for(&self, service: QuotaService) -> QuotaLimit {
        self.limits
            .get(service.as_str())
            .copied()
            .unwrap_or_else(|| service.default_limit())
    }

    /// Effective limits for every metered service.
    pub fn resolved_limits(&self) -> HashMap<QuotaService, QuotaLimit> {
        QuotaService::ALL
            .into_iter()
            .map(|service| (service, self.limit_for(service)))
            .collect()
    }
}

/// Web search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Brave Search subscription token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub endpoint: String,
    /// Candidates requested per query.
    pub result_count: u32,
    /// DuckDuckGo Instant Answer endpoint.
    pub fallback_endpoint: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: "https://api.search.brave.com/res/v1/web/search".to_string(),
            result_count: 10,
            fallback_endpoint: "https://api.duckduckgo.com/".to_string(),
        }
    }
}

impl SearchConfig {
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(key) = env_string("BRAVE_SEARCH_API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(count) = env_parse("SEARCH_RESULT_COUNT") {
            self.result_count = count;
        }
        self
    }
}

/// Video platform settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// YouTube Data API key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Base URL of the YouTube Data API.
    pub api_base: String,
    pub max_results: u32,
    /// Videos below this view count are ignored.
    pub min_view_count: u64,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: "https://www.googleapis.com/youtube/v3".to_string(),
            max_results: 15,
            min_view_count: 10_000,
        }
    }
}

impl VideoConfig {
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(key) = env_string("YOUTUBE_API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(views) = env_parse("YOUTUBE_MIN_VIEW_COUNT") {
            self.min_view_count = views;
        }
        self
    }
}

/// Image search settings (Google Custom Search).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageSearchConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_id: Option<String>,
    pub endpoint: String,
}

impl Default for ImageSearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            engine_id: None,
            endpoint: "https://www.googleapis.com/customsearch/v1".to_string(),
        }
    }
}

impl ImageSearchConfig {
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(key) = env_string("GOOGLE_SEARCH_API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(id) = env_string("GOOGLE_SEARCH_ENGINE_ID") {
            self.engine_id = Some(id);
        }
        self
    }

    /// Image search runs only when both credentials are present.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some() && self.engine_id.is_some()
    }
}

/// Primary and fallback text models.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub primary: LlmConfig,
    pub fallback: LlmConfig,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            primary: LlmConfig::default_for(LlmRole::Primary),
            fallback: LlmConfig::default_for(LlmRole::Fallback),
        }
    }
}

/// Probe settings shared by every verifier check.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifyConfig {
    pub timeout_secs: u64,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self { timeout_secs: 5 }
    }
}

/// Complete application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerConfig,
    pub quota: QuotaConfig,
    pub search: SearchConfig,
    pub video: VideoConfig,
    pub images: ImageSearchConfig,
    pub llm: LlmSettings,
    pub browser: BrowserEngineConfig,
    pub rich: RichSourceConfig,
    pub verify: VerifyConfig,
}

impl Settings {
    /// Load settings from defaults, an optional TOML file, and the environment.
    ///
    /// `path` wins over `TOOLSCOUT_CONFIG`; with neither, only defaults and
    /// environment variables apply.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| env_string(CONFIG_ENV).map(PathBuf::from));

        let settings = match path {
            Some(path) => {
                info!("Loading config from {}", path.display());
                Self::from_file(&path)?
            }
            None => {
                debug!("No config file given, using defaults");
                Self::default()
            }
        };

        Ok(settings.with_env_overrides())
    }

    /// Parse a TOML config file without applying environment overrides.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply environment variable overrides to every section.
    pub fn with_env_overrides(self) -> Self {
        Self {
            server: self.server.with_env_overrides(),
            quota: self.quota.with_env_overrides(),
            search: self.search.with_env_overrides(),
            video: self.video.with_env_overrides(),
            images: self.images.with_env_overrides(),
            llm: LlmSettings {
                primary: self.llm.primary.with_env_overrides(LlmRole::Primary),
                fallback: self.llm.fallback.with_env_overrides(LlmRole::Fallback),
            },
            browser: self.browser.with_env_overrides(),
            rich: self.rich,
            verify: self.verify,
        }
    }
}
