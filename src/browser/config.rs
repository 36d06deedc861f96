//! Browser engine configuration types.

use serde::{Deserialize, Serialize};

/// Headless browser configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserEngineConfig {
    /// Run in headless mode (default: true).
    /// Set to false to watch the browser while debugging extraction.
    pub headless: bool,

    /// Navigation timeout in seconds.
    pub timeout: u64,

    /// Additional Chrome arguments.
    pub chrome_args: Vec<String>,

    /// Remote Chrome DevTools URL (e.g., "ws://localhost:9222").
    /// If set, connects to an existing browser instead of launching one.
    /// Can also be set via BROWSER_URL environment variable.
    pub remote_url: Option<String>,

    /// Extra wait after navigation for client-side rendering, in milliseconds.
    pub settle_ms: u64,
}

impl Default for BrowserEngineConfig {
    fn default() -> Self {
        Self {
            headless: true,
            timeout: 30,
            chrome_args: Vec::new(),
            remote_url: None,
            settle_ms: 2000,
        }
    }
}

impl BrowserEngineConfig {
    /// Apply environment variable overrides.
    ///
    /// - `BROWSER_URL` - Remote Chrome DevTools URL
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = std::env::var("BROWSER_URL") {
            if !val.trim().is_empty() {
                self.remote_url = Some(val.trim().to_string());
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BrowserEngineConfig::default();
        assert!(config.headless);
        assert_eq!(config.timeout, 30);
        assert_eq!(config.settle_ms, 2000);
        assert!(config.remote_url.is_none());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: BrowserEngineConfig = toml::from_str("headless = false\ntimeout = 60").unwrap();
        assert!(!config.headless);
        assert_eq!(config.timeout, 60);
        assert_eq!(config.settle_ms, 2000);
        assert!(config.chrome_args.is_empty());
    }
}
