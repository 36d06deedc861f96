//! Headless browser rendering for JavaScript-heavy pages.
//!
//! A [`BrowserSession`] owns one Chrome process (or one remote DevTools
//! connection) and its CDP handler task. [`BrowserSession::scoped`] is the
//! only way the rest of the crate acquires one, so the browser is closed on
//! every path, including when extraction fails.

mod config;

pub use config::BrowserEngineConfig;

use anyhow::Result;
use async_trait::async_trait;
#[cfg(feature = "browser")]
use futures::future::BoxFuture;

#[cfg(feature = "browser")]
use std::time::Duration;

#[cfg(feature = "browser")]
use anyhow::Context;
#[cfg(feature = "browser")]
use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
#[cfg(feature = "browser")]
use chromiumoxide::cdp::browser_protocol::page::NavigateParams;
#[cfg(feature = "browser")]
use chromiumoxide::{Browser, BrowserConfig, Page};
#[cfg(feature = "browser")]
use futures::StreamExt;
#[cfg(feature = "browser")]
use tokio::task::JoinHandle;
#[cfg(feature = "browser")]
use tracing::{debug, info, warn};

#[cfg(feature = "browser")]
use crate::http_client::BROWSER_USER_AGENT;

/// Fetches the fully rendered HTML of a page.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    async fn render(&self, url: &str) -> Result<String>;
}

/// How a session ends. A launched browser is closed; a remote one may be
/// shared with other clients, so it is only disconnected.
#[cfg(feature = "browser")]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shutdown {
    Close,
    Disconnect,
}

#[cfg(feature = "browser")]
impl Shutdown {
    fn for_config(config: &BrowserEngineConfig) -> Self {
        if config.remote_url.is_some() {
            Self::Disconnect
        } else {
            Self::Close
        }
    }
}

/// A live browser plus the task driving its CDP connection.
#[cfg(feature = "browser")]
pub struct BrowserSession {
    browser: Option<Browser>,
    handler: JoinHandle<()>,
    config: BrowserEngineConfig,
    shutdown: Shutdown,
}

#[cfg(feature = "browser")]
impl BrowserSession {
    /// Common Chrome executable paths to check.
    const CHROME_PATHS: &'static [&'static str] = &[
        // Linux
        "/usr/bin/google-chrome",
        "/usr/bin/google-chrome-stable",
        "/usr/bin/chromium",
        "/usr/bin/chromium-browser",
        "/snap/bin/chromium",
        // macOS
        "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
        "/Applications/Chromium.app/Contents/MacOS/Chromium",
        "/opt/google/chrome/google-chrome",
    ];

    fn find_chrome() -> Result<std::path::PathBuf> {
        for path in Self::CHROME_PATHS {
            let p = std::path::Path::new(path);
            if p.exists() {
                debug!("Found Chrome at: {}", path);
                return Ok(p.to_path_buf());
            }
        }

        for cmd in &[
            "google-chrome",
            "google-chrome-stable",
            "chromium",
            "chromium-browser",
        ] {
            if let Ok(output) = std::process::Command::new("which").arg(cmd).output() {
                if output.status.success() {
                    let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
                    if !path.is_empty() {
                        debug!("Found Chrome in PATH: {}", path);
                        return Ok(std::path::PathBuf::from(path));
                    }
                }
            }
        }

        Err(anyhow::anyhow!(
            "Chrome/Chromium not found. Install it or set BROWSER_URL to a remote DevTools endpoint"
        ))
    }

    /// Launch a local browser, or connect to `remote_url` when configured.
    pub async fn launch(config: &BrowserEngineConfig) -> Result<Self> {
        let (browser, mut handler) = match config.remote_url.as_deref() {
            Some(remote_url) => Self::connect_remote(remote_url, config).await?,
            None => {
                info!("Launching browser (headless={})", config.headless);
                let mut builder = BrowserConfig::builder()
                    .chrome_executable(Self::find_chrome()?)
                    .request_timeout(Duration::from_secs(config.timeout));

                // with_head means NOT headless
                if !config.headless {
                    builder = builder.with_head();
                }

                builder = builder
                    .arg("--disable-blink-features=AutomationControlled")
                    .arg("--disable-dev-shm-usage")
                    .arg("--no-first-run")
                    .arg("--no-default-browser-check")
                    .arg("--no-sandbox")
                    .arg("--disable-gpu");
                for arg in &config.chrome_args {
                    builder = builder.arg(arg);
                }

                let browser_config = builder
                    .build()
                    .map_err(|e| anyhow::anyhow!("Failed to build browser config: {}", e))?;
                Browser::launch(browser_config)
                    .await
                    .context("Failed to launch browser")?
            }
        };

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        Ok(Self {
            browser: Some(browser),
            handler,
            config: config.clone(),
            shutdown: Shutdown::for_config(config),
        })
    }

    async fn connect_remote(
        url: &str,
        config: &BrowserEngineConfig,
    ) -> Result<(Browser, chromiumoxide::Handler)> {
        info!("Connecting to remote browser at {}", url);

        // Resolve the WebSocket URL from the /json/version endpoint
        let http_url = url
            .replace("ws://", "http://")
            .replace("wss://", "https://");
        let version_url = format!("{}/json/version", http_url.trim_end_matches('/'));

        let resp: serde_json::Value = reqwest::Client::new()
            .get(&version_url)
            .timeout(Duration::from_secs(config.timeout))
            .send()
            .await
            .context("Failed to connect to remote browser")?
            .json()
            .await
            .context("Failed to parse browser version info")?;

        let ws_url = resp
            .get("webSocketDebuggerUrl")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow::anyhow!("No webSocketDebuggerUrl in response"))?;

        let handler_config = chromiumoxide::handler::HandlerConfig {
            request_timeout: Duration::from_secs(config.timeout),
            ..Default::default()
        };

        Browser::connect_with_config(ws_url, handler_config)
            .await
            .context("Failed to connect to remote browser")
    }

    /// Run `f` against a fresh session, closing the browser afterwards
    /// whether or not `f` succeeded.
    pub async fn scoped<T, F>(config: &BrowserEngineConfig, f: F) -> Result<T>
    where
        F: for<'s> FnOnce(&'s mut BrowserSession) -> BoxFuture<'s, Result<T>>,
    {
        let mut session = Self::launch(config).await?;
        let result = f(&mut session).await;
        session.close().await;
        result
    }

    /// Navigate a new tab to `url` and return its rendered HTML.
    pub async fn render(&mut self, url: &str) -> Result<String> {
        let browser = self
            .browser
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("browser already closed"))?;
        let page = browser.new_page("about:blank").await?;

        let result = self.render_inner(&page, url).await;
        if let Err(e) = page.close().await {
            debug!("Failed to close page: {}", e);
        }
        result
    }

    async fn render_inner(&self, page: &Page, url: &str) -> Result<String> {
        page.execute(SetUserAgentOverrideParams::new(
            BROWSER_USER_AGENT.to_string(),
        ))
        .await?;

        debug!("Navigating to {}", url);
        let nav_params = NavigateParams::builder()
            .url(url)
            .build()
            .map_err(|e| anyhow::anyhow!("Invalid URL: {}", e))?;

        tokio::time::timeout(
            Duration::from_secs(self.config.timeout),
            page.execute(nav_params),
        )
        .await
        .map_err(|_| {
            anyhow::anyhow!(
                "Navigation timed out after {}s for {}",
                self.config.timeout,
                url
            )
        })?
        .map_err(|e| anyhow::anyhow!("Navigation failed for {}: {}", url, e))?;

        // Client-rendered sections appear after the load event
        tokio::time::sleep(Duration::from_millis(self.config.settle_ms)).await;

        Ok(page.content().await?)
    }

    /// Close a launched browser, or drop the connection to a remote one,
    /// then stop the handler task.
    pub async fn close(&mut self) {
        if let Some(mut browser) = self.browser.take() {
            match self.shutdown {
                Shutdown::Close => {
                    if let Err(e) = browser.close().await {
                        warn!("Failed to close browser cleanly: {}", e);
                    }
                    let _ = browser.wait().await;
                }
                Shutdown::Disconnect => {
                    debug!("Disconnecting from remote browser");
                    drop(browser);
                }
            }
        }
        self.handler.abort();
    }
}

#[cfg(feature = "browser")]
impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.handler.abort();
    }
}

/// [`PageRenderer`] that launches a scoped browser session per page.
pub struct BrowserRenderer {
    config: BrowserEngineConfig,
}

impl BrowserRenderer {
    pub fn new(config: BrowserEngineConfig) -> Self {
        Self { config }
    }
}

#[cfg(feature = "browser")]
#[async_trait]
impl PageRenderer for BrowserRenderer {
    async fn render(&self, url: &str) -> Result<String> {
        let url = url.to_string();
        BrowserSession::scoped(&self.config, move |session| {
            Box::pin(async move { session.render(&url).await })
        })
        .await
    }
}

// Stub for when browser feature is disabled
#[cfg(not(feature = "browser"))]
#[async_trait]
impl PageRenderer for BrowserRenderer {
    async fn render(&self, _url: &str) -> Result<String> {
        let _ = &self.config;
        Err(anyhow::anyhow!(
            "Browser support not compiled. Rebuild with: cargo build --features browser"
        ))
    }
}
