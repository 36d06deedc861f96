//! Shared HTTP client construction.
//!
//! Two flavours are used across the pipeline: an API client identifying as
//! toolscout for JSON endpoints, and a probe client that presents a desktop
//! browser user agent so websites answer reachability checks the way they
//! would for a visitor.

use std::time::Duration;

use reqwest::redirect::Policy;
use reqwest::Client;

/// User agent for calls to documented JSON APIs.
pub const USER_AGENT: &str = concat!("toolscout/", env!("CARGO_PKG_VERSION"));

/// Desktop Chrome user agent used for website probes and rendering.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Default timeout for API calls.
pub const API_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum redirects followed by probes.
const MAX_REDIRECTS: usize = 10;

/// Client for JSON APIs (search, video, image search, LLMs).
pub fn api_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Client for reachability probes and page fetches.
///
/// Follows redirects; `timeout` bounds the whole request so an unresponsive
/// host counts as a failure rather than a hang.
pub fn probe_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(BROWSER_USER_AGENT)
        .timeout(timeout)
        .connect_timeout(timeout)
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}
