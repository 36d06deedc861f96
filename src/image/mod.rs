//! Logo and product image resolution.
//!
//! Candidates are tried best-quality first and each must pass the image
//! verifier before it is accepted. The generated initials placeholder at the
//! end of the chain is never verified, so a URL is always returned.

mod google;

pub use google::{logo_query, GoogleImageSearch};

use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use tracing::{debug, info};

use crate::utils::{first_success, registrable_host, Attempt};
use crate::verify::ResourceVerifier;

const PLACEHOLDER_HOST: &str = "ui-avatars.com";

/// Image search API used to find a tool's logo.
#[async_trait]
pub trait ImageSearch: Send + Sync {
    fn is_configured(&self) -> bool;

    async fn search_logo(&self, tool_name: &str, domain: Option<&str>) -> Option<String>;
}

pub fn brandfetch_url(domain: &str) -> String {
    format!("https://img.brandfetch.io/{}", domain)
}

pub fn unavatar_url(domain: &str) -> String {
    format!("https://unavatar.io/{}?fallback=false", domain)
}

pub fn clearbit_url(domain: &str) -> String {
    format!("https://logo.clearbit.com/{}", domain)
}

pub fn favicon_url(domain: &str) -> String {
    format!("https://www.google.com/s2/favicons?domain={}&sz=256", domain)
}

/// Generated two-letter initials image for `tool_name`.
pub fn placeholder_url(tool_name: &str) -> String {
    format!(
        "https://{}/api/?name={}&size=512&background=gradient&color=ffffff&bold=true&font-size=0.4&length=2",
        PLACEHOLDER_HOST,
        urlencoding::encode(tool_name.trim())
    )
}

/// Whether `url` is a generated placeholder rather than a real image.
pub fn is_placeholder(url: &str) -> bool {
    url.contains(PLACEHOLDER_HOST)
}

/// Ordered image lookup that never fails.
#[derive(Clone)]
pub struct ImageLocator {
    verifier: Arc<dyn ResourceVerifier>,
    search: Arc<dyn ImageSearch>,
}

impl ImageLocator {
    pub fn new(verifier: Arc<dyn ResourceVerifier>, search: Arc<dyn ImageSearch>) -> Self {
        Self { verifier, search }
    }

    async fn verified(&self, url: String) -> Option<String> {
        let check = self.verifier.verify_image(&url).await;
        if check.valid {
            Some(url)
        } else {
            debug!(
                "Rejected image {}: {}",
                url,
                check.error.unwrap_or_default()
            );
            None
        }
    }

    /// Best image for the tool.
    ///
    /// Domain-keyed logo services need a parseable `website_url`; when it
    /// does not parse they are skipped and the search runs unscoped.
    /// `_context` is the description text, accepted for callers that have it.
    pub async fn locate(&self, website_url: &str, tool_name: &str, _context: &str) -> String {
        let domain = registrable_host(website_url);
        let mut attempts: Vec<Attempt<'_, String>> = Vec::new();

        if let Some(domain) = domain.as_deref() {
            attempts.push(Attempt::new(
                "brandfetch",
                self.verified(brandfetch_url(domain)).boxed(),
            ));
            attempts.push(Attempt::new(
                "unavatar",
                self.verified(unavatar_url(domain)).boxed(),
            ));
            attempts.push(Attempt::new(
                "clearbit",
                self.verified(clearbit_url(domain)).boxed(),
            ));
        }

        if self.search.is_configured() {
            let domain = domain.as_deref();
            attempts.push(Attempt::new(
                "image-search",
                async move {
                    let url = self.search.search_logo(tool_name, domain).await?;
                    self.verified(url).await
                }
                .boxed(),
            ));
        }

        if let Some(domain) = domain.as_deref() {
            attempts.push(Attempt::new(
                "favicon",
                self.verified(favicon_url(domain)).boxed(),
            ));
        }

        match first_success(attempts).await {
            Some((source, url)) => {
                info!("Image for '{}' from {}: {}", tool_name, source, url);
                url
            }
            None => {
                info!("No image found for '{}', using placeholder", tool_name);
                placeholder_url(tool_name)
            }
        }
    }
}
