//! Resource and field verification.
//!
//! [`ResourceVerifier`] answers "does this URL resolve to what we expect" for
//! websites, images and videos. [`verify_all_fields`] runs every check for an
//! assembled tool record concurrently and keeps only the failures.

mod video_ref;

pub use video_ref::VideoRef;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use tracing::debug;

use crate::http_client::probe_client;
use crate::models::{VerificationResult, VerificationSummary};

pub const FIELD_WEBSITE: &str = "websiteUrl";
pub const FIELD_IMAGE: &str = "imageUrl";
pub const FIELD_VIDEO: &str = "videoUrl";
pub const FIELD_DESCRIPTION: &str = "description";

/// Accepted description length range, in characters.
pub const DESCRIPTION_MIN: usize = 150;
pub const DESCRIPTION_MAX: usize = 200;

const YOUTUBE_OEMBED: &str = "https://www.youtube.com/oembed";
const VIMEO_OEMBED: &str = "https://vimeo.com/api/oembed.json";

/// Reachability and type checks for remote resources.
#[async_trait]
pub trait ResourceVerifier: Send + Sync {
    /// The page answers with a success status (after redirects) or 403.
    async fn verify_url(&self, url: &str) -> VerificationResult;

    /// The URL answers with a success status and an `image/*` content type.
    async fn verify_image(&self, url: &str) -> VerificationResult;

    /// The URL names a video that the hosting platform can resolve.
    async fn verify_video(&self, url: &str) -> VerificationResult;
}

/// Verifier backed by HEAD probes and platform oEmbed lookups.
#[derive(Clone)]
pub struct HttpVerifier {
    client: Client,
    youtube_oembed: String,
    vimeo_oembed: String,
}

impl HttpVerifier {
    /// Create a verifier whose probes give up after `timeout`.
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        Ok(Self::with_client(probe_client(timeout)?))
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            youtube_oembed: YOUTUBE_OEMBED.to_string(),
            vimeo_oembed: VIMEO_OEMBED.to_string(),
        }
    }

    /// Point oEmbed lookups at alternate endpoints.
    pub fn with_oembed_endpoints(mut self, youtube: &str, vimeo: &str) -> Self {
        self.youtube_oembed = youtube.to_string();
        self.vimeo_oembed = vimeo.to_string();
        self
    }

    async fn probe(&self, url: &str) -> Result<reqwest::Response, reqwest::Error> {
        self.client
            .head(url)
            .header(
                header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            )
            .header(header::ACCEPT_LANGUAGE, "en-US,en;q=0.5")
            .send()
            .await
    }

    async fn check_reachable(&self, field: &str, url: &str) -> VerificationResult {
        match self.probe(url).await {
            Ok(resp) => {
                let status = resp.status();
                if status.is_success() || status == StatusCode::FORBIDDEN {
                    VerificationResult::valid(field)
                } else {
                    VerificationResult::invalid(field, format!("HTTP {}", status))
                }
            }
            Err(e) => VerificationResult::invalid(field, describe_error(&e)),
        }
    }

    async fn oembed_resolves(&self, endpoint: &str, video_url: &str) -> VerificationResult {
        let result = self
            .client
            .get(endpoint)
            .query(&[("url", video_url), ("format", "json")])
            .send()
            .await;

        match result {
            Ok(resp) if resp.status().is_success() => VerificationResult::valid(FIELD_VIDEO),
            Ok(resp) => {
                debug!("oEmbed lookup for {} returned {}", video_url, resp.status());
                VerificationResult::invalid(FIELD_VIDEO, "Video not found or unavailable")
            }
            Err(e) => VerificationResult::invalid(FIELD_VIDEO, describe_error(&e)),
        }
    }
}

#[async_trait]
impl ResourceVerifier for HttpVerifier {
    async fn verify_url(&self, url: &str) -> VerificationResult {
        self.check_reachable(FIELD_WEBSITE, url).await
    }

    async fn verify_image(&self, url: &str) -> VerificationResult {
        let resp = match self.probe(url).await {
            Ok(resp) => resp,
            Err(e) => return VerificationResult::invalid(FIELD_IMAGE, describe_error(&e)),
        };

        let status = resp.status();
        if !status.is_success() {
            return VerificationResult::invalid(FIELD_IMAGE, format!("HTTP {}", status.as_u16()));
        }

        let content_type = resp
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if content_type.to_ascii_lowercase().starts_with("image/") {
            VerificationResult::valid(FIELD_IMAGE)
        } else {
            let shown = if content_type.is_empty() {
                "none"
            } else {
                content_type.as_str()
            };
            VerificationResult::invalid(FIELD_IMAGE, format!("Invalid content type: {}", shown))
        }
    }

    async fn verify_video(&self, url: &str) -> VerificationResult {
        match VideoRef::parse(url) {
            Some(VideoRef::YouTube(id)) => {
                let canonical = VideoRef::youtube_watch_url(&id);
                self.oembed_resolves(&self.youtube_oembed, &canonical).await
            }
            Some(VideoRef::Vimeo(id)) => {
                let canonical = format!("https://vimeo.com/{}", id);
                self.oembed_resolves(&self.vimeo_oembed, &canonical).await
            }
            Some(VideoRef::YouTubeSearch) => self.check_reachable(FIELD_VIDEO, url).await,
            None => VerificationResult::invalid(FIELD_VIDEO, "Invalid video URL format"),
        }
    }
}

fn describe_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "Request timed out".to_string()
    } else if e.is_redirect() {
        "Too many redirects".to_string()
    } else if e.is_connect() {
        format!("Connection failed: {}", e)
    } else {
        e.to_string()
    }
}

/// Check that a description is within the accepted length range. No I/O.
pub fn verify_description(description: &str) -> VerificationResult {
    let length = description.trim().chars().count();
    if (DESCRIPTION_MIN..=DESCRIPTION_MAX).contains(&length) {
        VerificationResult::valid(FIELD_DESCRIPTION)
    } else {
        VerificationResult::invalid(
            FIELD_DESCRIPTION,
            format!(
                "Description must be {}-{} characters (current: {})",
                DESCRIPTION_MIN, DESCRIPTION_MAX, length
            ),
        )
    }
}

/// Field set checked before a basic-path result is accepted.
#[derive(Debug, Clone, Copy)]
pub struct FieldsToVerify<'a> {
    pub website_url: &'a str,
    pub image_url: &'a str,
    /// Empty when no video was found; an absent video is not an error.
    pub video_url: &'a str,
    pub description: &'a str,
}

/// Run every check concurrently, reporting only the failures.
pub async fn verify_all_fields(
    verifier: &dyn ResourceVerifier,
    fields: FieldsToVerify<'_>,
) -> VerificationSummary {
    let video = async {
        if fields.video_url.trim().is_empty() {
            VerificationResult::valid(FIELD_VIDEO)
        } else {
            verifier.verify_video(fields.video_url).await
        }
    };

    let (website, image, video) = futures::join!(
        verifier.verify_url(fields.website_url),
        verifier.verify_image(fields.image_url),
        video,
    );
    let description = verify_description(fields.description);

    let results: Vec<VerificationResult> = [website, image, video, description]
        .into_iter()
        .filter(|r| !r.valid)
        .collect();

    VerificationSummary {
        all_valid: results.is_empty(),
        results,
    }
}
