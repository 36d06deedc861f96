//! Basic path: website, media and text assembled from independent providers.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use super::{GenerateError, ToolDataSource};
use crate::image::ImageLocator;
use crate::llm::TextGenerator;
use crate::models::{AutoGenerateResult, GeneratedData};
use crate::search::{SearchError, SearchService};
use crate::verify::{verify_all_fields, FieldsToVerify, ResourceVerifier};
use crate::video::VideoLocator;

pub struct BasicSource {
    search: SearchService,
    images: ImageLocator,
    videos: VideoLocator,
    text: TextGenerator,
    verifier: Arc<dyn ResourceVerifier>,
}

impl BasicSource {
    pub fn new(
        search: SearchService,
        images: ImageLocator,
        videos: VideoLocator,
        text: TextGenerator,
        verifier: Arc<dyn ResourceVerifier>,
    ) -> Self {
        Self {
            search,
            images,
            videos,
            text,
            verifier,
        }
    }
}

#[async_trait]
impl ToolDataSource for BasicSource {
    fn name(&self) -> &'static str {
        "basic"
    }

    async fn generate(&self, tool_name: &str) -> Result<Option<AutoGenerateResult>, GenerateError> {
        let found = self.search.resolve(tool_name).await.map_err(|e| match e {
            SearchError::UnknownTool { tool_name, reason } => {
                GenerateError::UnknownTool { tool_name, reason }
            }
            other => GenerateError::Failed(other.to_string()),
        })?;
        let website_url = found.url;
        let snippet = found.description;

        let image_url = self.images.locate(&website_url, tool_name, &snippet).await;
        let video_url = self.videos.locate(&website_url, tool_name, None).await;
        let description = self
            .text
            .generate_description(tool_name, &website_url, &snippet)
            .await;

        let context = if snippet.trim().is_empty() {
            description.as_str()
        } else {
            snippet.as_str()
        };
        let category = self.text.classify_category(tool_name, context).await;
        let tool_type = self
            .text
            .classify_tool_type(tool_name, &website_url, &snippet)
            .await;

        let data = GeneratedData::basic(
            website_url,
            image_url,
            video_url,
            description,
            category,
            tool_type,
        );

        let summary = verify_all_fields(
            self.verifier.as_ref(),
            FieldsToVerify {
                website_url: &data.website_url,
                image_url: &data.image_url,
                video_url: &data.video_url,
                description: &data.description,
            },
        )
        .await;

        if summary.all_valid {
            info!("All fields verified for '{}'", tool_name);
            Ok(Some(AutoGenerateResult::success(data)))
        } else {
            warn!(
                "{} field(s) failed verification for '{}'",
                summary.results.len(),
                tool_name
            );
            Ok(Some(AutoGenerateResult::partial(
                data.to_partial(),
                summary.results,
            )))
        }
    }
}
