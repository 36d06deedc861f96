//! Description and classification generation over the text models.

use std::sync::Arc;

use futures::FutureExt;
use tracing::{debug, info, warn};

use super::prompts::{category_prompt, description_prompt, tool_type_prompt};
use super::TextModel;
use crate::models::{Category, ToolType};
use crate::quota::QuotaTracker;
use crate::utils::{decode_html_entities, first_success, truncate_with_ellipsis, Attempt};
use crate::verify::DESCRIPTION_MAX;

/// Decode entities and cap a generated description at the maximum length.
///
/// Short text is kept as-is rather than padded.
pub fn finalize_description(raw: &str) -> String {
    let decoded = decode_html_entities(raw.trim());
    truncate_with_ellipsis(decoded.trim(), DESCRIPTION_MAX)
}

/// Description used when neither a model nor a snippet is available.
pub fn default_description(tool_name: &str) -> String {
    format!(
        "{} is an AI-powered tool for enhanced productivity and automation.",
        tool_name.trim()
    )
}

/// Primary/fallback text generation with per-call quota gating.
#[derive(Clone)]
pub struct TextGenerator {
    primary: Arc<dyn TextModel>,
    fallback: Arc<dyn TextModel>,
    quota: QuotaTracker,
}

impl TextGenerator {
    pub fn new(
        primary: Arc<dyn TextModel>,
        fallback: Arc<dyn TextModel>,
        quota: QuotaTracker,
    ) -> Self {
        Self {
            primary,
            fallback,
            quota,
        }
    }

    /// One quota-gated call. The counter moves only after a successful answer.
    async fn gated(&self, model: &dyn TextModel, prompt: &str) -> Option<String> {
        if !model.is_configured() {
            debug!("{} model not configured, skipping", model.name());
            return None;
        }
        let service = model.quota_service();
        if !self.quota.can_use(service).await {
            warn!("{} quota exhausted, skipping {}", service, model.name());
            return None;
        }

        match model.complete(prompt).await {
            Ok(text) => {
                self.quota.increment_quota(service).await;
                Some(text)
            }
            Err(e) => {
                warn!("{} generation failed: {}", model.name(), e);
                None
            }
        }
    }

    /// Complete `prompt` with the primary model, then the fallback.
    pub async fn complete(&self, prompt: &str) -> Option<String> {
        let attempts = vec![
            Attempt::new("primary", self.gated(self.primary.as_ref(), prompt).boxed()),
            Attempt::new("fallback", self.gated(self.fallback.as_ref(), prompt).boxed()),
        ];
        first_success(attempts).await.map(|(role, text)| {
            debug!("Completion answered by {} model", role);
            text
        })
    }

    /// Complete `prompt` with the primary model only.
    pub async fn complete_primary(&self, prompt: &str) -> Option<String> {
        self.gated(self.primary.as_ref(), prompt).await
    }

    /// Short description of the tool, never empty.
    ///
    /// `snippet` is the search or meta description; it is the fallback text
    /// when no model answers, and the generic sentence covers an empty snippet.
    pub async fn generate_description(
        &self,
        tool_name: &str,
        website_url: &str,
        snippet: &str,
    ) -> String {
        let prompt = description_prompt(tool_name, website_url, snippet);
        if let Some(text) = self.complete(&prompt).await {
            return finalize_description(&text);
        }

        if snippet.trim().is_empty() {
            info!("No description source for '{}', using generic text", tool_name);
            finalize_description(&default_description(tool_name))
        } else {
            info!("Using search snippet as description for '{}'", tool_name);
            finalize_description(snippet)
        }
    }

    /// Category from the primary model, then the fallback; `AI Tools` otherwise.
    pub async fn classify_category(&self, tool_name: &str, context: &str) -> Category {
        match self.complete(&category_prompt(tool_name, context)).await {
            Some(answer) => Category::parse_lenient(&answer),
            None => Category::default(),
        }
    }

    /// Category from the primary model only, used where a generated
    /// category is a nice-to-have rather than required.
    pub async fn classify_category_primary(&self, tool_name: &str, context: &str) -> Category {
        match self.complete_primary(&category_prompt(tool_name, context)).await {
            Some(answer) => Category::parse_lenient(&answer),
            None => Category::default(),
        }
    }

    /// Free or paid; anything but an explicit "Paid" is free.
    pub async fn classify_tool_type(
        &self,
        tool_name: &str,
        website_url: &str,
        context: &str,
    ) -> ToolType {
        match self
            .complete(&tool_type_prompt(tool_name, website_url, context))
            .await
        {
            Some(answer) => ToolType::parse_lenient(&answer),
            None => ToolType::default(),
        }
    }
}
