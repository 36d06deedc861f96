//! Auto-generation orchestration.
//!
//! [`AutoGenerator`] tries the rich source first and falls back to the basic
//! source whenever the rich source has nothing or fails. Only an unknown tool
//! reported by the basic source ends the run without a result.

mod basic;
mod build;
mod rich;

pub use basic::BasicSource;
pub use build::Components;
pub use rich::{tool_type_from_pricing, RichSource};

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::models::AutoGenerateResult;

/// Errors that end an auto-generation run.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// No source could identify the tool.
    #[error("Could not find information about \"{tool_name}\": {reason}")]
    UnknownTool { tool_name: String, reason: String },
    #[error("Tool name is required")]
    InvalidInput,
    #[error("Auto-generation failed: {0}")]
    Failed(String),
}

/// One strategy for producing tool data.
#[async_trait]
pub trait ToolDataSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// `Ok(None)` means the source has nothing for this tool.
    async fn generate(&self, tool_name: &str) -> Result<Option<AutoGenerateResult>, GenerateError>;
}

#[derive(Clone)]
pub struct AutoGenerator {
    rich: Arc<dyn ToolDataSource>,
    basic: Arc<dyn ToolDataSource>,
}

impl AutoGenerator {
    pub fn new(rich: Arc<dyn ToolDataSource>, basic: Arc<dyn ToolDataSource>) -> Self {
        Self { rich, basic }
    }

    /// Generate metadata for `tool_name`.
    pub async fn auto_generate(&self, tool_name: &str) -> Result<AutoGenerateResult, GenerateError> {
        let tool_name = tool_name.trim();
        if tool_name.is_empty() {
            return Err(GenerateError::InvalidInput);
        }

        info!("Auto-generating data for '{}'", tool_name);
        match self.rich.generate(tool_name).await {
            Ok(Some(result)) => {
                info!("'{}' answered by {} source", tool_name, self.rich.name());
                return Ok(result);
            }
            Ok(None) => info!(
                "{} source has no record for '{}', falling back",
                self.rich.name(),
                tool_name
            ),
            Err(e) => warn!(
                "{} source failed for '{}', falling back: {}",
                self.rich.name(),
                tool_name,
                e
            ),
        }

        match self.basic.generate(tool_name).await? {
            Some(result) => Ok(result),
            None => Err(GenerateError::UnknownTool {
                tool_name: tool_name.to_string(),
                reason: "No search results found".to_string(),
            }),
        }
    }
}
