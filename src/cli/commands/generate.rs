//! One-shot generation command.

use console::style;

use crate::config::Settings;
use crate::pipeline::{Components, GenerateError};
use crate::quota::QuotaTracker;

/// Run the pipeline for `tool_name` and print the result.
pub async fn cmd_generate(settings: &Settings, tool_name: &str, no_quota_db: bool) -> anyhow::Result<()> {
    let components = if no_quota_db {
        let quota = QuotaTracker::in_memory().with_limits(settings.quota.resolved_limits());
        Components::with_quota(settings, quota)?
    } else {
        Components::from_settings(settings)?
    };

    eprintln!("{} Generating data for {}", style("→").cyan(), style(tool_name).bold());

    match components.generator.auto_generate(tool_name).await {
        Ok(result) => {
            if result.success {
                eprintln!("{} All fields resolved", style("✓").green());
            } else {
                let count = result.errors.as_ref().map_or(0, Vec::len);
                eprintln!(
                    "{} {} field(s) need manual correction",
                    style("!").yellow(),
                    count
                );
                for error in result.errors.iter().flatten() {
                    eprintln!(
                        "  {} {}: {}",
                        style("✗").red(),
                        error.field,
                        error.error.as_deref().unwrap_or("invalid")
                    );
                }
            }
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Err(GenerateError::UnknownTool { tool_name, reason }) => {
            eprintln!(
                "{} Unknown tool '{}': {}",
                style("✗").red(),
                tool_name,
                reason
            );
            std::process::exit(2);
        }
        Err(e) => Err(e.into()),
    }
}
