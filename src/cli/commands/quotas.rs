//! Quota usage command.

use std::sync::Arc;

use anyhow::Context;
use console::style;

use crate::config::Settings;
use crate::quota::{QuotaTracker, SqliteQuotaStore};

/// Print usage for every metered service.
pub async fn cmd_quotas(settings: &Settings) -> anyhow::Result<()> {
    let store = SqliteQuotaStore::open(&settings.quota.database_path).with_context(|| {
        format!(
            "Failed to open quota database {}",
            settings.quota.database_path.display()
        )
    })?;
    let tracker = QuotaTracker::new(Arc::new(store)).with_limits(settings.quota.resolved_limits());

    println!("\n{}", style("API Quotas").bold());
    println!("{}", "-".repeat(64));
    println!(
        "{:<15} {:>18} {:>22}  {}",
        "Service", "Daily", "Monthly", "Status"
    );

    for status in tracker.get_all_quotas().await {
        let state = if status.can_use {
            style("available").green().to_string()
        } else {
            style("exhausted").red().to_string()
        };
        println!(
            "{:<15} {:>8}/{:<5} {:>4.0}% {:>9}/{:<6} {:>4.0}%  {}",
            status.service,
            status.used_daily,
            status.limit_daily,
            status.percentage_used_daily,
            status.used_monthly,
            status.limit_monthly,
            status.percentage_used_monthly,
            state
        );
    }

    Ok(())
}
