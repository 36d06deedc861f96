//! Per-service API quota tracking.
//!
//! Usage counters live in a pluggable [`QuotaStore`]. Every read applies the
//! daily/monthly reset rules before reporting `can_use`, and every store
//! failure degrades to a permissive status so generation is never blocked by
//! the tracker itself.
//!
//! Increments are read-then-write and not atomic across concurrent requests;
//! two runs racing on the same service may lose an increment.

mod memory;
mod sqlite;

pub use memory::MemoryQuotaStore;
pub use sqlite::SqliteQuotaStore;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Local};
use tracing::{debug, info, warn};

use crate::models::{QuotaLimit, QuotaRecord, QuotaService, QuotaStatus};

/// Result type for quota store operations.
pub type QuotaResult<T> = Result<T, QuotaError>;

/// Errors from quota store operations.
#[derive(Debug, thiserror::Error)]
pub enum QuotaError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Invalid stored record for {service}: {reason}")]
    Corrupt { service: String, reason: String },
}

impl From<rusqlite::Error> for QuotaError {
    fn from(e: rusqlite::Error) -> Self {
        QuotaError::Database(e.to_string())
    }
}

/// Storage backend for quota records, one per service name.
#[async_trait]
pub trait QuotaStore: Send + Sync {
    async fn get(&self, service: &str) -> QuotaResult<Option<QuotaRecord>>;

    /// Insert or replace the record for `record.service`.
    async fn save(&self, record: &QuotaRecord) -> QuotaResult<()>;

    async fn list(&self) -> QuotaResult<Vec<QuotaRecord>>;
}

type Clock = Arc<dyn Fn() -> DateTime<Local> + Send + Sync>;

/// Reset counters whose period has rolled over. Returns true if anything changed.
///
/// The daily counter resets when the day-of-month or month differs from the
/// last daily reset; the monthly counter resets when the month or year differs
/// from the last monthly reset. The two checks are independent.
pub fn apply_resets(record: &mut QuotaRecord, now: DateTime<Local>) -> bool {
    let mut changed = false;

    let last_daily = record.last_reset_daily;
    if last_daily.day() != now.day() || last_daily.month() != now.month() {
        record.used_daily = 0;
        record.last_reset_daily = now;
        changed = true;
    }

    let last_monthly = record.last_reset_monthly;
    if last_monthly.month() != now.month() || last_monthly.year() != now.year() {
        record.used_monthly = 0;
        record.last_reset_monthly = now;
        changed = true;
    }

    changed
}

/// Tracks and enforces per-service usage limits.
#[derive(Clone)]
pub struct QuotaTracker {
    store: Arc<dyn QuotaStore>,
    limits: HashMap<QuotaService, QuotaLimit>,
    clock: Clock,
}

impl QuotaTracker {
    /// Create a tracker using the built-in limits and the local clock.
    pub fn new(store: Arc<dyn QuotaStore>) -> Self {
        Self {
            store,
            limits: HashMap::new(),
            clock: Arc::new(Local::now),
        }
    }

    /// Tracker over an in-memory store, for tests and dry runs.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryQuotaStore::new()))
    }

    pub fn with_limits(mut self, limits: HashMap<QuotaService, QuotaLimit>) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> DateTime<Local> + Send + Sync + 'static,
    {
        self.clock = Arc::new(clock);
        self
    }

    pub fn limit_for(&self, service: QuotaService) -> QuotaLimit {
        self.limits
            .get(&service)
            .copied()
            .unwrap_or_else(|| service.default_limit())
    }

    /// Current usage for `service`, creating its record on first use.
    ///
    /// Never fails: a store error yields a permissive zero-usage status.
    pub async fn check_quota(&self, service: QuotaService) -> QuotaStatus {
        match self.load_current(service).await {
            Ok(record) => {
                let status = QuotaStatus::from(&record);
                debug!(
                    "Quota {}: {}/{} daily, {}/{} monthly (can_use={})",
                    service,
                    status.used_daily,
                    status.limit_daily,
                    status.used_monthly,
                    status.limit_monthly,
                    status.can_use
                );
                status
            }
            Err(e) => {
                warn!("Quota check failed for {}, allowing usage: {}", service, e);
                QuotaStatus::fail_open(service.as_str(), self.limit_for(service))
            }
        }
    }

    /// Whether a call to `service` is currently allowed.
    pub async fn can_use(&self, service: QuotaService) -> bool {
        self.check_quota(service).await.can_use
    }

    /// Record one successful call. Failures are logged and swallowed.
    pub async fn increment_quota(&self, service: QuotaService) {
        if let Err(e) = self.try_increment(service).await {
            warn!("Failed to increment quota for {}: {}", service, e);
        }
    }

    /// Status of every metered service.
    pub async fn get_all_quotas(&self) -> Vec<QuotaStatus> {
        let mut statuses = Vec::with_capacity(QuotaService::ALL.len());
        for service in QuotaService::ALL {
            statuses.push(self.check_quota(service).await);
        }
        statuses
    }

    async fn try_increment(&self, service: QuotaService) -> QuotaResult<()> {
        let mut record = self.load_current(service).await?;
        record.used_daily = record.used_daily.saturating_add(1);
        record.used_monthly = record.used_monthly.saturating_add(1);
        self.store.save(&record).await?;
        debug!(
            "Incremented quota {}: {} daily, {} monthly",
            service, record.used_daily, record.used_monthly
        );
        Ok(())
    }

    /// Fetch or create the record and bring it up to date with resets and limits.
    async fn load_current(&self, service: QuotaService) -> QuotaResult<QuotaRecord> {
        let now = (self.clock)();
        let limit = self.limit_for(service);

        let Some(mut record) = self.store.get(service.as_str()).await? else {
            info!("Creating quota record for {}", service);
            let record = QuotaRecord::new(service.as_str(), limit, now);
            self.store.save(&record).await?;
            return Ok(record);
        };

        let mut changed = apply_resets(&mut record, now);
        if record.limit_daily != limit.daily || record.limit_monthly != limit.monthly {
            record.limit_daily = limit.daily;
            record.limit_monthly = limit.monthly;
            changed = true;
        }
        if changed {
            self.store.save(&record).await?;
        }
        Ok(record)
    }
}
