//! API quota models.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// External services whose usage is metered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuotaService {
    /// Web search API.
    Search,
    /// Video platform search API.
    Video,
    /// Primary text model.
    TextPrimary,
    /// Fallback text model.
    TextFallback,
}

impl QuotaService {
    pub const ALL: [QuotaService; 4] = [
        QuotaService::Search,
        QuotaService::Video,
        QuotaService::TextPrimary,
        QuotaService::TextFallback,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::Video => "video",
            Self::TextPrimary => "text-primary",
            Self::TextFallback => "text-fallback",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "search" => Some(Self::Search),
            "video" => Some(Self::Video),
            "text-primary" => Some(Self::TextPrimary),
            "text-fallback" => Some(Self::TextFallback),
            _ => None,
        }
    }

    /// Free-tier limits of the backing providers.
    pub fn default_limit(&self) -> QuotaLimit {
        match self {
            Self::Search => QuotaLimit::new(67, 2000),
            Self::Video => QuotaLimit::new(99, 3000),
            Self::TextPrimary => QuotaLimit::new(1500, 45000),
            Self::TextFallback => QuotaLimit::new(100, 3000),
        }
    }
}

impl std::fmt::Display for QuotaService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Daily and monthly call limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaLimit {
    pub daily: u32,
    pub monthly: u32,
}

impl QuotaLimit {
    pub const fn new(daily: u32, monthly: u32) -> Self {
        Self { daily, monthly }
    }
}

impl Default for QuotaLimit {
    /// Limits applied to services with no known free tier.
    fn default() -> Self {
        Self::new(100, 3000)
    }
}

/// Persisted usage counters for one service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotaRecord {
    pub service: String,
    pub used_daily: u32,
    pub used_monthly: u32,
    pub limit_daily: u32,
    pub limit_monthly: u32,
    pub last_reset_daily: DateTime<Local>,
    pub last_reset_monthly: DateTime<Local>,
}

impl QuotaRecord {
    /// Zero-usage record created lazily on first check.
    pub fn new(service: &str, limit: QuotaLimit, now: DateTime<Local>) -> Self {
        Self {
            service: service.to_string(),
            used_daily: 0,
            used_monthly: 0,
            limit_daily: limit.daily,
            limit_monthly: limit.monthly,
            last_reset_daily: now,
            last_reset_monthly: now,
        }
    }

    pub fn can_use(&self) -> bool {
        self.used_daily < self.limit_daily && self.used_monthly < self.limit_monthly
    }
}

/// Snapshot of a service's quota, as reported to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaStatus {
    pub service: String,
    pub used_daily: u32,
    pub used_monthly: u32,
    pub limit_daily: u32,
    pub limit_monthly: u32,
    pub percentage_used_daily: f64,
    pub percentage_used_monthly: f64,
    pub can_use: bool,
}

impl QuotaStatus {
    /// Permissive status reported when the quota store is unavailable.
    pub fn fail_open(service: &str, limit: QuotaLimit) -> Self {
        Self {
            service: service.to_string(),
            used_daily: 0,
            used_monthly: 0,
            limit_daily: limit.daily,
            limit_monthly: limit.monthly,
            percentage_used_daily: 0.0,
            percentage_used_monthly: 0.0,
            can_use: true,
        }
    }
}

impl From<&QuotaRecord> for QuotaStatus {
    fn from(record: &QuotaRecord) -> Self {
        Self {
            service: record.service.clone(),
            used_daily: record.used_daily,
            used_monthly: record.used_monthly,
            limit_daily: record.limit_daily,
            limit_monthly: record.limit_monthly,
            percentage_used_daily: percentage(record.used_daily, record.limit_daily),
            percentage_used_monthly: percentage(record.used_monthly, record.limit_monthly),
            can_use: record.can_use(),
        }
    }
}

fn percentage(used: u32, limit: u32) -> f64 {
    if limit == 0 {
        return 100.0;
    }
    f64::from(used) / f64::from(limit) * 100.0
}
