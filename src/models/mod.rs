//! Data models for toolscout.

mod quota;
mod search;
mod tool;
mod verification;

pub use quota::{QuotaLimit, QuotaRecord, QuotaService, QuotaStatus};
pub use search::SearchResult;
pub use tool::{
    AutoGenerateResult, Category, DataSource, GeneratedData, PartialToolData, PricingTier,
    Ratings, ScrapedToolData, ToolType,
};
pub use verification::{VerificationResult, VerificationSummary};
