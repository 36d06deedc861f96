//! Shared utility functions.
//!
//! This module contains reusable utilities used across the codebase:
//! - `html`: HTML entity decoding and length capping
//! - `links`: host extraction and link normalisation
//! - `attempt`: ordered fallback chains

pub mod attempt;
mod html;
mod links;

pub use attempt::{first_success, Attempt};
pub use html::{decode_html_entities, normalize_whitespace, truncate_with_ellipsis};
pub use links::{absolutize, registrable_host};
