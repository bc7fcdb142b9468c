//! Split a roster into groups by the category code embedded in each
//! record's identifier (e.g. the branch code of a roll number).
//!
//! Two policies are computed side by side on independent copies of the
//! per-category buckets:
//! - round-robin ("group-branch-wise") mixing, which interleaves categories
//! - uniform mixing, which fills each group from the largest remaining category
//!
//! Both come with a per-group category-count summary.

pub mod config;
pub mod core;
pub mod error;
pub mod logging;

pub use crate::config::AppConfig;
pub use crate::core::{run_mix, MixOptions, MixOutcome};
pub use crate::error::{AppError, IoError, MixError};
