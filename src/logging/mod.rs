//! Logging for branch-mix
//!
//! This module provides:
//! - Bracketed event formatting
//! - Logging to stderr, plus an optional timestamped log file
//! - Verbosity-driven default filters, overridable with `RUST_LOG`

mod formatter;
mod setup;

pub use formatter::BracketedFormatter;
pub use setup::{default_directive, setup_logging};
