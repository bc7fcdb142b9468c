use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use super::formatter::BracketedFormatter;
use crate::error::AppError;

/// Default filter directive for a `-v` count: 0 -> info, 1 -> debug, more -> trace
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber.
///
/// Events go to stderr so stdout stays free for the summary tables. When
/// `log_dir` is given, a `branch_mix_<timestamp>.log` file is created there
/// as well, without ANSI colors. `RUST_LOG` overrides the verbosity.
///
/// # Returns
/// * `Ok(Some(path))` of the log file, or `Ok(None)` when logging to stderr only
/// * `Err(AppError)` if the log file can't be created or a subscriber is already set
pub fn setup_logging(verbosity: u8, log_dir: Option<&Path>) -> Result<Option<PathBuf>, AppError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let stderr_layer = fmt::layer()
        .event_format(BracketedFormatter)
        .with_writer(std::io::stderr);

    let (file_layer, log_path) = match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir).map_err(|e| {
                AppError::Logging(format!("failed to create log directory {:?}: {}", dir, e))
            })?;

            let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
            let log_path = dir.join(format!("branch_mix_{}.log", timestamp));
            let file = fs::OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&log_path)
                .map_err(|e| {
                    AppError::Logging(format!("failed to create log file {:?}: {}", log_path, e))
                })?;

            let layer = fmt::layer()
                .event_format(BracketedFormatter)
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false);
            (Some(layer), Some(log_path))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| AppError::Logging(e.to_string()))?;

    if let Some(path) = &log_path {
        info!("Log file created at: {:?}", path);
    }

    Ok(log_path)
}
