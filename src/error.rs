use std::path::PathBuf;

use thiserror::Error;

/// Failures raised by the grouping core. Any of these aborts the whole run.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MixError {
    #[error("identifier column `{column}` not found in input")]
    MissingColumn { column: String },

    #[error(
        "row {row}: identifier `{value}` is shorter than the {required} characters needed for a category code"
    )]
    MalformedIdentifier {
        row: usize,
        value: String,
        required: usize,
    },

    #[error("group count must be at least 1, got {0}")]
    InvalidGroupCount(usize),

    #[error("category code range {start}..{end} is empty")]
    InvalidCodeRange { start: usize, end: usize },
}

/// Failures while reading rosters or rendering and writing output tables.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("csv input has no header row")]
    MissingHeaders,
    #[error("artifact name `{name}` is not a plain file name")]
    InvalidArtifactName { name: String },
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("failed to persist {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: tempfile::PersistError,
    },
}

/// Application-wide error type returned by the command-line front end.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Mix(#[from] MixError),

    #[error(transparent)]
    Io(#[from] IoError),

    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
