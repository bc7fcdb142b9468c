use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::{CodeRule, MixOptions};
use crate::error::{AppError, MixError};

/// Run configuration.
///
/// Every field has a default, so a config file only needs the values it
/// changes. Command-line flags are applied on top of whatever is loaded here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Column holding the identifier the category code is cut from
    pub identifier_column: String,
    /// First character of the category code (0-based)
    pub code_start: usize,
    /// One past the last character of the category code
    pub code_end: usize,
    /// Number of groups to build
    pub group_count: usize,
    /// Directory the output tables are written to
    pub output_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            identifier_column: "Roll".to_string(),
            code_start: 4,
            code_end: 6,
            group_count: 1,
            output_dir: PathBuf::from("output"),
        }
    }
}

impl AppConfig {
    /// Platform config location, e.g. `~/.config/branch-mix/config.json` on Linux
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "branch-mix").map(|dirs| dirs.config_dir().join("config.json"))
    }

    pub fn from_json_str(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(contents)
    }

    /// Load the config from an explicit path, else from the default location.
    ///
    /// An explicit path must exist and parse. A missing file at the default
    /// location is normal and yields the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, AppError> {
        if let Some(path) = explicit {
            return Self::load_file(path);
        }

        match Self::default_config_path() {
            Some(path) if path.exists() => Self::load_file(&path),
            Some(path) => {
                info!("No config file at {:?}. Using defaults.", path);
                Ok(Self::default())
            }
            None => {
                warn!("Could not determine config directory. Using defaults.");
                Ok(Self::default())
            }
        }
    }

    fn load_file(path: &Path) -> Result<Self, AppError> {
        info!("Loading config from: {:?}", path);
        let contents = fs::read_to_string(path).map_err(|source| AppError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents).map_err(|source| AppError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn code_rule(&self) -> Result<CodeRule, MixError> {
        CodeRule::new(self.code_start, self.code_end)
    }

    /// Validated options for one run
    pub fn mix_options(&self) -> Result<MixOptions, MixError> {
        Ok(MixOptions {
            identifier_column: self.identifier_column.clone(),
            rule: self.code_rule()?,
            group_count: self.group_count,
        })
    }
}
