//! `tokensync.toml` configuration
//!
//! ```toml
//! baseline = ".tokensync/baseline.json"
//! archive_dir = ".tokensync/archive"
//! allow_breaking = false
//! format = "summary"
//! ```
//!
//! Every key is optional. Command-line flags override file values.

use crate::commands::compare::OutputFormat;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Looked up in the current directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "tokensync.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Baseline snapshot compared against and updated by `--update-baseline`
    pub baseline: PathBuf,
    /// Archive root for superseded baselines
    pub archive_dir: PathBuf,
    pub allow_breaking: bool,
    pub format: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            baseline: PathBuf::from(".tokensync/baseline.json"),
            archive_dir: PathBuf::from(".tokensync/archive"),
            allow_breaking: false,
            format: OutputFormat::Summary,
        }
    }
}

impl Config {
    /// Load configuration
    ///
    /// An explicit path must exist. Without one, `tokensync.toml` in the
    /// current directory is used when present, defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !fallback.exists() {
                    tracing::debug!("no configuration file, using defaults");
                    return Ok(Self::default());
                }
                fallback
            }
        };

        let content = std::fs::read_to_string(&path)
            .map_err(|e| format!("cannot read config {}: {}", path.display(), e))?;
        let config = Self::from_toml_str(&content)
            .map_err(|e| format!("invalid config {}: {}", path.display(), e))?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
