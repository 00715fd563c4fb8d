//! Calculator configuration.
//!
//! Loaded from a JSON file; every field is optional and falls back to its
//! default.
//!
//! ```json
//! {
//!   "tolerance": { "abs": 1e-12, "rel": 1e-10 },
//!   "prompt": "> "
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::approx::Tolerance;
use crate::error::LinalgError;

/// Errors raised while loading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON for [`CalcConfig`].
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A value is outside its accepted range.
    #[error("invalid configuration: {0}")]
    Invalid(#[from] LinalgError),
}

/// Settings for a calculator session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalcConfig {
    /// Zero threshold and comparison tolerance for row reduction.
    pub tolerance: Tolerance,
    /// Prompt printed before each line in interactive mode.
    pub prompt: String,
}

impl Default for CalcConfig {
    fn default() -> Self {
        Self {
            tolerance: Tolerance::default(),
            prompt: "> ".to_string(),
        }
    }
}

impl CalcConfig {
    /// Reads and validates a JSON configuration file.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the file cannot be read or parsed, or
    /// holds an invalid tolerance.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the tolerance values.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] for a negative or non-finite tolerance.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tolerance.validate()?;
        Ok(())
    }
}
