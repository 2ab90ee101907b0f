//! Configuration module for bulk
//!
//! Manages where batch log files go and which sinks are active.
//! Configuration is read from `config.toml` in the user's config directory
//! (`~/.config/bulk/config.toml` on Linux) when present, or from an explicit
//! file passed with `--config`. Command-line flags override both.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, File, FileFormat};
use serde::{Deserialize, Serialize};

/// Application configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct BulkConfig {
    /// Directory receiving one `bulk<micros>.log` file per batch
    pub log_dir: PathBuf,

    /// Print each batch to stdout
    pub console: bool,

    /// Write each batch to its own log file
    pub files: bool,
}

impl Default for BulkConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("."),
            console: true,
            files: true,
        }
    }
}

impl BulkConfig {
    /// Get the path to the user config file
    ///
    /// Returns `None` if the system config directory cannot be determined.
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("bulk").join("config.toml"))
    }

    /// Load configuration
    ///
    /// An explicit path must exist. Without one, the user config file is used
    /// if it exists and defaults apply otherwise.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or parsed, or if an
    /// explicit path does not exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load_from(path, true),
            None => match Self::config_path() {
                Some(path) => Self::load_from(&path, false),
                None => Ok(Self::default()),
            },
        }
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be parsed, or if it is
    /// missing while `required` is set.
    pub fn load_from(path: &Path, required: bool) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(
                File::from(path)
                    .format(FileFormat::Toml)
                    .required(required),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Apply command-line overrides
    #[must_use]
    pub fn with_overrides(mut self, log_dir: Option<PathBuf>, no_console: bool, no_files: bool) -> Self {
        if let Some(dir) = log_dir {
            self.log_dir = dir;
        }
        if no_console {
            self.console = false;
        }
        if no_files {
            self.files = false;
        }
        self
    }
}
