//! Application settings.
//!
//! Defaults for the command line, optionally loaded from a JSON file in the
//! XDG configuration directory (`~/.config/portsweep/settings.json`).

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Location of the default settings file, if a home directory is known.
pub fn default_settings_file() -> ConfigResult<PathBuf> {
    let project =
        ProjectDirs::from("com", "portsweep", "portsweep").ok_or(ConfigError::DirectoryNotFound)?;
    Ok(project.config_dir().join("settings.json"))
}

/// Application-wide defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Host scanned when none is given.
    pub default_host: String,
    /// Port specification scanned when none is given.
    pub default_ports: String,
    /// Concurrency limit; the logical CPU count when absent.
    pub default_workers: Option<usize>,
    /// Overall timeout in seconds.
    pub default_timeout_secs: u64,
    /// Per-probe connect timeout in milliseconds; unbounded when absent.
    pub connect_timeout_ms: Option<u64>,
    /// Default output format.
    pub default_output_format: String,
    /// Log filter used when neither `RUST_LOG` nor a verbosity flag is given.
    pub log_level: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_host: "127.0.0.1".to_string(),
            default_ports: "5000-5500".to_string(),
            default_workers: None,
            default_timeout_secs: 5,
            connect_timeout_ms: None,
            default_output_format: "plain".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

impl AppSettings {
    /// Load settings from the default location, falling back to defaults
    /// when the file does not exist.
    pub fn load() -> ConfigResult<Self> {
        let file = match default_settings_file() {
            Ok(file) => file,
            Err(ConfigError::DirectoryNotFound) => return Ok(Self::default()),
            Err(e) => return Err(e),
        };

        if !file.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&file)
    }

    /// Load settings from a specific file. The file must exist.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        serde_json::from_str(&content).map_err(|e| ConfigError::InvalidFormat(e.to_string()))
    }

    /// Load from `path` when given, otherwise from the default location.
    pub fn resolve(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => Self::load(),
        }
    }
}
