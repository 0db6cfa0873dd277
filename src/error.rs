//! Error types for portsweep.
//!
//! Uses `thiserror` for ergonomic error definitions. Only specification and
//! configuration problems are errors; every network outcome is data.

use crate::types::PortError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that prevent a scan from starting.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("invalid port specification: {0}")]
    InvalidSpec(#[from] PortError),

    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result type alias for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;

/// Settings file errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine configuration directory")]
    DirectoryNotFound,

    #[error("failed to read config file {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("invalid config format: {0}")]
    InvalidFormat(String),
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Top-level error for the command-line front end.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Process exit code for this error.
    ///
    /// Rejected input maps to 2, everything else to 1.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Scan(_) => 2,
            Self::Config(_) | Self::Io(_) => 1,
        }
    }
}

impl From<PortError> for CliError {
    fn from(err: PortError) -> Self {
        Self::Scan(ScanError::InvalidSpec(err))
    }
}

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let spec: CliError = PortError::Empty.into();
        assert_eq!(spec.exit_code(), 2);

        let config: CliError = ScanError::Config("concurrency must be at least 1".into()).into();
        assert_eq!(config.exit_code(), 2);

        let settings: CliError = ConfigError::DirectoryNotFound.into();
        assert_eq!(settings.exit_code(), 1);
    }

    #[test]
    fn test_invalid_spec_message() {
        let err = ScanError::from(PortError::InvalidRange(10, 5));
        assert_eq!(
            err.to_string(),
            "invalid port specification: invalid port range: start (10) > end (5)"
        );
    }
}
