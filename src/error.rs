//! Comprehensive error types for bundler operations.
//!
//! This module defines the crate-level error type with actionable error messages,
//! recovery suggestions, and the process exit code each failure maps to.

use crate::bundler::Error;
use thiserror::Error;

/// Result type alias for bundler operations
pub type Result<T> = std::result::Result<T, BundlerError>;

/// Exit code for configuration errors raised before the bundler is spawned (`EX_CONFIG`).
pub const EXIT_CONFIG_ERROR: i32 = 78;

/// Exit code reported when the bundler exceeded its allotted time.
pub const EXIT_TIMEOUT: i32 = 124;

/// Exit code reported when the build was cancelled (SIGINT convention).
pub const EXIT_CANCELLED: i32 = 130;

/// Main error type for all bundler operations
#[derive(Error, Debug)]
pub enum BundlerError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Bundler errors
    #[error("{0}")]
    Bundler(#[from] Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Manifest could not be read or is malformed
    #[error("Invalid manifest {path}: {reason}")]
    InvalidManifest {
        /// Manifest path as given by the user
        path: String,
        /// Reason for the error
        reason: String,
    },

    /// One or more targets of a batch failed
    #[error("{failed} of {total} batch targets failed")]
    BatchFailed {
        /// Number of failed targets
        failed: usize,
        /// Number of targets in the manifest
        total: usize,
        /// Exit code of the first failure
        exit_code: i32,
    },
}

impl BundlerError {
    /// Process exit code for this error.
    ///
    /// Configuration errors get [`EXIT_CONFIG_ERROR`], bundler failures mirror the
    /// bundler's own code, and timeouts and cancellations get their own codes.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Cli(CliError::BatchFailed { exit_code, .. }) => *exit_code,
            Self::Cli(_) | Self::Toml(_) => EXIT_CONFIG_ERROR,
            Self::Bundler(e) => match e {
                Error::InvalidTarget { .. }
                | Error::Resolution { .. }
                | Error::Encoding { .. }
                | Error::BundlerNotFound { .. }
                | Error::Fs { .. } => EXIT_CONFIG_ERROR,
                Error::ExternalTool { exit_code, .. } if *exit_code != 0 => *exit_code,
                Error::Timeout { .. } => EXIT_TIMEOUT,
                Error::Cancelled { .. } => EXIT_CANCELLED,
                _ => 1,
            },
            _ => 1,
        }
    }

    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            Self::Bundler(Error::Resolution { hint, .. }) => vec![hint.clone()],
            Self::Bundler(Error::BundlerNotFound { .. }) => vec![
                "Install PyInstaller: pip install pyinstaller".to_string(),
                "Or point --bundler / KODEGEN_PYINSTALLER at the pyinstaller executable".to_string(),
            ],
            Self::Bundler(Error::InvalidTarget { path, .. }) => {
                vec![format!("Check that {} exists and is readable", path.display())]
            }
            Self::Bundler(Error::Encoding { .. }) => vec![
                "Rename or move the file so its path has no newlines, quotes or data separators"
                    .to_string(),
            ],
            Self::Bundler(Error::ExternalTool { .. }) => vec![
                "Read the PyInstaller output above; packaging failures usually need a configuration change"
                    .to_string(),
            ],
            Self::Bundler(Error::Timeout { .. }) => {
                vec!["Increase --timeout or run without one".to_string()]
            }
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }

    /// Check if this error is recoverable
    ///
    /// Only operational outcomes are; nothing is retried automatically either way.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Bundler(Error::Timeout { .. }) | Self::Bundler(Error::Cancelled { .. })
        )
    }
}
