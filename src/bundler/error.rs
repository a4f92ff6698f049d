//! Error types for the resolve → build → invoke pipeline.

use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Result type alias for bundler operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while resolving, encoding, or running a build.
#[derive(Error, Debug)]
pub enum Error {
    /// The script (or another caller-supplied path) is unusable.
    #[error("invalid build target {}: {reason}", path.display())]
    InvalidTarget { path: PathBuf, reason: String },

    /// A toolkit package could not be located in the Python environment.
    #[error("cannot resolve package `{package}`: {reason}")]
    Resolution {
        package: String,
        reason: String,
        /// Remediation shown to the user.
        hint: String,
    },

    /// A token cannot be passed as a single command-line argument.
    #[error("cannot encode argument {token:?}: {reason}")]
    Encoding { token: String, reason: String },

    /// No PyInstaller installation was found.
    #[error("PyInstaller not found: {reason}")]
    BundlerNotFound { reason: String },

    /// The bundler exited with a nonzero status.
    #[error("bundler exited with code {exit_code}\n{captured_output}")]
    ExternalTool {
        exit_code: i32,
        captured_output: String,
    },

    /// The bundler ran past its deadline and was terminated.
    #[error("bundler timed out after {}s and was terminated", after.as_secs())]
    Timeout {
        after: Duration,
        captured_output: String,
    },

    /// The caller cancelled the build; the bundler was terminated.
    #[error("build cancelled; bundler was terminated")]
    Cancelled { captured_output: String },

    /// Spawning or waiting on a command failed.
    #[error("failed to run `{command}`: {error}")]
    CommandFailed {
        command: String,
        #[source]
        error: std::io::Error,
    },

    /// File system error with the operation and path that failed.
    #[error("{context} {}: {error}", path.display())]
    Fs {
        context: &'static str,
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    #[error("{0}")]
    GenericError(String),
}

/// Adds file system context to I/O results.
pub trait ErrorExt<T> {
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.as_ref().to_path_buf(),
            error,
        })
    }
}

/// Turns a missing value into a [`Error::GenericError`].
pub trait Context<T> {
    fn context<C: std::fmt::Display>(self, context: C) -> Result<T>;
}

impl<T> Context<T> for Option<T> {
    fn context<C: std::fmt::Display>(self, context: C) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }
}
