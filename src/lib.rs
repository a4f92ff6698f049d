//! PyInstaller build assistant for Python GUI scripts.
//!
//! Given a script and the toolkit it uses (plain Tk or CustomTkinter), the
//! library works out the hidden imports and data files PyInstaller would
//! otherwise miss, encodes a deterministic command line, and runs it:
//!
//! - [`bundler::resolve`] inspects the script and the Python environment
//! - [`bundler::build`] turns a merged [`bundler::BuildPlan`] into an invocation
//! - [`bundler::invoke`] runs it with capture, timeout and cancellation
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bundler;
pub mod cli;
pub mod error;
pub mod metadata;

// Re-export commonly used types
pub use error::{BundlerError, CliError, Result};
