//! Command execution functions for bundler operations.
//!
//! - [`build`] - one script, optionally as a dry run
//! - [`batch`] - every target in a manifest, concurrently

pub mod batch;
pub mod build;

use super::{RuntimeConfig, ToolArgs};
use crate::bundler::{
    BundlerTool, PythonPackageLocator, Result, default_python, detect_bundler,
};
use std::path::PathBuf;

/// Interpreter from `--python` / `KODEGEN_PYTHON`, else the first on `PATH`.
pub(crate) fn python_for(tool: &ToolArgs) -> PathBuf {
    tool.python.clone().unwrap_or_else(default_python)
}

pub(crate) fn locator_for(tool: &ToolArgs) -> PythonPackageLocator {
    PythonPackageLocator::new(python_for(tool))
}

/// Finds and probes PyInstaller for a real run.
pub(crate) async fn detect_tool(tool: &ToolArgs) -> Result<BundlerTool> {
    detect_bundler(tool.bundler.as_deref(), &python_for(tool)).await
}

/// Tells the user which PyInstaller will run.
pub(crate) fn report_tool(tool: &BundlerTool, config: &RuntimeConfig) -> std::io::Result<()> {
    let mut command = tool.program().display().to_string();
    for arg in tool.leading_args() {
        command.push(' ');
        command.push_str(arg);
    }
    match tool.version() {
        Some(version) => config.progress(&format!("Using PyInstaller {version} ({command})")),
        None => config.progress(&format!("Using {command}")),
    }
}

/// Picks the PyInstaller entry point without running it, for dry runs.
pub(crate) fn assume_tool(tool: &ToolArgs) -> BundlerTool {
    if let Some(explicit) = &tool.bundler {
        return BundlerTool::new(explicit);
    }
    match crate::bundler::builder::PYINSTALLER_ON_PATH.as_ref() {
        Some(path) => BundlerTool::new(path),
        None => BundlerTool::python_module(python_for(tool)),
    }
}
