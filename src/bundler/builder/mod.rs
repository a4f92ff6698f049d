//! Build orchestration and coordination.
//!
//! This module provides the main [`Bundler`] orchestrator that runs the
//! resolve → merge → build → invoke pipeline, and detection of the external
//! PyInstaller tool it drives.
//!
//! # Overview
//!
//! The bundler:
//! 1. Validates the [`BuildTarget`](crate::bundler::BuildTarget) and resolves toolkit requirements
//! 2. Merges manifest overrides into a [`BuildPlan`](crate::bundler::BuildPlan)
//! 3. Encodes the plan as an [`InvocationDescriptor`](crate::bundler::InvocationDescriptor)
//! 4. Runs PyInstaller and classifies its exit
//!
//! # Module Organization
//!
//! - [`orchestrator`] - Main [`Bundler`] struct
//! - [`tool_detection`] - PyInstaller and Python interpreter discovery

mod orchestrator;
mod tool_detection;

pub use orchestrator::Bundler;
pub use tool_detection::{
    BundlerTool, PYINSTALLER_ON_PATH, default_python, detect_bundler, parse_version,
};
