//! PyInstaller build pipeline for GUI scripts.
//!
//! A build request flows through four stages, none of which keeps state
//! between requests:
//!
//! 1. [`resolver`] - validates the target and works out hidden imports and data mappings
//! 2. [`settings`] - merges hand-written overrides into a [`BuildPlan`]
//! 3. [`command`] - encodes the plan as an [`InvocationDescriptor`]
//! 4. [`invoker`] - runs PyInstaller with timeout and cancellation support
//!
//! The [`Bundler`] orchestrator wires the stages together.

pub mod builder;
pub mod command;
pub mod error;
pub mod invoker;
pub mod resolver;
pub mod settings;

pub use builder::{Bundler, BundlerTool, default_python, detect_bundler};
pub use command::{DATA_SEPARATOR, InvocationDescriptor, build};
pub use error::{Error, Result};
pub use invoker::{InvocationResult, InvokeOptions, invoke};
pub use resolver::{PackageLocator, PythonPackageLocator, Resolution, resolve};
pub use settings::{
    BuildOverrides, BuildPlan, BuildTarget, BuildTargetBuilder, HiddenImport, ResourceMapping,
    ToolkitKind,
};
