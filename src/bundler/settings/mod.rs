//! Configuration structures for GUI script builds.
//!
//! This module provides the build target description handed in by the caller,
//! the resource and hidden-import value types, and the field-by-field overrides
//! that are merged over a resolved configuration to form a [`BuildPlan`].

mod builder;
mod core;
mod mapping;
mod overrides;
mod toolkit;

// Re-export all public types
pub use builder::BuildTargetBuilder;
pub use core::BuildTarget;
pub use mapping::{HiddenImport, ResourceMapping};
pub use overrides::{BuildOverrides, BuildPlan};
pub use toolkit::ToolkitKind;
