//! Core BuildTarget struct and accessors.

use super::{HiddenImport, ResourceMapping, ToolkitKind};
use std::path::{Path, PathBuf};

/// One GUI script to package, as requested by the caller.
///
/// Constructed via [`BuildTargetBuilder`](super::BuildTargetBuilder) at the start
/// of a build request and discarded once the bundler returns.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_gui::bundler::{BuildTargetBuilder, ToolkitKind};
///
/// # fn example() -> kodegen_bundler_gui::bundler::Result<()> {
/// let target = BuildTargetBuilder::new()
///     .script_path("app/main.py")
///     .toolkit(ToolkitKind::Extended)
///     .one_file(true)
///     .windowed(true)
///     .build()?;
/// assert_eq!(target.output_name(), "main");
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct BuildTarget {
    pub(super) script_path: PathBuf,
    pub(super) toolkit_kind: ToolkitKind,
    pub(super) output_name: String,
    pub(super) one_file: bool,
    pub(super) windowed: bool,
    pub(super) icon_path: Option<PathBuf>,

    /// Caller-supplied data mappings, in caller order.
    pub(super) extra_data: Vec<ResourceMapping>,

    /// Caller-supplied hidden imports.
    pub(super) extra_hidden_imports: Vec<HiddenImport>,

    /// Wipe the bundler's cache before building.
    pub(super) clean: bool,

    /// Replace an existing output directory without asking.
    pub(super) noconfirm: bool,
}

impl BuildTarget {
    /// Returns the entry script path.
    pub fn script_path(&self) -> &Path {
        &self.script_path
    }

    /// Returns the GUI toolkit.
    pub fn toolkit_kind(&self) -> ToolkitKind {
        self.toolkit_kind
    }

    /// Returns the name of the packaged executable.
    pub fn output_name(&self) -> &str {
        &self.output_name
    }

    /// Returns whether a single-file executable is requested.
    pub fn one_file(&self) -> bool {
        self.one_file
    }

    /// Returns whether the console window is suppressed.
    pub fn windowed(&self) -> bool {
        self.windowed
    }

    /// Returns the icon path, if any.
    pub fn icon_path(&self) -> Option<&Path> {
        self.icon_path.as_deref()
    }

    pub fn extra_data(&self) -> &[ResourceMapping] {
        &self.extra_data
    }

    pub fn extra_hidden_imports(&self) -> &[HiddenImport] {
        &self.extra_hidden_imports
    }

    pub fn clean(&self) -> bool {
        self.clean
    }

    pub fn noconfirm(&self) -> bool {
        self.noconfirm
    }
}
