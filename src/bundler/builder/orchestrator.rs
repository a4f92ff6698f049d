//! Main build orchestration and coordination.
//!
//! This module provides the [`Bundler`] orchestrator that runs the
//! resolve → merge → build → invoke pipeline for one target at a time.

use crate::bundler::{
    BuildOverrides, BuildPlan, BuildTarget, InvocationDescriptor, InvocationResult, InvokeOptions,
    Result, command, invoker,
    resolver::{self, PackageLocator, PythonPackageLocator, Resolution},
};

use super::BundlerTool;

/// Main build orchestrator.
///
/// Holds what is shared between requests: the bundler entry point, the package
/// locator, and any manifest overrides. Each call builds one target from
/// scratch; nothing carries over between calls.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_gui::bundler::{
///     Bundler, BuildTargetBuilder, BundlerTool, InvokeOptions, PythonPackageLocator, ToolkitKind,
/// };
///
/// # async fn example() -> kodegen_bundler_gui::bundler::Result<()> {
/// let bundler = Bundler::new(
///     BundlerTool::python_module("python3"),
///     PythonPackageLocator::new("python3"),
/// );
///
/// let target = BuildTargetBuilder::new()
///     .script_path("main.py")
///     .toolkit(ToolkitKind::Extended)
///     .windowed(true)
///     .build()?;
///
/// let result = bundler.bundle(&target, InvokeOptions::default()).await?;
/// println!("{}", result.captured_output);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Bundler<L = PythonPackageLocator> {
    tool: BundlerTool,
    locator: L,
    overrides: BuildOverrides,
}

impl<L: PackageLocator + Sync> Bundler<L> {
    /// Creates a bundler with no overrides.
    pub fn new(tool: BundlerTool, locator: L) -> Self {
        Self {
            tool,
            locator,
            overrides: BuildOverrides::default(),
        }
    }

    /// Sets overrides applied to every target this bundler builds.
    pub fn with_overrides(mut self, overrides: BuildOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn tool(&self) -> &BundlerTool {
        &self.tool
    }

    pub fn overrides(&self) -> &BuildOverrides {
        &self.overrides
    }

    /// Resolves `target` and merges this bundler's overrides over the result.
    pub async fn plan(&self, target: &BuildTarget) -> Result<BuildPlan> {
        let resolution = self.resolve(target).await?;
        BuildPlan::merge(target, resolution, &self.overrides)
    }

    /// Like [`plan`](Self::plan), with overrides layered over this bundler's own.
    ///
    /// Scalars in `extra` win; lists are concatenated after the bundler's.
    pub async fn plan_with(&self, target: &BuildTarget, extra: &BuildOverrides) -> Result<BuildPlan> {
        let resolution = self.resolve(target).await?;
        let overrides = layer(&self.overrides, extra);
        BuildPlan::merge(target, resolution, &overrides)
    }

    async fn resolve(&self, target: &BuildTarget) -> Result<Resolution> {
        let resolution = resolver::resolve(target, &self.locator).await?;
        log::debug!(
            "Resolved {}: {} hidden imports, {} data mappings",
            target.script_path().display(),
            resolution.hidden_imports.len(),
            resolution.mappings.len()
        );
        Ok(resolution)
    }

    /// Produces the bundler invocation for `target` without running it.
    pub async fn prepare(&self, target: &BuildTarget) -> Result<InvocationDescriptor> {
        let plan = self.plan(target).await?;
        command::build(&plan, &self.tool)
    }

    /// Builds `target`: resolve, merge, encode, and run the bundler.
    ///
    /// Every error before the bundler is spawned is a configuration error; no
    /// process is started in that case.
    pub async fn bundle(
        &self,
        target: &BuildTarget,
        options: InvokeOptions,
    ) -> Result<InvocationResult> {
        let descriptor = self.prepare(target).await?;
        invoker::invoke(descriptor, options).await
    }
}

/// Lays `top` over `base`, field by field.
fn layer(base: &BuildOverrides, top: &BuildOverrides) -> BuildOverrides {
    if top.is_empty() {
        return base.clone();
    }

    BuildOverrides {
        name: top.name.clone().or_else(|| base.name.clone()),
        onefile: top.onefile.or(base.onefile),
        windowed: top.windowed.or(base.windowed),
        icon: top.icon.clone().or_else(|| base.icon.clone()),
        clean: top.clean.or(base.clean),
        hidden_imports: base
            .hidden_imports
            .iter()
            .chain(&top.hidden_imports)
            .cloned()
            .collect(),
        exclude_hidden_imports: base
            .exclude_hidden_imports
            .iter()
            .chain(&top.exclude_hidden_imports)
            .cloned()
            .collect(),
        add_data: base.add_data.iter().chain(&top.add_data).cloned().collect(),
    }
}
