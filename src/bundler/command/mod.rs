//! Command building: from a [`BuildPlan`] to an [`InvocationDescriptor`].
//!
//! The builder is a pure function of its inputs. Hidden imports come out in
//! lexicographic order, data mappings in plan order, and boolean switches only
//! when they are set.

mod quoting;

pub use quoting::DATA_SEPARATOR;

use crate::bundler::builder::BundlerTool;
use crate::bundler::error::{ErrorExt, Result};
use crate::bundler::settings::BuildPlan;
use path_absolutize::Absolutize;
use std::path::Path;

/// A fully encoded bundler invocation.
///
/// Immutable once built. [`invoke`](crate::bundler::invoke) takes it by value,
/// so each descriptor runs at most once.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct InvocationDescriptor {
    executable: String,
    arguments: Vec<String>,
}

impl InvocationDescriptor {
    /// Creates a descriptor after checking every token.
    pub fn new(executable: impl AsRef<Path>, arguments: Vec<String>) -> Result<Self> {
        let executable = quoting::path_token(executable.as_ref())?;
        for argument in &arguments {
            quoting::check_token(argument)?;
        }
        Ok(Self {
            executable,
            arguments,
        })
    }

    pub fn executable(&self) -> &str {
        &self.executable
    }

    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    /// Shell-quoted rendering for logs and dry runs.
    pub fn command_line(&self) -> String {
        shell_words::join(std::iter::once(self.executable.as_str()).chain(self.arguments.iter().map(String::as_str)))
    }
}

impl std::fmt::Display for InvocationDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.command_line())
    }
}

/// Serializes `plan` into PyInstaller arguments for `tool`.
///
/// Local paths are made absolute so the result does not depend on the working
/// directory of the bundler process.
///
/// # Errors
///
/// [`Error::Encoding`](crate::bundler::Error::Encoding) if any path or name
/// cannot be passed as a single argument.
pub fn build(plan: &BuildPlan, tool: &BundlerTool) -> Result<InvocationDescriptor> {
    let mut args: Vec<String> = tool.leading_args().to_vec();

    if plan.noconfirm() {
        args.push("--noconfirm".into());
    }
    if plan.clean() {
        args.push("--clean".into());
    }

    args.push("--name".into());
    args.push(quoting::option_value(plan.output_name())?);

    if plan.one_file() {
        args.push("--onefile".into());
    }
    if plan.windowed() {
        args.push("--windowed".into());
    }
    if let Some(icon) = plan.icon_path() {
        args.push("--icon".into());
        args.push(absolute_token(icon)?);
    }

    for import in plan.hidden_imports() {
        args.push("--hidden-import".into());
        args.push(quoting::option_value(import.as_str())?);
    }

    for mapping in plan.mappings() {
        let source = absolute_token(mapping.source())?;
        let dest = quoting::path_token(mapping.dest())?;
        args.push("--add-data".into());
        args.push(quoting::data_token(&source, &dest)?);
    }

    args.push(absolute_token(plan.script_path())?);

    InvocationDescriptor::new(tool.program(), args)
}

fn absolute_token(path: &Path) -> Result<String> {
    let absolute = path
        .absolutize()
        .fs_context("resolving absolute path", path)?;
    quoting::path_token(&absolute)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::resolver::Resolution;
    use crate::bundler::{
        BuildOverrides, BuildTargetBuilder, Error, HiddenImport, ResourceMapping, ToolkitKind,
    };

    fn tool() -> BundlerTool {
        BundlerTool::new("pyinstaller")
    }

    fn plan_with(
        configure: impl FnOnce(BuildTargetBuilder) -> BuildTargetBuilder,
        resolution: Resolution,
    ) -> BuildPlan {
        let target = configure(
            BuildTargetBuilder::new()
                .script_path("/work/app/main.py")
                .toolkit(ToolkitKind::Plain),
        )
        .build()
        .unwrap();
        BuildPlan::merge(&target, resolution, &BuildOverrides::default()).unwrap()
    }

    fn imports(names: &[&str]) -> Resolution {
        Resolution {
            hidden_imports: names.iter().copied().map(HiddenImport::from).collect(),
            mappings: Vec::new(),
        }
    }

    #[test]
    fn minimal_plan_has_name_and_script_only() {
        let plan = plan_with(|b| b, Resolution::default());
        let descriptor = build(&plan, &tool()).unwrap();

        assert_eq!(descriptor.executable(), "pyinstaller");
        assert_eq!(descriptor.arguments().len(), 3);
        assert_eq!(descriptor.arguments()[0], "--name");
        assert_eq!(descriptor.arguments()[1], "main");
        assert!(descriptor.arguments()[2].ends_with("main.py"));
    }

    #[test]
    fn boolean_flags_only_when_set() {
        let plan = plan_with(|b| b.one_file(true).windowed(false).clean(true), Resolution::default());
        let args = build(&plan, &tool()).unwrap().arguments().to_vec();

        assert!(args.contains(&"--onefile".to_string()));
        assert!(args.contains(&"--clean".to_string()));
        assert!(!args.iter().any(|a| a == "--windowed" || a == "--noconfirm"));
    }

    #[test]
    fn hidden_imports_are_sorted() {
        let plan = plan_with(|b| b, imports(&["tkinter.ttk", "PIL", "tkinter"]));
        let args = build(&plan, &tool()).unwrap().arguments().to_vec();

        let emitted: Vec<&str> = args
            .windows(2)
            .filter(|w| w[0] == "--hidden-import")
            .map(|w| w[1].as_str())
            .collect();
        assert_eq!(emitted, ["PIL", "tkinter", "tkinter.ttk"]);
    }

    #[test]
    fn mappings_keep_input_order() {
        let resolution = Resolution {
            hidden_imports: Default::default(),
            mappings: vec![
                ResourceMapping::new("/data/B", "Y"),
                ResourceMapping::new("/data/A", "X"),
            ],
        };
        let plan = plan_with(|b| b, resolution);
        let args = build(&plan, &tool()).unwrap().arguments().to_vec();

        let emitted: Vec<&str> = args
            .windows(2)
            .filter(|w| w[0] == "--add-data")
            .map(|w| w[1].as_str())
            .collect();
        assert_eq!(emitted.len(), 2);
        assert!(emitted[0].ends_with(&format!("B{DATA_SEPARATOR}Y")));
        assert!(emitted[1].ends_with(&format!("A{DATA_SEPARATOR}X")));
    }

    #[test]
    fn build_is_deterministic() {
        let plan = plan_with(
            |b| b.one_file(true).windowed(true).noconfirm(true),
            imports(&["b", "a", "c"]),
        );
        let first = build(&plan, &tool()).unwrap();
        let second = build(&plan, &tool()).unwrap();
        assert_eq!(first.arguments(), second.arguments());
        assert_eq!(first.command_line(), second.command_line());
    }

    #[test]
    fn module_invocation_keeps_leading_args_first() {
        let tool = BundlerTool::python_module("python3");
        let plan = plan_with(|b| b.noconfirm(true), Resolution::default());
        let descriptor = build(&plan, &tool).unwrap();

        assert_eq!(descriptor.executable(), "python3");
        assert_eq!(&descriptor.arguments()[..3], ["-m", "PyInstaller", "--noconfirm"]);
    }

    #[test]
    fn script_is_last_argument() {
        let plan = plan_with(|b| b.windowed(true), imports(&["tkinter"]));
        let descriptor = build(&plan, &tool()).unwrap();
        assert!(descriptor.arguments().last().unwrap().ends_with("main.py"));
    }

    #[test]
    fn newline_in_name_is_encoding_error() {
        let plan = plan_with(|b| b.output_name("bad\nname"), Resolution::default());
        assert!(matches!(build(&plan, &tool()), Err(Error::Encoding { .. })));
    }

    #[test]
    fn dash_prefixed_values_are_encoding_errors() {
        let plan = plan_with(|b| b.output_name("-app"), Resolution::default());
        assert!(matches!(build(&plan, &tool()), Err(Error::Encoding { .. })));

        let plan = plan_with(|b| b, imports(&["-x"]));
        assert!(matches!(build(&plan, &tool()), Err(Error::Encoding { .. })));
    }

    #[test]
    fn command_line_quotes_spaces() {
        let descriptor =
            InvocationDescriptor::new("pyinstaller", vec!["--name".into(), "My App".into()]).unwrap();
        assert_eq!(descriptor.command_line(), "pyinstaller --name 'My App'");
    }
}
