//! Builder for constructing BuildTarget.

use super::{BuildTarget, HiddenImport, ResourceMapping, ToolkitKind};
use crate::bundler::error::{Context, Error, Result};
use std::path::{Path, PathBuf};

/// Builder for constructing [`BuildTarget`].
///
/// Only the script path and toolkit are required. The output name defaults to
/// the script's file stem. File system checks happen later, during resolution.
#[derive(Default)]
pub struct BuildTargetBuilder {
    script_path: Option<PathBuf>,
    toolkit_kind: Option<ToolkitKind>,
    output_name: Option<String>,
    one_file: bool,
    windowed: bool,
    icon_path: Option<PathBuf>,
    extra_data: Vec<ResourceMapping>,
    extra_hidden_imports: Vec<HiddenImport>,
    clean: bool,
    noconfirm: bool,
}

impl BuildTargetBuilder {
    /// Creates a new target builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the entry script.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn script_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.script_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the GUI toolkit.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn toolkit(mut self, kind: ToolkitKind) -> Self {
        self.toolkit_kind = Some(kind);
        self
    }

    /// Sets the executable name.
    ///
    /// Default: the script's file stem
    pub fn output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = Some(name.into());
        self
    }

    pub fn one_file(mut self, one_file: bool) -> Self {
        self.one_file = one_file;
        self
    }

    pub fn windowed(mut self, windowed: bool) -> Self {
        self.windowed = windowed;
        self
    }

    pub fn icon_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        self.icon_path = path.map(|p| p.as_ref().to_path_buf());
        self
    }

    /// Appends a data mapping. Mappings keep the order they were added in.
    pub fn add_data(mut self, mapping: ResourceMapping) -> Self {
        self.extra_data.push(mapping);
        self
    }

    pub fn extra_data(mut self, mappings: impl IntoIterator<Item = ResourceMapping>) -> Self {
        self.extra_data.extend(mappings);
        self
    }

    pub fn hidden_imports(mut self, imports: impl IntoIterator<Item = HiddenImport>) -> Self {
        self.extra_hidden_imports.extend(imports);
        self
    }

    pub fn clean(mut self, clean: bool) -> Self {
        self.clean = clean;
        self
    }

    pub fn noconfirm(mut self, noconfirm: bool) -> Self {
        self.noconfirm = noconfirm;
        self
    }

    /// Builds the target.
    ///
    /// # Errors
    ///
    /// Returns an error if `script_path` or `toolkit` is missing, or if no usable
    /// output name can be derived.
    pub fn build(self) -> Result<BuildTarget> {
        let script_path = self.script_path.context("script_path is required")?;
        let toolkit_kind = self.toolkit_kind.context("toolkit is required")?;

        let output_name = match self.output_name {
            Some(name) => name,
            None => script_path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default(),
        };
        if output_name.trim().is_empty() {
            return Err(Error::InvalidTarget {
                path: script_path,
                reason: "output name must not be empty".into(),
            });
        }

        Ok(BuildTarget {
            script_path,
            toolkit_kind,
            output_name,
            one_file: self.one_file,
            windowed: self.windowed,
            icon_path: self.icon_path,
            extra_data: self.extra_data,
            extra_hidden_imports: self.extra_hidden_imports,
            clean: self.clean,
            noconfirm: self.noconfirm,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_name_defaults_to_script_stem() {
        let target = BuildTargetBuilder::new()
            .script_path("gui/editor.pyw")
            .toolkit(ToolkitKind::Plain)
            .build()
            .unwrap();
        assert_eq!(target.output_name(), "editor");
        assert!(!target.one_file());
        assert!(target.icon_path().is_none());
    }

    #[test]
    fn explicit_name_wins() {
        let target = BuildTargetBuilder::new()
            .script_path("main.py")
            .toolkit(ToolkitKind::Extended)
            .output_name("Notes")
            .build()
            .unwrap();
        assert_eq!(target.output_name(), "Notes");
    }

    #[test]
    fn missing_toolkit_is_an_error() {
        let result = BuildTargetBuilder::new().script_path("main.py").build();
        assert!(matches!(result, Err(Error::GenericError(_))));
    }

    #[test]
    fn blank_name_is_invalid_target() {
        let result = BuildTargetBuilder::new()
            .script_path("main.py")
            .toolkit(ToolkitKind::Plain)
            .output_name("  ")
            .build();
        assert!(matches!(result, Err(Error::InvalidTarget { .. })));
    }

    #[test]
    fn data_mappings_keep_insertion_order() {
        let target = BuildTargetBuilder::new()
            .script_path("main.py")
            .toolkit(ToolkitKind::Plain)
            .add_data(ResourceMapping::new("b.png", "img"))
            .add_data(ResourceMapping::new("a.png", "img"))
            .build()
            .unwrap();
        let sources: Vec<_> = target.extra_data().iter().map(|m| m.source()).collect();
        assert_eq!(sources, [Path::new("b.png"), Path::new("a.png")]);
    }
}
