//! Hand-written overrides and the merged build plan.
//!
//! A resolved configuration is the generated default. Overrides loaded from a
//! manifest are laid over it field by field, always in the same order, so the
//! same inputs produce the same [`BuildPlan`].

use super::{BuildTarget, HiddenImport, ResourceMapping};
use crate::bundler::error::{Error, Result};
use crate::bundler::resolver::{self, Resolution};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Field-by-field overrides for a resolved build.
///
/// # Configuration
///
/// ```toml
/// [overrides]
/// name = "Notes"
/// windowed = true
/// hidden_imports = ["PIL._tkinter_finder"]
/// exclude_hidden_imports = ["tkinter.ttk"]
/// add_data = [{ source = "themes/dark.json", dest = "themes" }]
/// ```
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildOverrides {
    /// Replaces the executable name.
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub onefile: Option<bool>,

    #[serde(default)]
    pub windowed: Option<bool>,

    /// Replaces the `--icon` path and is also shipped next to the executable.
    #[serde(default)]
    pub icon: Option<PathBuf>,

    #[serde(default)]
    pub clean: Option<bool>,

    /// Added to the resolved hidden imports.
    #[serde(default)]
    pub hidden_imports: Vec<HiddenImport>,

    /// Removed after additions are applied.
    #[serde(default)]
    pub exclude_hidden_imports: Vec<HiddenImport>,

    /// Appended after every resolved mapping.
    #[serde(default)]
    pub add_data: Vec<ResourceMapping>,
}

impl BuildOverrides {
    /// True when applying these overrides would change nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.onefile.is_none()
            && self.windowed.is_none()
            && self.icon.is_none()
            && self.clean.is_none()
            && self.hidden_imports.is_empty()
            && self.exclude_hidden_imports.is_empty()
            && self.add_data.is_empty()
    }
}

/// Everything the command builder needs for one bundler run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildPlan {
    script_path: PathBuf,
    output_name: String,
    one_file: bool,
    windowed: bool,
    icon_path: Option<PathBuf>,
    clean: bool,
    noconfirm: bool,
    hidden_imports: BTreeSet<HiddenImport>,
    mappings: Vec<ResourceMapping>,
}

impl BuildPlan {
    /// Merges a target, its resolution, and overrides into a plan.
    ///
    /// Scalars in `overrides` replace the target's values. Hidden imports are
    /// unioned and then the exclusions are removed. Override data is appended,
    /// so it wins over resolved mappings with the same destination.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidTarget`] if the override name is blank, or if an
    /// override icon or data source does not exist.
    pub fn merge(
        target: &BuildTarget,
        resolution: Resolution,
        overrides: &BuildOverrides,
    ) -> Result<Self> {
        let Resolution {
            mut hidden_imports,
            mut mappings,
        } = resolution;

        let output_name = match &overrides.name {
            Some(name) if name.trim().is_empty() => {
                return Err(Error::InvalidTarget {
                    path: target.script_path.clone(),
                    reason: "override name must not be empty".into(),
                });
            }
            Some(name) => name.clone(),
            None => target.output_name.clone(),
        };

        let mut icon_path = target.icon_path.clone();
        if let Some(icon) = &overrides.icon {
            resolver::require_file(icon, "icon")?;
            // The replaced icon must not ship either.
            if let Some(previous) = &target.icon_path {
                mappings.retain(|m| !(m.source() == previous && m.dest() == Path::new(".")));
            }
            mappings.push(ResourceMapping::new(icon, "."));
            icon_path = Some(icon.clone());
        }

        hidden_imports.extend(overrides.hidden_imports.iter().cloned());
        for excluded in &overrides.exclude_hidden_imports {
            hidden_imports.remove(excluded);
        }

        for mapping in &overrides.add_data {
            resolver::require_path(mapping.source(), "data source")?;
            mappings.push(mapping.clone());
        }

        Ok(Self {
            script_path: target.script_path.clone(),
            output_name,
            one_file: overrides.onefile.unwrap_or(target.one_file),
            windowed: overrides.windowed.unwrap_or(target.windowed),
            icon_path,
            clean: overrides.clean.unwrap_or(target.clean),
            noconfirm: target.noconfirm,
            hidden_imports,
            mappings,
        })
    }

    pub fn script_path(&self) -> &Path {
        &self.script_path
    }

    pub fn output_name(&self) -> &str {
        &self.output_name
    }

    pub fn one_file(&self) -> bool {
        self.one_file
    }

    pub fn windowed(&self) -> bool {
        self.windowed
    }

    pub fn icon_path(&self) -> Option<&Path> {
        self.icon_path.as_deref()
    }

    pub fn clean(&self) -> bool {
        self.clean
    }

    pub fn noconfirm(&self) -> bool {
        self.noconfirm
    }

    /// Hidden imports in lexicographic order.
    pub fn hidden_imports(&self) -> &BTreeSet<HiddenImport> {
        &self.hidden_imports
    }

    /// Data mappings in emission order.
    pub fn mappings(&self) -> &[ResourceMapping] {
        &self.mappings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::{BuildTargetBuilder, ToolkitKind};

    fn target() -> BuildTarget {
        BuildTargetBuilder::new()
            .script_path("main.py")
            .toolkit(ToolkitKind::Plain)
            .windowed(true)
            .build()
            .unwrap()
    }

    fn resolution() -> Resolution {
        Resolution {
            hidden_imports: ["tkinter", "tkinter.ttk"]
                .into_iter()
                .map(HiddenImport::from)
                .collect(),
            mappings: vec![ResourceMapping::new("a", "x")],
        }
    }

    #[test]
    fn empty_overrides_keep_resolved_config() {
        let overrides = BuildOverrides::default();
        assert!(overrides.is_empty());

        let plan = BuildPlan::merge(&target(), resolution(), &overrides).unwrap();
        assert_eq!(plan.output_name(), "main");
        assert!(plan.windowed());
        assert_eq!(plan.hidden_imports().len(), 2);
        assert_eq!(plan.mappings(), [ResourceMapping::new("a", "x")]);
    }

    #[test]
    fn scalars_replace_and_imports_are_added_then_excluded() {
        let overrides: BuildOverrides = toml::from_str(
            r#"
            name = "Notes"
            windowed = false
            onefile = true
            hidden_imports = ["PIL", "tkinter.ttk"]
            exclude_hidden_imports = ["tkinter.ttk"]
            "#,
        )
        .unwrap();

        let plan = BuildPlan::merge(&target(), resolution(), &overrides).unwrap();
        assert_eq!(plan.output_name(), "Notes");
        assert!(!plan.windowed());
        assert!(plan.one_file());

        let imports: Vec<&str> = plan.hidden_imports().iter().map(|i| i.as_str()).collect();
        assert_eq!(imports, ["PIL", "tkinter"]);
    }

    #[test]
    fn override_data_is_appended_after_resolved_mappings() {
        let dir = tempfile::tempdir().unwrap();
        let theme = dir.path().join("dark.json");
        std::fs::write(&theme, "{}").unwrap();

        let overrides = BuildOverrides {
            add_data: vec![ResourceMapping::new(&theme, "x")],
            ..Default::default()
        };
        let plan = BuildPlan::merge(&target(), resolution(), &overrides).unwrap();
        assert_eq!(plan.mappings().len(), 2);
        assert_eq!(plan.mappings()[1].source(), theme.as_path());
    }

    #[test]
    fn missing_override_icon_is_invalid_target() {
        let overrides = BuildOverrides {
            icon: Some(PathBuf::from("/definitely/not/here.ico")),
            ..Default::default()
        };
        let result = BuildPlan::merge(&target(), resolution(), &overrides);
        assert!(matches!(result, Err(Error::InvalidTarget { .. })));
    }

    #[test]
    fn blank_override_name_is_invalid_target() {
        let overrides: BuildOverrides = toml::from_str(r#"name = " ""#).unwrap();
        let result = BuildPlan::merge(&target(), resolution(), &overrides);
        assert!(matches!(result, Err(Error::InvalidTarget { ref reason, .. }) if reason.contains("name")));
    }

    #[test]
    fn blank_override_hidden_import_is_rejected_at_load() {
        let parsed: std::result::Result<BuildOverrides, _> =
            toml::from_str(r#"hidden_imports = [""]"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn override_icon_replaces_target_icon_mapping() {
        let dir = tempfile::tempdir().unwrap();
        let old_icon = dir.path().join("old.ico");
        let new_icon = dir.path().join("new.ico");
        std::fs::write(&old_icon, b"x").unwrap();
        std::fs::write(&new_icon, b"x").unwrap();

        let target = BuildTargetBuilder::new()
            .script_path("main.py")
            .toolkit(ToolkitKind::Plain)
            .icon_path(Some(&old_icon))
            .build()
            .unwrap();
        let resolution = Resolution {
            hidden_imports: Default::default(),
            mappings: vec![
                ResourceMapping::new("a", "x"),
                ResourceMapping::new(&old_icon, "."),
            ],
        };
        let overrides = BuildOverrides {
            icon: Some(new_icon.clone()),
            ..Default::default()
        };

        let plan = BuildPlan::merge(&target, resolution, &overrides).unwrap();
        assert_eq!(plan.icon_path(), Some(new_icon.as_path()));
        assert_eq!(
            plan.mappings(),
            [
                ResourceMapping::new("a", "x"),
                ResourceMapping::new(&new_icon, "."),
            ]
        );
    }

    #[test]
    fn unknown_override_keys_are_rejected() {
        let parsed: std::result::Result<BuildOverrides, _> = toml::from_str("onedir = true");
        assert!(parsed.is_err());
    }
}
