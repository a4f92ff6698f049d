//! Build manifests: overrides and batch targets from a single TOML file.
//!
//! ```toml
//! [overrides]
//! clean = true
//!
//! [[target]]
//! script = "editor/main.py"
//! toolkit = "extended"
//! windowed = true
//! add_data = [{ source = "editor/themes", dest = "themes" }]
//!
//! [[target]]
//! script = "tools/convert.py"
//! toolkit = "plain"
//! name = "Converter"
//! ```
//!
//! Relative paths are resolved against the manifest's directory.

use crate::bundler::{
    BuildOverrides, BuildTarget, BuildTargetBuilder, HiddenImport, ResourceMapping, ToolkitKind,
};
use crate::error::{BundlerError, CliError, Result};
use std::path::{Path, PathBuf};

/// Parsed manifest file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildManifest {
    /// Overrides applied to every target built with this manifest.
    #[serde(default)]
    pub overrides: BuildOverrides,

    /// Targets for `batch`.
    #[serde(default, rename = "target")]
    pub targets: Vec<TargetEntry>,

    /// Directory relative paths are resolved against.
    #[serde(skip)]
    base_dir: PathBuf,
}

/// One `[[target]]` table.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetEntry {
    pub script: PathBuf,
    pub toolkit: ToolkitKind,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub onefile: bool,
    #[serde(default)]
    pub windowed: bool,
    #[serde(default)]
    pub icon: Option<PathBuf>,
    #[serde(default)]
    pub add_data: Vec<ResourceMapping>,
    #[serde(default)]
    pub hidden_imports: Vec<HiddenImport>,
    #[serde(default)]
    pub clean: bool,
    #[serde(default = "default_noconfirm")]
    pub noconfirm: bool,
}

/// Batch builds run unattended, so they never stop at PyInstaller's overwrite prompt.
fn default_noconfirm() -> bool {
    true
}

impl BuildManifest {
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Converts every `[[target]]` entry into a [`BuildTarget`].
    pub fn build_targets(&self) -> Result<Vec<BuildTarget>> {
        self.targets
            .iter()
            .map(|entry| entry.to_target(&self.base_dir))
            .collect()
    }
}

impl TargetEntry {
    /// Builds the target, resolving relative paths against `base_dir`.
    ///
    /// Without an explicit icon, a conventional `assets/icon.<ext>` next to the
    /// script is picked up if present.
    pub fn to_target(&self, base_dir: &Path) -> Result<BuildTarget> {
        let script = base_dir.join(&self.script);
        let icon = self
            .icon
            .as_ref()
            .map(|icon| base_dir.join(icon))
            .or_else(|| discover_icon(&script));

        let mut builder = BuildTargetBuilder::new()
            .script_path(&script)
            .toolkit(self.toolkit)
            .one_file(self.onefile)
            .windowed(self.windowed)
            .icon_path(icon)
            .extra_data(self.add_data.iter().map(|mapping| {
                ResourceMapping::new(base_dir.join(mapping.source()), mapping.dest())
            }))
            .hidden_imports(self.hidden_imports.iter().cloned())
            .clean(self.clean)
            .noconfirm(self.noconfirm);
        if let Some(name) = &self.name {
            builder = builder.output_name(name.clone());
        }

        Ok(builder.build()?)
    }
}

/// Load a manifest from `path` (single read + parse).
pub fn load_manifest(path: &Path) -> Result<BuildManifest> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        BundlerError::Cli(CliError::InvalidManifest {
            path: path.display().to_string(),
            reason: format!("cannot read: {e}"),
        })
    })?;

    let mut manifest: BuildManifest = toml::from_str(&raw).map_err(|e| {
        BundlerError::Cli(CliError::InvalidManifest {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    })?;

    manifest.base_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    // Override paths are relative to the manifest too.
    let base_dir = manifest.base_dir.clone();
    if let Some(icon) = manifest.overrides.icon.as_mut() {
        *icon = base_dir.join(&*icon);
    }
    for mapping in &mut manifest.overrides.add_data {
        mapping.source_path = base_dir.join(&mapping.source_path);
    }

    log::debug!(
        "Loaded manifest {} with {} target(s)",
        path.display(),
        manifest.targets.len()
    );
    Ok(manifest)
}

/// Looks for the platform's conventional icon in `<script dir>/assets/`.
///
/// PyInstaller uses `.ico` on Windows and `.icns` on macOS; other platforms
/// have no executable icon.
pub(crate) fn discover_icon(script: &Path) -> Option<PathBuf> {
    let extension = if cfg!(windows) {
        "ico"
    } else if cfg!(target_os = "macos") {
        "icns"
    } else {
        return None;
    };

    let icon = script.parent()?.join("assets").join("icon").with_extension(extension);
    if icon.is_file() {
        log::info!("Found icon: {}", icon.display());
        Some(icon)
    } else {
        log::debug!("No icon at {}", icon.display());
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_manifest(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("bundle.toml");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn loads_overrides_and_targets() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_manifest(
            dir.path(),
            r#"
            [overrides]
            clean = true
            add_data = [{ source = "shared", dest = "shared" }]

            [[target]]
            script = "editor/main.py"
            toolkit = "extended"
            windowed = true

            [[target]]
            script = "convert.py"
            toolkit = "plain"
            name = "Converter"
            noconfirm = false
            "#,
        );

        let manifest = load_manifest(&path).unwrap();
        assert_eq!(manifest.overrides.clean, Some(true));
        assert_eq!(
            manifest.overrides.add_data[0].source(),
            dir.path().join("shared")
        );

        let targets = manifest.build_targets().unwrap();
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].script_path(), dir.path().join("editor/main.py"));
        assert_eq!(targets[0].toolkit_kind(), ToolkitKind::Extended);
        assert!(targets[0].noconfirm());
        assert_eq!(targets[1].output_name(), "Converter");
        assert!(!targets[1].noconfirm());
    }

    #[test]
    fn unknown_toolkit_is_invalid_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_manifest(
            dir.path(),
            "[[target]]\nscript = \"a.py\"\ntoolkit = \"qt\"\n",
        );
        let err = load_manifest(&path).unwrap_err();
        assert!(matches!(err, BundlerError::Cli(CliError::InvalidManifest { .. })));
    }

    #[test]
    fn missing_manifest_is_invalid_manifest() {
        let err = load_manifest(Path::new("/no/such/bundle.toml")).unwrap_err();
        assert!(matches!(err, BundlerError::Cli(CliError::InvalidManifest { .. })));
    }

    #[test]
    fn empty_manifest_has_no_targets() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_manifest(dir.path(), "");
        let manifest = load_manifest(&path).unwrap();
        assert!(manifest.targets.is_empty());
        assert!(manifest.overrides.is_empty());
    }
}
