//! Resource mappings and hidden imports.

use std::path::{Path, PathBuf};
use std::str::FromStr;

/// A source-to-destination copy instruction embedded in the packaged output.
///
/// Order matters: when two mappings target the same destination, the later one wins.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct ResourceMapping {
    /// File or directory on the build machine.
    #[serde(alias = "source")]
    pub source_path: PathBuf,
    /// Destination directory inside the bundle, relative to its root.
    #[serde(alias = "dest")]
    pub dest_path: PathBuf,
}

impl ResourceMapping {
    pub fn new(source: impl Into<PathBuf>, dest: impl Into<PathBuf>) -> Self {
        Self {
            source_path: source.into(),
            dest_path: dest.into(),
        }
    }

    pub fn source(&self) -> &Path {
        &self.source_path
    }

    pub fn dest(&self) -> &Path {
        &self.dest_path
    }
}

/// Parses the CLI form `SRC:DST` (or `SRC;DST`).
///
/// Splits on the last separator so Windows drive letters in `SRC` survive.
impl FromStr for ResourceMapping {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (source, dest) = s
            .rsplit_once([':', ';'])
            .ok_or_else(|| format!("expected SRC:DST, got {s:?}"))?;
        if source.is_empty() || dest.is_empty() {
            return Err(format!("expected SRC:DST with both sides set, got {s:?}"));
        }
        Ok(Self::new(source, dest))
    }
}

/// A module name that must be force-included in the bundle.
///
/// Manifest values go through the same check as the command line.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, serde::Deserialize, serde::Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct HiddenImport(String);

impl HiddenImport {
    pub fn new(module: impl Into<String>) -> Self {
        Self(module.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for HiddenImport {
    fn from(module: &str) -> Self {
        Self::new(module)
    }
}

impl FromStr for HiddenImport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let module = s.trim();
        if module.is_empty() {
            return Err("hidden import must not be empty".to_string());
        }
        if module.starts_with('-') {
            return Err(format!("hidden import {module:?} looks like an option"));
        }
        Ok(Self::new(module))
    }
}

impl TryFrom<String> for HiddenImport {
    type Error = String;

    fn try_from(module: String) -> Result<Self, Self::Error> {
        module.parse()
    }
}

impl From<HiddenImport> for String {
    fn from(import: HiddenImport) -> Self {
        import.0
    }
}

impl std::fmt::Display for HiddenImport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
