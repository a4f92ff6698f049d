//! Config resolution: from a [`BuildTarget`] to hidden imports and data mappings.
//!
//! The resolver validates caller paths, adds what the chosen toolkit needs, and
//! appends caller resources in the order they were given. Finding an installed
//! package is delegated to a [`PackageLocator`], so tests can stub the Python
//! environment.

mod locator;

pub use locator::{PackageLocator, PythonPackageLocator};

use crate::bundler::error::{Error, Result};
use crate::bundler::settings::{BuildTarget, HiddenImport, ResourceMapping};
use std::collections::BTreeSet;
use std::path::Path;

/// Source extensions accepted for the entry script.
const SCRIPT_EXTENSIONS: &[&str] = &["py", "pyw"];

/// Hidden imports and data mappings computed for one target.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Module names to force-include; duplicates collapse.
    pub hidden_imports: BTreeSet<HiddenImport>,
    /// Data mappings in emission order.
    pub mappings: Vec<ResourceMapping>,
}

/// Resolves the toolkit requirements and caller resources of `target`.
///
/// Mappings come out in this order: the toolkit package directory (extended
/// toolkit only), the icon, then the caller's data in caller order.
///
/// # Errors
///
/// - [`Error::InvalidTarget`] when the script is missing, unreadable, or not a
///   Python source file, or when an icon or data source does not exist
/// - [`Error::Resolution`] when the toolkit package is not installed
pub async fn resolve<L: PackageLocator>(target: &BuildTarget, locator: &L) -> Result<Resolution> {
    check_script(target.script_path())?;

    let toolkit = target.toolkit_kind();
    let mut resolution = Resolution::default();

    resolution
        .hidden_imports
        .extend(toolkit.hidden_imports().iter().copied().map(HiddenImport::from));

    if toolkit.ships_package_data() {
        let package = toolkit.package_name();
        let package_dir = locator.locate(package).await?;
        log::debug!("Found {package} at {}", package_dir.display());
        resolution
            .mappings
            .push(ResourceMapping::new(package_dir, package));
    }

    if let Some(icon) = target.icon_path() {
        require_file(icon, "icon")?;
        resolution.mappings.push(ResourceMapping::new(icon, "."));
    }

    for mapping in target.extra_data() {
        require_path(mapping.source(), "data source")?;
        resolution.mappings.push(mapping.clone());
    }

    resolution
        .hidden_imports
        .extend(target.extra_hidden_imports().iter().cloned());

    Ok(resolution)
}

fn check_script(script: &Path) -> Result<()> {
    let invalid = |reason: String| Error::InvalidTarget {
        path: script.to_path_buf(),
        reason,
    };

    let metadata = std::fs::metadata(script).map_err(|e| invalid(format!("cannot access script: {e}")))?;
    if !metadata.is_file() {
        return Err(invalid("script is not a regular file".into()));
    }

    let extension = script
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some(ext) if SCRIPT_EXTENSIONS.contains(&ext) => {}
        _ => {
            return Err(invalid(format!(
                "expected a Python source file ({})",
                SCRIPT_EXTENSIONS
                    .iter()
                    .map(|ext| format!(".{ext}"))
                    .collect::<Vec<_>>()
                    .join(", ")
            )));
        }
    }

    std::fs::File::open(script).map_err(|e| invalid(format!("script is not readable: {e}")))?;
    Ok(())
}

/// Fails with [`Error::InvalidTarget`] unless `path` is an existing regular file.
pub(crate) fn require_file(path: &Path, what: &str) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(Error::InvalidTarget {
            path: path.to_path_buf(),
            reason: format!("{what} does not exist or is not a file"),
        })
    }
}

/// Fails with [`Error::InvalidTarget`] unless `path` exists.
pub(crate) fn require_path(path: &Path, what: &str) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(Error::InvalidTarget {
            path: path.to_path_buf(),
            reason: format!("{what} does not exist"),
        })
    }
}
