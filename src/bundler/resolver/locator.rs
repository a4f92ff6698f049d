//! Installed-package lookup through the Python interpreter.

use crate::bundler::error::{Error, Result};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Upper bound for one interpreter probe.
const PROBE_TIMEOUT: Duration = Duration::from_secs(30);

/// Prints the first search location of the package named in `argv[1]`.
///
/// `find_spec` does not import the package, so probing a GUI toolkit never
/// needs a display.
const FIND_PACKAGE_PROBE: &str = "\
import importlib.util, sys
spec = importlib.util.find_spec(sys.argv[1])
if spec is None or not spec.submodule_search_locations:
    sys.exit(3)
print(list(spec.submodule_search_locations)[0])
";

/// Maps a package name to its installed directory.
pub trait PackageLocator {
    /// Returns the directory of `package`, or [`Error::Resolution`] if it is not installed.
    fn locate(&self, package: &str) -> impl Future<Output = Result<PathBuf>> + Send;
}

/// Asks a Python interpreter where a package lives.
#[derive(Clone, Debug)]
pub struct PythonPackageLocator {
    python: PathBuf,
    timeout: Duration,
}

impl PythonPackageLocator {
    pub fn new(python: impl Into<PathBuf>) -> Self {
        Self {
            python: python.into(),
            timeout: PROBE_TIMEOUT,
        }
    }

    /// Overrides the probe timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn python(&self) -> &Path {
        &self.python
    }

    fn resolution_error(package: &str, reason: impl Into<String>) -> Error {
        Error::Resolution {
            package: package.to_string(),
            reason: reason.into(),
            hint: format!(
                "Install it into the interpreter PyInstaller uses (pip install {package}), \
                 or select that interpreter with --python"
            ),
        }
    }
}

impl PackageLocator for PythonPackageLocator {
    async fn locate(&self, package: &str) -> Result<PathBuf> {
        log::debug!(
            "Probing {} for package {package}",
            self.python.display()
        );

        let probe = tokio::process::Command::new(&self.python)
            .arg("-c")
            .arg(FIND_PACKAGE_PROBE)
            .arg(package)
            .kill_on_drop(true)
            .output();

        let output = match tokio::time::timeout(self.timeout, probe).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(Self::resolution_error(
                    package,
                    format!("cannot run {}: {e}", self.python.display()),
                ));
            }
            Err(_elapsed) => {
                return Err(Self::resolution_error(
                    package,
                    format!(
                        "{} did not answer within {}s",
                        self.python.display(),
                        self.timeout.as_secs()
                    ),
                ));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = if stderr.trim().is_empty() {
                format!("not installed for {}", self.python.display())
            } else {
                stderr.trim().to_string()
            };
            return Err(Self::resolution_error(package, reason));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let dir = PathBuf::from(stdout.trim());
        if dir.as_os_str().is_empty() || !dir.is_dir() {
            return Err(Self::resolution_error(
                package,
                format!("interpreter reported an unusable location {:?}", stdout.trim()),
            ));
        }

        Ok(dir)
    }
}
