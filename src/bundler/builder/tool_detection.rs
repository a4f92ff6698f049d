//! External tool detection and availability checking.
//!
//! Locates the PyInstaller entry point and the Python interpreter used for
//! package introspection, and reads the PyInstaller version once per run.

use crate::bundler::error::{Error, Result};
use semver::Version;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

/// Upper bound for `--version` probes.
const VERSION_PROBE_TIMEOUT: Duration = Duration::from_secs(30);

/// Oldest PyInstaller release line still receiving fixes.
const OLDEST_SUPPORTED_MAJOR: u64 = 5;

/// `pyinstaller` on `PATH`, if any.
///
/// Cached result to avoid repeated lookups when a batch resolves many targets.
pub static PYINSTALLER_ON_PATH: LazyLock<Option<PathBuf>> =
    LazyLock::new(|| match which::which("pyinstaller") {
        Ok(path) => {
            log::debug!("Found pyinstaller at: {}", path.display());
            Some(path)
        }
        Err(e) => {
            log::debug!("pyinstaller not found in PATH: {}", e);
            None
        }
    });

/// How the bundler is started.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct BundlerTool {
    program: PathBuf,
    leading_args: Vec<String>,
    version: Option<Version>,
}

impl BundlerTool {
    /// A PyInstaller executable invoked directly.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
            version: None,
        }
    }

    /// PyInstaller run as a module of `python`.
    pub fn python_module(python: impl Into<PathBuf>) -> Self {
        Self {
            program: python.into(),
            leading_args: vec!["-m".into(), "PyInstaller".into()],
            version: None,
        }
    }

    pub fn with_version(mut self, version: Option<Version>) -> Self {
        self.version = version;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Arguments placed before any PyInstaller option.
    pub fn leading_args(&self) -> &[String] {
        &self.leading_args
    }

    pub fn version(&self) -> Option<&Version> {
        self.version.as_ref()
    }

    /// Runs `--version` and returns the parsed version, if the tool answers.
    pub async fn probe_version(&self) -> Result<Version> {
        let command = format!("{} --version", self.program.display());
        let probe = tokio::process::Command::new(&self.program)
            .args(&self.leading_args)
            .arg("--version")
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(VERSION_PROBE_TIMEOUT, probe)
            .await
            .map_err(|_| Error::BundlerNotFound {
                reason: format!("`{command}` did not answer"),
            })?
            .map_err(|error| Error::CommandFailed {
                command: command.clone(),
                error,
            })?;

        if !output.status.success() {
            return Err(Error::BundlerNotFound {
                reason: format!(
                    "`{command}` failed (exit code: {:?}): {}",
                    output.status.code(),
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_version(&stdout).ok_or_else(|| Error::BundlerNotFound {
            reason: format!("unrecognized version output {:?}", stdout.trim()),
        })
    }
}

/// Parses PyInstaller version output such as `6.3.0` or `6.0.0.dev0`.
///
/// Only the leading numeric components count; missing ones are zero.
pub fn parse_version(output: &str) -> Option<Version> {
    let word = output.split_whitespace().next()?;
    let word = word.trim_start_matches(['v', 'V']);

    let mut parts = [0u64; 3];
    let mut seen = 0;
    for component in word.split('.').take(3) {
        match component.parse::<u64>() {
            Ok(n) => {
                parts[seen] = n;
                seen += 1;
            }
            Err(_) => break,
        }
    }

    (seen > 0).then(|| Version::new(parts[0], parts[1], parts[2]))
}

/// Default interpreter for introspection and `-m PyInstaller`.
pub fn default_python() -> PathBuf {
    ["python3", "python"]
        .iter()
        .find_map(|name| which::which(name).ok())
        .unwrap_or_else(|| PathBuf::from(if cfg!(windows) { "python" } else { "python3" }))
}

/// Selects the bundler entry point.
///
/// Preference order: `explicit`, `pyinstaller` on `PATH`, then
/// `python -m PyInstaller`. A candidate is accepted only if it answers
/// `--version`.
///
/// # Errors
///
/// [`Error::BundlerNotFound`] if no candidate answers.
pub async fn detect_bundler(explicit: Option<&Path>, python: &Path) -> Result<BundlerTool> {
    let mut candidates = Vec::new();
    match explicit {
        Some(path) => candidates.push(BundlerTool::new(path)),
        None => {
            if let Some(path) = PYINSTALLER_ON_PATH.as_ref() {
                candidates.push(BundlerTool::new(path));
            }
            candidates.push(BundlerTool::python_module(python));
        }
    }

    let mut failures = Vec::new();
    for candidate in candidates {
        match candidate.probe_version().await {
            Ok(version) => {
                log::info!(
                    "✓ PyInstaller {version} available via {}",
                    candidate.program().display()
                );
                if version.major < OLDEST_SUPPORTED_MAJOR {
                    log::warn!(
                        "PyInstaller {version} is older than {OLDEST_SUPPORTED_MAJOR}.0; \
                         consider upgrading (pip install -U pyinstaller)"
                    );
                }
                return Ok(candidate.with_version(Some(version)));
            }
            Err(e) => {
                log::debug!("Rejected bundler candidate {}: {e}", candidate.program().display());
                failures.push(e.to_string());
            }
        }
    }

    Err(Error::BundlerNotFound {
        reason: failures.join("; "),
    })
}
