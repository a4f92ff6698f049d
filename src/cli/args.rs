//! Command line argument parsing and validation.
//!
//! This module provides comprehensive CLI argument parsing using clap,
//! with proper validation and error handling.

use crate::bundler::{HiddenImport, ResourceMapping, ToolkitKind};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// PyInstaller build assistant for Tk and CustomTkinter GUI scripts
#[derive(Parser, Debug)]
#[command(
    name = "kodegen_bundler_gui",
    version,
    about = "PyInstaller build assistant for Tk and CustomTkinter GUI scripts",
    long_about = "Works out the hidden imports, data files and flags a GUI script needs, then runs PyInstaller.

Usage:
  kodegen_bundler_gui build --script main.py --toolkit extended --onefile --windowed
  kodegen_bundler_gui build --script app.py --toolkit plain --add-data assets:assets --dry-run
  kodegen_bundler_gui batch --manifest bundle.toml --jobs 2

Exit codes: 0 success, PyInstaller's own code on failure, 78 configuration error, 124 timeout, 130 cancelled."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Package one GUI script
    Build(BuildArgs),
    /// Package every target listed in a manifest, concurrently
    Batch(BatchArgs),
}

/// Options shared by every command that runs PyInstaller.
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct ToolArgs {
    /// PyInstaller executable (default: `pyinstaller` on PATH, else `python -m PyInstaller`)
    #[arg(long, value_name = "PATH", env = "KODEGEN_PYINSTALLER")]
    pub bundler: Option<PathBuf>,

    /// Python interpreter used for package lookup and `-m PyInstaller`
    #[arg(long, value_name = "PATH", env = "KODEGEN_PYTHON")]
    pub python: Option<PathBuf>,

    /// Terminate PyInstaller after this many seconds
    #[arg(long, value_name = "SECS", env = "KODEGEN_BUNDLE_TIMEOUT")]
    pub timeout: Option<u64>,
}

impl ToolArgs {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }
}

#[derive(ClapArgs, Debug, Clone)]
pub struct BuildArgs {
    /// Entry script (.py or .pyw)
    #[arg(short = 's', long, value_name = "PATH")]
    pub script: PathBuf,

    /// GUI toolkit the script uses
    #[arg(short = 't', long, value_enum)]
    pub toolkit: ToolkitKind,

    /// Executable name (default: script file stem)
    #[arg(short = 'n', long, value_name = "NAME")]
    pub name: Option<String>,

    /// Produce a single-file executable
    #[arg(long)]
    pub onefile: bool,

    /// Suppress the console window
    #[arg(long, short = 'w')]
    pub windowed: bool,

    /// Executable icon (.ico on Windows, .icns on macOS)
    #[arg(long, value_name = "PATH")]
    pub icon: Option<PathBuf>,

    /// Extra data to bundle, as SRC:DST (repeatable, order preserved)
    #[arg(long = "add-data", value_name = "SRC:DST")]
    pub add_data: Vec<ResourceMapping>,

    /// Extra module to force-include (repeatable)
    #[arg(
        long = "hidden-import",
        value_name = "MODULE",
        value_parser = HiddenImport::from_str
    )]
    pub hidden_imports: Vec<HiddenImport>,

    /// Clean PyInstaller's cache before building
    #[arg(long)]
    pub clean: bool,

    /// Replace an existing output directory without asking
    #[arg(long)]
    pub noconfirm: bool,

    /// Manifest whose [overrides] table is applied over the resolved configuration
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the PyInstaller command instead of running it
    #[arg(long)]
    pub dry_run: bool,

    /// With --dry-run, print the invocation as JSON
    #[arg(long, requires = "dry_run")]
    pub json: bool,

    #[command(flatten)]
    pub tool: ToolArgs,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct BatchArgs {
    /// Manifest listing [[target]] tables
    #[arg(short = 'm', long, value_name = "FILE")]
    pub manifest: PathBuf,

    /// Maximum concurrent PyInstaller runs (default: number of CPUs)
    #[arg(short = 'j', long, value_name = "N")]
    pub jobs: Option<usize>,

    #[command(flatten)]
    pub tool: ToolArgs,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        let tool = match &self.command {
            Command::Build(build) => {
                if build.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
                    return Err("--name cannot be empty".to_string());
                }
                &build.tool
            }
            Command::Batch(batch) => {
                if batch.jobs == Some(0) {
                    return Err("--jobs must be at least 1".to_string());
                }
                &batch.tool
            }
        };

        if tool.timeout == Some(0) {
            return Err("--timeout must be at least 1 second".to_string());
        }

        Ok(())
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for colored terminal output
    output: super::OutputManager,
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        let output = super::OutputManager::new(args.verbose > 0, args.quiet);

        Self { output }
    }
}

impl RuntimeConfig {
    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }

    /// Print verbose message if in verbose mode
    pub fn verbose_println(&self, message: &str) -> std::io::Result<()> {
        self.output.verbose(message)
    }

    /// Print success message if not in quiet mode
    pub fn success(&self, message: &str) -> std::io::Result<()> {
        self.output.success(message)
    }

    /// Print warning message if not in quiet mode
    pub fn warn(&self, message: &str) -> std::io::Result<()> {
        self.output.warn(message)
    }

    /// Print error message
    pub fn error(&self, message: &str) -> std::io::Result<()> {
        self.output.error(message)
    }

    /// Print progress message
    pub fn progress(&self, message: &str) -> std::io::Result<()> {
        self.output.progress(message)
    }

    /// Print section header
    pub fn section(&self, title: &str) -> std::io::Result<()> {
        self.output.section(title)
    }

    /// Print indented text
    pub fn indent(&self, message: &str) -> std::io::Result<()> {
        self.output.indent(message)
    }
}
