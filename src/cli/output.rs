//! Colored, verbosity-aware terminal output.

use colored::Colorize;
use std::io::{self, Write};

/// User-facing status output.
///
/// Progress and success lines go to stdout; warnings and errors go to stderr.
/// `quiet` suppresses everything except errors.
#[derive(Debug, Clone)]
pub struct OutputManager {
    verbose: bool,
    quiet: bool,
}

impl OutputManager {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// Only shown with `-v`.
    pub fn verbose(&self, message: &str) -> io::Result<()> {
        if !self.verbose || self.quiet {
            return Ok(());
        }
        writeln!(io::stdout(), "{}", message.dimmed())
    }

    pub fn progress(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        writeln!(io::stdout(), "{} {message}", "→".cyan())
    }

    pub fn success(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        writeln!(io::stdout(), "{} {message}", "✓".green().bold())
    }

    pub fn warn(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        writeln!(io::stderr(), "{} {message}", "warning:".yellow().bold())
    }

    /// Errors are shown even in quiet mode.
    pub fn error(&self, message: &str) -> io::Result<()> {
        writeln!(io::stderr(), "{} {message}", "error:".red().bold())
    }

    pub fn section(&self, title: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        writeln!(io::stdout(), "\n{}", title.bold())
    }

    pub fn indent(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        writeln!(io::stdout(), "    {message}")
    }
}
