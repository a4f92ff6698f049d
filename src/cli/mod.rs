//! Command line interface for the GUI bundler.
//!
//! Parses arguments, sets up logging and Ctrl-C handling, and dispatches to
//! [`commands`].

mod args;
pub mod commands;
mod logger;
mod output;

pub use args::{Args, BatchArgs, BuildArgs, Command, RuntimeConfig, ToolArgs};
pub use logger::config_logger;
pub use output::OutputManager;

use crate::error::{CliError, Result};
use tokio_util::sync::CancellationToken;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = parse_args();

    if let Err(e) = config_logger(args.verbose) {
        eprintln!("Logger already initialized: {e}");
    }

    validate_args(&args).map_err(|reason| CliError::InvalidArguments { reason })?;
    let config = create_runtime_config(&args);

    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_ctrl_c(cancel.clone()));

    match &args.command {
        Command::Build(build) => commands::build::execute(build, &config, cancel).await,
        Command::Batch(batch) => commands::batch::execute(batch, &config, cancel).await,
    }
}

/// Cancels `token` on the first Ctrl-C; running bundlers are terminated.
async fn cancel_on_ctrl_c(token: CancellationToken) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            log::warn!("Interrupted, stopping the bundler");
            token.cancel();
        }
        Err(e) => log::debug!("Ctrl-C handler unavailable: {e}"),
    }
}

/// Parse arguments without executing (for testing)
pub fn parse_args() -> Args {
    Args::parse_args()
}

/// Validate arguments without executing (for testing)
pub fn validate_args(args: &Args) -> std::result::Result<(), String> {
    args.validate()
}

/// Create runtime configuration from arguments
pub fn create_runtime_config(args: &Args) -> RuntimeConfig {
    RuntimeConfig::from(args)
}
