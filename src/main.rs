//! Kodegen Bundler GUI - PyInstaller build assistant for Tk and CustomTkinter scripts.
//!
//! This binary resolves what a GUI script needs, runs PyInstaller, and exits
//! with a code that tells configuration errors apart from build failures.

use std::process;

#[tokio::main]
async fn main() {
    let exit_code = match kodegen_bundler_gui::cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            for suggestion in e.recovery_suggestions() {
                eprintln!("  → {suggestion}");
            }
            e.exit_code()
        }
    };

    process::exit(exit_code);
}
