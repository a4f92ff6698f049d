//! `env_logger` setup driven by the `-v` flag.

use env_logger::{Builder, Env, Target};

/// Configures the global logger.
///
/// `RUST_LOG` wins when set; otherwise each `-v` raises the level one step
/// from `warn`, up to `trace`.
pub fn config_logger(verbose_level: u8) -> Result<(), log::SetLoggerError> {
    let default_level = match verbose_level {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    Builder::from_env(Env::default().default_filter_or(default_level))
        .target(Target::Stderr)
        .format_module_path(false)
        .format_timestamp_millis()
        .try_init()
}
