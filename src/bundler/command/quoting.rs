//! Single-token checks for command-line arguments.

use crate::bundler::error::{Error, Result};
use std::path::Path;

/// Separator between source and destination in `--add-data` values.
///
/// PyInstaller splits on `os.pathsep`, which every release accepts.
pub const DATA_SEPARATOR: char = if cfg!(windows) { ';' } else { ':' };

/// Converts a path into an argument token, rejecting anything that cannot
/// travel as exactly one argument.
pub fn path_token(path: &Path) -> Result<String> {
    let token = path.to_str().ok_or_else(|| Error::Encoding {
        token: path.to_string_lossy().into_owned(),
        reason: "path is not valid UTF-8".into(),
    })?;
    check_token(token)?;
    Ok(token.to_string())
}

/// Rejects tokens the host's argument-quoting convention cannot carry intact.
pub fn check_token(token: &str) -> Result<()> {
    let reason = if token.contains('\0') {
        Some("contains a NUL byte")
    } else if token.contains(['\n', '\r']) {
        Some("contains a line break")
    } else if cfg!(windows) && token.contains('"') {
        Some("contains a double quote")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(Error::Encoding {
            token: token.to_string(),
            reason: reason.into(),
        }),
        None => Ok(()),
    }
}

/// Checks a value that follows an option flag as its own argument.
///
/// A leading `-` would be parsed by PyInstaller as another option.
pub fn option_value(value: &str) -> Result<String> {
    check_token(value)?;
    if value.starts_with('-') {
        return Err(Error::Encoding {
            token: value.to_string(),
            reason: "starts with '-' and would be read as an option".into(),
        });
    }
    Ok(value.to_string())
}

/// Joins a mapping into `SRC<sep>DST`, rejecting sides that contain the separator.
pub fn data_token(source: &str, dest: &str) -> Result<String> {
    for side in [source, dest] {
        if side.contains(DATA_SEPARATOR) {
            return Err(Error::Encoding {
                token: side.to_string(),
                reason: format!("contains the data separator {DATA_SEPARATOR:?}"),
            });
        }
    }
    Ok(format!("{source}{DATA_SEPARATOR}{dest}"))
}
