pub mod completions;
pub mod parse;
pub mod tokens;

use std::path::Path;

use crate::error::CliError;

/// Read a whole file; the handle is closed before this returns.
pub fn read_source(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|e| CliError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}
