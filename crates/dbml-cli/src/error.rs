use std::path::PathBuf;

use dbml_syntax::DbmlError;

/// Exit codes for the CLI process.
///
/// - 0: success
/// - 1: general error
/// - 2: invalid arguments / usage error
/// - 3: lexical or syntax error in a DBML file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    InvalidArguments = 2,
    ParseError = 3,
}

/// Errors returned by CLI command handlers.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// A single file failed to scan or parse.
    #[error("{file}: {error}")]
    Parse {
        #[source]
        error: DbmlError,
        source_text: String,
        file: PathBuf,
    },

    /// Some files of a `parse` run failed; their diagnostics were already shown.
    #[error("{failed} of {total} files failed to parse")]
    ParseFailed { failed: usize, total: usize },

    /// IO errors (file not found, permission denied).
    #[error("IO error for {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("configuration error: {message}")]
    Config { message: String },

    /// Path missing, or a directory without matching files.
    #[error("no .{extension} files found in {path}")]
    NoSchemaFiles { path: PathBuf, extension: String },

    #[error("{0}")]
    Other(String),
}

impl CliError {
    /// Maps this error to the appropriate exit code.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Parse { .. } | Self::ParseFailed { .. } => ExitCode::ParseError,
            Self::Config { .. } | Self::NoSchemaFiles { .. } => ExitCode::InvalidArguments,
            Self::Io { .. } | Self::Other(_) => ExitCode::GeneralError,
        }
    }

    /// Serializes this error as a JSON value for `--format json` output.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Parse { error, file, .. } => serde_json::json!({
                "error": "parse_error",
                "file": file.display().to_string(),
                "errors": [dbml_error_json(error)],
            }),
            Self::ParseFailed { failed, total } => serde_json::json!({
                "error": "parse_error",
                "failed": failed,
                "files": total,
            }),
            Self::Io { path, source } => serde_json::json!({
                "error": "io_error",
                "path": path.display().to_string(),
                "message": source.to_string(),
            }),
            Self::Config { message } => serde_json::json!({
                "error": "config_error",
                "message": message,
            }),
            other => serde_json::json!({
                "error": "error",
                "message": other.to_string(),
            }),
        }
    }
}

/// JSON shape of a single lexical or syntax error.
pub fn dbml_error_json(error: &DbmlError) -> serde_json::Value {
    let position = error.position();
    serde_json::json!({
        "kind": error.kind_name(),
        "message": error.to_string(),
        "line": position.line,
        "column": position.column,
    })
}
