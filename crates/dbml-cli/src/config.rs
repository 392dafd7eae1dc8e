use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::CliError;

/// CLI configuration loaded from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CliConfig {
    #[serde(default)]
    pub cli: CliSettings,
}

/// Settings under `[cli]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliSettings {
    /// Searched when `dbml parse` gets no paths.
    #[serde(default = "default_schema_dir")]
    pub default_schema_dir: String,
    /// Extension (without the dot) matched inside directories.
    #[serde(default = "default_file_extension")]
    pub file_extension: String,
}

impl Default for CliSettings {
    fn default() -> Self {
        Self {
            default_schema_dir: default_schema_dir(),
            file_extension: default_file_extension(),
        }
    }
}

fn default_schema_dir() -> String {
    "schemas/".to_string()
}

fn default_file_extension() -> String {
    "dbml".to_string()
}

/// Discovery order for the config file:
/// 1. `--config <path>` (or `DBML_CONFIG`, via clap)
/// 2. `./dbml.toml`
/// 3. `$XDG_CONFIG_HOME/dbml/config.toml`
/// 4. `~/.config/dbml/config.toml`
pub fn load_config(explicit_path: Option<&Path>) -> Result<CliConfig, CliError> {
    if let Some(path) = explicit_path {
        return load_config_from_path(path);
    }

    let local = PathBuf::from("dbml.toml");
    if local.exists() {
        return load_config_from_path(&local);
    }

    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
        let path = PathBuf::from(xdg).join("dbml/config.toml");
        if path.exists() {
            return load_config_from_path(&path);
        }
    }

    if let Some(home) = std::env::var_os("HOME") {
        let path = PathBuf::from(home).join(".config/dbml/config.toml");
        if path.exists() {
            return load_config_from_path(&path);
        }
    }

    Ok(CliConfig::default())
}

fn load_config_from_path(path: &Path) -> Result<CliConfig, CliError> {
    tracing::debug!(path = %path.display(), "loading config");
    let contents = std::fs::read_to_string(path).map_err(|e| CliError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&contents).map_err(|e| CliError::Config {
        message: format!("failed to parse {}: {}", path.display(), e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let config = CliConfig::default();
        assert_eq!(config.cli.default_schema_dir, "schemas/");
        assert_eq!(config.cli.file_extension, "dbml");
    }

    #[test]
    fn parse_partial_toml_fills_defaults() {
        let config: CliConfig = toml::from_str("[cli]\nfile_extension = \"txt\"\n").unwrap();
        assert_eq!(config.cli.file_extension, "txt");
        assert_eq!(config.cli.default_schema_dir, "schemas/");
    }

    #[test]
    fn parse_empty_toml() {
        let config: CliConfig = toml::from_str("").unwrap();
        assert_eq!(config.cli.file_extension, "dbml");
    }

    #[test]
    fn load_config_from_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[cli]\ndefault_schema_dir = \"db/\"\n").unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.cli.default_schema_dir, "db/");
    }

    #[test]
    fn load_config_from_explicit_missing_file() {
        let result = load_config(Some(Path::new("/nonexistent/dbml.toml")));
        assert!(matches!(result, Err(CliError::Io { .. })));
    }

    #[test]
    fn load_config_rejects_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[cli\n").unwrap();
        let result = load_config(Some(&path));
        assert!(matches!(result, Err(CliError::Config { .. })));
    }
}
