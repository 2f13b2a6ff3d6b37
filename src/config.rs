//! Configuration for mockbridge.
//!
//! Values come from an optional TOML file (`mockbridge.toml` in the working
//! directory unless a path is given) and environment variables, which win
//! over the file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{BridgeError, Result};

/// Config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "mockbridge.toml";

/// Environment variable overriding the fixtures directory
pub const FIXTURES_DIR_ENV_VAR: &str = "MOCKBRIDGE_FIXTURES_DIR";

/// Environment variable overriding the log level
pub const LOG_LEVEL_ENV_VAR: &str = "MOCKBRIDGE_LOG";

pub const DEFAULT_FIXTURES_DIR: &str = "features/fixtures";
pub const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory fixture names are resolved against
    pub fixtures_dir: PathBuf,
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            fixtures_dir: PathBuf::from(DEFAULT_FIXTURES_DIR),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, `mockbridge.toml` is read
    /// if present and defaults are used otherwise. Environment overrides are
    /// applied last.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::from_file(default_path)?
                } else {
                    Config::default()
                }
            }
        };

        Ok(config.with_overrides(|name| std::env::var(name).ok()))
    }

    /// Parse a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| BridgeError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        toml::from_str(&text).map_err(|e| BridgeError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Apply environment overrides through `lookup`; empty values are ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(FIXTURES_DIR_ENV_VAR).filter(|v| !v.is_empty()) {
            self.fixtures_dir = PathBuf::from(dir);
        }
        if let Some(level) = lookup(LOG_LEVEL_ENV_VAR).filter(|v| !v.is_empty()) {
            self.log_level = level;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.fixtures_dir, PathBuf::from("features/fixtures"));
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "fixtures_dir = \"tests/bodies\"\nlog_level = \"debug\"").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.fixtures_dir, PathBuf::from("tests/bodies"));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "log_level = \"info\"").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.fixtures_dir, PathBuf::from(DEFAULT_FIXTURES_DIR));
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_unknown_key_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "fixture_dir = \"typo\"").unwrap();

        let err = Config::from_file(file.path()).unwrap_err();
        assert!(matches!(err, BridgeError::Config { .. }));
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = Config::load(Some(Path::new("/no/such/mockbridge.toml"))).unwrap_err();
        assert!(err.to_string().contains("/no/such/mockbridge.toml"));
    }

    #[test]
    fn test_env_overrides_win() {
        let env: HashMap<&str, &str> = [
            (FIXTURES_DIR_ENV_VAR, "/srv/fixtures"),
            (LOG_LEVEL_ENV_VAR, "trace"),
        ]
        .into_iter()
        .collect();

        let config = Config {
            fixtures_dir: PathBuf::from("from/file"),
            log_level: "info".to_string(),
        }
        .with_overrides(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.fixtures_dir, PathBuf::from("/srv/fixtures"));
        assert_eq!(config.log_level, "trace");
    }

    #[test]
    fn test_empty_env_values_ignored() {
        let config = Config::default().with_overrides(|_| Some(String::new()));
        assert_eq!(config, Config::default());
    }
}
