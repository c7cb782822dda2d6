//! Configuration file handling
//!
//! Settings live in `config.toml` under the XDG config directory
//! (`~/.config/skyview/` on Linux). Every key is optional; CLI flags override
//! whatever the file says.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;

use crate::cli::Cli;
use crate::data::weather::DEFAULT_BASE_URL;
use crate::data::Strictness;

/// Errors that can occur while loading the config file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Runtime settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Base URL of the weather backend
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Report inconsistent payloads instead of degrading to partial data
    pub strict: bool,
    /// Log filter used when `RUST_LOG` is not set
    pub log_level: String,
    /// Log file used while the UI owns the terminal
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
            strict: false,
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

impl Config {
    /// Path of the default config file, if a home directory can be determined
    pub fn default_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Loads the config.
    ///
    /// An explicit path must exist. Without one, the default path is tried and
    /// a missing file there yields the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => Self::load_optional(Self::default_path().as_deref()),
        }
    }

    /// Loads `path` if it exists, defaults otherwise
    pub fn load_optional(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) if path.exists() => Self::from_file(path),
            _ => Ok(Self::default()),
        }
    }

    /// Reads and parses a config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies CLI overrides
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(base_url) = &cli.base_url {
            self.base_url = base_url.clone();
        }
        if let Some(log_level) = &cli.log_level {
            self.log_level = log_level.clone();
        }
        if cli.strict {
            self.strict = true;
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn strictness(&self) -> Strictness {
        Strictness::from_flag(self.strict)
    }

    /// Where logs go while the UI is running
    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file.clone().or_else(|| {
            project_dirs().map(|dirs| dirs.data_local_dir().join("skyview.log"))
        })
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "skyview")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.strictness(), Strictness::Lenient);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "base_url = \"http://weather.test\"\nstrict = true\n").unwrap();

        let config = Config::from_file(&path).expect("config should parse");

        assert_eq!(config.base_url, "http://weather.test");
        assert!(config.strict);
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn test_missing_optional_file_yields_defaults() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("absent.toml");

        let config = Config::load_optional(Some(&path)).unwrap();

        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("absent.toml");

        let result = Config::load(Some(&path));

        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_unknown_key_is_a_parse_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "base_ulr = \"typo\"\n").unwrap();

        let result = Config::from_file(&path);

        match result {
            Err(err @ ConfigError::Parse { .. }) => {
                assert!(err.to_string().contains("Failed to parse config file"));
            }
            other => panic!("Expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "skyview",
            "--latitude",
            "0",
            "--longitude",
            "0",
            "--base-url",
            "http://other.test",
            "--strict",
            "--log-level",
            "debug",
        ]);
        let mut config = Config::default();
        config.apply_cli(&cli);

        assert_eq!(config.base_url, "http://other.test");
        assert_eq!(config.strictness(), Strictness::Strict);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_explicit_log_file_wins() {
        let config = Config {
            log_file: Some(PathBuf::from("/tmp/skyview-test.log")),
            ..Default::default()
        };
        assert_eq!(config.log_path(), Some(PathBuf::from("/tmp/skyview-test.log")));
    }
}
