use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Errors from loading or saving the client configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Parse(String),

    #[error("config serialize error: {0}")]
    Serialize(String),
}

/// Top-level configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub mangadex: MangaDexConfig,
}

/// Connection settings for the MangaDex API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MangaDexConfig {
    pub base_url: String,
    pub user_agent: String,
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
}

impl Config {
    /// Load config: user file (if it exists) over the built-in defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Load config from `path`, or the defaults if there is no such file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse a TOML document. Keys it leaves out keep their default values.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Save the config to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Path to the user config file (XDG on Linux, AppData on Windows).
    pub fn config_path() -> PathBuf {
        ProjectDirs::from("", "", "shiori")
            .map(|d| d.config_dir().join("mangadex.toml"))
            .unwrap_or_else(|| PathBuf::from("mangadex.toml"))
    }
}

impl Default for Config {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("built-in default config is valid TOML")
    }
}

impl Default for MangaDexConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.mangadex.org".into(),
            user_agent: "Shiori/1.0".into(),
            connect_timeout_secs: 30,
            read_timeout_secs: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = Config::default();
        assert_eq!(config.mangadex.base_url, "https://api.mangadex.org");
        assert_eq!(config.mangadex.user_agent, "Shiori/1.0");
        assert_eq!(config.mangadex.connect_timeout_secs, 30);
        assert_eq!(config.mangadex.read_timeout_secs, 30);
    }

    #[test]
    fn test_default_file_matches_struct_default() {
        assert_eq!(Config::default().mangadex, MangaDexConfig::default());
    }

    #[test]
    fn test_partial_user_config() {
        let config = Config::from_toml_str(
            r#"
            [mangadex]
            base_url = "http://localhost:8080"
            "#,
        )
        .unwrap();
        assert_eq!(config.mangadex.base_url, "http://localhost:8080");
        assert_eq!(config.mangadex.user_agent, "Shiori/1.0");
        assert_eq!(config.mangadex.read_timeout_secs, 30);
    }

    #[test]
    fn test_invalid_toml() {
        let err = Config::from_toml_str("[mangadex\nbase_url = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.mangadex, MangaDexConfig::default());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("mangadex.toml");

        let mut config = Config::default();
        config.mangadex.read_timeout_secs = 5;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.mangadex.read_timeout_secs, 5);
    }
}
