//! Client configuration.
//!
//! A small JSON file holding the API base address, the user identity the
//! backend expects, and the request timeout. Missing fields fall back to
//! defaults, so an empty `{}` file is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for the chat client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base address of the chat API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// User identifier sent with every request. The backend currently
    /// has no authentication; this is a plain numeric identity.
    #[serde(default = "default_user_id")]
    pub user_id: i64,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".into()
}

fn default_user_id() -> i64 {
    1
}

fn default_timeout_seconds() -> u64 {
    30
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_id: default_user_id(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Parse)
    }

    /// Load configuration from a file, falling back to defaults when the
    /// file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }
        std::fs::write(path, content).map_err(ConfigError::Io)
    }

    /// Default location of the config file (`~/.config/parley/config.json`),
    /// or a path relative to the working directory when no config
    /// directory can be determined.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("parley")
            .join("config.json")
    }
}

/// Errors that can occur when working with configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading or writing config.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing config JSON.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// Error serializing config to JSON.
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.user_id, 1);
        assert_eq!(config.timeout_seconds, 30);
    }

    #[test]
    fn test_empty_file_yields_defaults() {
        let config: ClientConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.user_id, 1);
    }

    #[test]
    fn test_config_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = ClientConfig {
            base_url: "http://chat.example:9000".into(),
            user_id: 42,
            timeout_seconds: 5,
        };
        config.save(&path).unwrap();

        let loaded = ClientConfig::load(&path).unwrap();
        assert_eq!(loaded.base_url, "http://chat.example:9000");
        assert_eq!(loaded.user_id, 42);
        assert_eq!(loaded.timeout_seconds, 5);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig::load_or_default(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config.user_id, 1);
    }
}
