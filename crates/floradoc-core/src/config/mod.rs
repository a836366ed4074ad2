//! Configuration management for FloraDoc.
//!
//! Configuration is loaded from the platform config directory with sensible
//! defaults. Every section is optional in the file.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for FloraDoc.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Inference service settings
    pub gemini: GeminiConfig,

    /// Upload limits
    pub limits: LimitsConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.floradoc.floradoc/config.toml
    /// - Linux: ~/.config/floradoc/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\floradoc\config\config.toml
    ///
    /// Falls back to ~/.floradoc/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "floradoc", "floradoc")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = shellexpand::tilde("~").into_owned();
                PathBuf::from(home).join(".floradoc").join("config.toml")
            })
    }

    /// Maximum upload size in bytes. Saturates instead of overflowing for
    /// configs built without going through validation.
    pub fn max_file_size_bytes(&self) -> u64 {
        self.limits.max_file_size_mb.saturating_mul(1024 * 1024)
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.gemini.model, "gemini-2.5-flash");
        assert_eq!(config.gemini.api_key, "${GEMINI_API_KEY}");
        assert_eq!(config.gemini.timeout_ms, 60_000);
        assert_eq!(config.limits.max_file_size_mb, 20);
        assert_eq!(config.output.format, "text");
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[gemini]"));
        assert!(toml.contains("[limits]"));
        assert!(toml.contains("[logging]"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [gemini]
            model = "gemini-2.5-pro"
            "#,
        )
        .unwrap();
        assert_eq!(config.gemini.model, "gemini-2.5-pro");
        assert_eq!(config.gemini.timeout_ms, 60_000);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[limits]\nmax_file_size_mb = 5\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.limits.max_file_size_mb, 5);
        assert_eq!(config.max_file_size_bytes(), 5 * 1024 * 1024);
    }

    #[test]
    fn test_load_from_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[gemini]\ntimeout_ms = 0\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_load_from_rejects_bad_toml() {
        let err = Config::from_toml("[gemini\nmodel =").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_max_file_size_bytes_saturates() {
        let mut config = Config::default();
        config.limits.max_file_size_mb = u64::MAX;
        assert_eq!(config.max_file_size_bytes(), u64::MAX);
    }
}
