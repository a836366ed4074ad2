//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

const OUTPUT_FORMATS: &[&str] = &["text", "json", "jsonl"];
const LOG_FORMATS: &[&str] = &["pretty", "json"];
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Largest accepted `limits.max_file_size_mb`.
pub(crate) const MAX_FILE_SIZE_MB_LIMIT: u64 = 1024;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.gemini.endpoint.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "gemini.endpoint must not be empty".into(),
            ));
        }
        if self.gemini.model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "gemini.model must not be empty".into(),
            ));
        }
        if self.gemini.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "gemini.timeout_ms must be > 0".into(),
            ));
        }
        if self.limits.max_file_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_file_size_mb must be > 0".into(),
            ));
        }
        if self.limits.max_file_size_mb > MAX_FILE_SIZE_MB_LIMIT {
            return Err(ConfigError::ValidationError(format!(
                "limits.max_file_size_mb must be <= {MAX_FILE_SIZE_MB_LIMIT}, got {}",
                self.limits.max_file_size_mb
            )));
        }
        if !OUTPUT_FORMATS.contains(&self.output.format.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "output.format must be one of {OUTPUT_FORMATS:?}, got '{}'",
                self.output.format
            )));
        }
        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "logging.format must be one of {LOG_FORMATS:?}, got '{}'",
                self.logging.format
            )));
        }
        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "logging.level must be one of {LOG_LEVELS:?}, got '{}'",
                self.logging.level
            )));
        }
        Ok(())
    }
}
