//! Inference client trait and response type.
//!
//! Defines the interface the analyzer talks to, plus the factory that builds
//! the production client from config and CLI overrides.

use crate::analysis::AnalysisRequest;
use crate::config::GeminiConfig;
use crate::error::{ConfigError, TransportError};
use async_trait::async_trait;
use std::time::Duration;

/// What came back from one inference call.
#[derive(Debug, Clone)]
pub struct InferenceResponse {
    /// Generated text, `None` when the service produced none
    pub text: Option<String>,
    /// Model identifier used
    pub model: String,
    /// Number of tokens used (input + output), if reported
    pub tokens_used: Option<u32>,
    /// Round-trip latency in milliseconds
    pub latency_ms: u64,
}

/// Client for a multimodal inference service with structured output.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (the analyzer holds a `Box<dyn InferenceClient>`).
#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Client name for logging (e.g., "gemini").
    fn name(&self) -> &str;

    /// Model identifier requests are sent to.
    fn model(&self) -> &str;

    /// Issue one request. Every failure here is a transport failure.
    async fn generate(&self, request: &AnalysisRequest) -> Result<InferenceResponse, TransportError>;

    /// Per-request timeout for this client.
    fn timeout(&self) -> Duration;
}

/// Resolve `${ENV_VAR}` references in config strings.
pub fn resolve_env_var(value: &str) -> Option<String> {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).ok().filter(|v| !v.is_empty())
    } else if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Factory that creates the inference client from config and overrides.
pub struct InferenceClientFactory;

impl InferenceClientFactory {
    /// Create the Gemini client.
    ///
    /// # Arguments
    /// * `config` - The `[gemini]` config section
    /// * `api_key_override` - Key given on the command line, wins over config
    /// * `model_override` - Optional model name that overrides the config default
    pub fn create(
        config: &GeminiConfig,
        api_key_override: Option<&str>,
        model_override: Option<&str>,
    ) -> Result<Box<dyn InferenceClient>, ConfigError> {
        let api_key = api_key_override
            .filter(|k| !k.is_empty())
            .map(String::from)
            .or_else(|| resolve_env_var(&config.api_key))
            .ok_or(ConfigError::MissingApiKey)?;
        let model = model_override.unwrap_or(&config.model);

        tracing::debug!("Creating Gemini client for model {model}");
        Ok(Box::new(super::gemini::GeminiClient::with_endpoint(
            &config.endpoint,
            &api_key,
            model,
            Duration::from_millis(config.timeout_ms),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_env_var() {
        // Non-env-var strings pass through
        assert_eq!(resolve_env_var("plain-key"), Some("plain-key".to_string()));
        // Empty returns None
        assert_eq!(resolve_env_var(""), None);
        // Unset env var returns None
        assert_eq!(resolve_env_var("${DEFINITELY_NOT_SET_FLORADOC_123}"), None);
    }

    #[test]
    fn test_resolve_env_var_reads_set_variable() {
        // Variable names are unique per test; tests share the process env
        std::env::set_var("FLORADOC_TEST_RESOLVE_KEY", "key-from-env");
        assert_eq!(
            resolve_env_var("${FLORADOC_TEST_RESOLVE_KEY}"),
            Some("key-from-env".to_string())
        );

        std::env::set_var("FLORADOC_TEST_RESOLVE_EMPTY", "");
        assert_eq!(resolve_env_var("${FLORADOC_TEST_RESOLVE_EMPTY}"), None);
    }

    #[test]
    fn test_factory_resolves_key_from_env() {
        std::env::set_var("FLORADOC_TEST_FACTORY_KEY", "key-from-env");
        let config = GeminiConfig {
            api_key: "${FLORADOC_TEST_FACTORY_KEY}".to_string(),
            ..GeminiConfig::default()
        };
        let client = InferenceClientFactory::create(&config, None, None).unwrap();
        assert_eq!(client.model(), "gemini-2.5-flash");
    }

    #[test]
    fn test_factory_prefers_override_key() {
        let config = GeminiConfig {
            api_key: "${DEFINITELY_NOT_SET_FLORADOC_123}".to_string(),
            ..GeminiConfig::default()
        };
        let client = InferenceClientFactory::create(&config, Some("cli-key"), None).unwrap();
        assert_eq!(client.name(), "gemini");
        assert_eq!(client.model(), "gemini-2.5-flash");
        assert_eq!(client.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_factory_model_override() {
        let config = GeminiConfig {
            api_key: "literal-key".to_string(),
            ..GeminiConfig::default()
        };
        let client =
            InferenceClientFactory::create(&config, None, Some("gemini-2.5-pro")).unwrap();
        assert_eq!(client.model(), "gemini-2.5-pro");
    }

    #[test]
    fn test_factory_missing_key() {
        let config = GeminiConfig {
            api_key: "${DEFINITELY_NOT_SET_FLORADOC_123}".to_string(),
            ..GeminiConfig::default()
        };
        let err = InferenceClientFactory::create(&config, Some(""), None)
            .err()
            .expect("missing key must fail");
        assert!(matches!(err, ConfigError::MissingApiKey));
    }
}
