//! Error types for FloraDoc.
//!
//! Analysis failures are classified into a small, stable taxonomy
//! ([`ErrorKind`]) so callers can react to the kind while still reaching
//! the underlying cause through [`std::error::Error::source`] for logging.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level error type for FloraDoc operations.
#[derive(Error, Debug)]
pub enum FloraError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Image analysis errors
    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    /// No credential for the inference service could be resolved
    #[error("Gemini API key not set. Set GEMINI_API_KEY env var or pass --api-key.")]
    MissingApiKey,
}

/// Classification of a failed analysis.
///
/// [`AnalysisError::kind`] yields the first three. `InvalidInput` only
/// labels output records for inputs rejected before any request was built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The inference service could not be reached or rejected the call.
    Transport,
    /// The call succeeded but produced no text.
    EmptyResponse,
    /// Text came back but did not match the declared schema.
    MalformedResponse,
    /// The upload surface could not produce an image; no request was sent.
    InvalidInput,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Transport => write!(f, "transport"),
            ErrorKind::EmptyResponse => write!(f, "empty_response"),
            ErrorKind::MalformedResponse => write!(f, "malformed_response"),
            ErrorKind::InvalidInput => write!(f, "invalid_input"),
        }
    }
}

/// Failure reaching the inference endpoint (network, auth, quota, timeout).
#[derive(Error, Debug)]
#[error("{message}")]
pub struct TransportError {
    /// Human-readable description
    pub message: String,
    /// HTTP status returned by the service, if any
    pub status_code: Option<u16>,
    /// Underlying cause (e.g. the `reqwest` error)
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: None,
            source: None,
        }
    }

    /// Attach the HTTP status the service answered with.
    pub fn with_status(mut self, status_code: u16) -> Self {
        self.status_code = Some(status_code);
        self
    }

    /// Attach the underlying cause.
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

/// Errors produced by a single image analysis.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The service call itself failed
    #[error("Inference request failed: {0}")]
    Transport(#[from] TransportError),

    /// The service answered without any text payload
    #[error("No response from {model}: the model returned no text")]
    EmptyResponse { model: String },

    /// The text payload did not conform to the diagnosis schema
    #[error("Malformed diagnosis from model: {message}")]
    MalformedResponse {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

impl AnalysisError {
    /// The taxonomy bucket this error falls into.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalysisError::Transport(_) => ErrorKind::Transport,
            AnalysisError::EmptyResponse { .. } => ErrorKind::EmptyResponse,
            AnalysisError::MalformedResponse { .. } => ErrorKind::MalformedResponse,
        }
    }
}

/// Convenience type alias for FloraDoc results.
pub type Result<T> = std::result::Result<T, FloraError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_kind_mapping() {
        let err = AnalysisError::from(TransportError::new("connection refused"));
        assert_eq!(err.kind(), ErrorKind::Transport);

        let err = AnalysisError::EmptyResponse {
            model: "gemini-2.5-flash".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::EmptyResponse);

        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = AnalysisError::MalformedResponse {
            message: source.to_string(),
            source,
        };
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    }

    #[test]
    fn test_invalid_input_kind_wire_name() {
        assert_eq!(ErrorKind::InvalidInput.to_string(), "invalid_input");
        assert_eq!(
            serde_json::to_value(ErrorKind::InvalidInput).unwrap(),
            serde_json::json!("invalid_input")
        );
    }

    #[test]
    fn test_transport_cause_is_retrievable() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset by peer");
        let err = AnalysisError::from(
            TransportError::new("Gemini request failed")
                .with_status(503)
                .with_source(io),
        );

        let transport = err.source().expect("transport error as source");
        let cause = transport.source().expect("io error as cause");
        assert!(cause.to_string().contains("reset by peer"));

        match err {
            AnalysisError::Transport(t) => assert_eq!(t.status_code, Some(503)),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_error_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorKind::MalformedResponse).unwrap();
        assert_eq!(json, "\"malformed_response\"");
        assert_eq!(ErrorKind::EmptyResponse.to_string(), "empty_response");
    }
}
