//! Inference service integration.
//!
//! Provides the client abstraction the analyzer depends on and the Gemini
//! implementation used in production.

pub(crate) mod gemini;
pub(crate) mod provider;

pub use gemini::GeminiClient;
pub use provider::{resolve_env_var, InferenceClient, InferenceClientFactory, InferenceResponse};
