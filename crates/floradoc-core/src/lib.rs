//! FloraDoc Core - plant disease diagnosis from a single photo.
//!
//! A photo goes to a multimodal model together with a fixed instruction and
//! a strict response schema; the structured answer comes back as a typed
//! [`DiseaseAnalysisResult`] or a classified [`AnalysisError`].
//!
//! # Architecture
//!
//! ```text
//! data URI / bytes → EncodedImage → AnalysisRequest → InferenceClient → parse → AnalysisOutcome
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use floradoc_core::{Analyzer, AnalysisOutcome, Config};
//!
//! #[tokio::main]
//! async fn main() -> floradoc_core::Result<()> {
//!     let config = Config::load()?;
//!     let analyzer = Analyzer::from_config(&config.gemini, None, None)?;
//!
//!     match analyzer.analyze_data_uri("data:image/jpeg;base64,/9j/4AAQ...").await {
//!         AnalysisOutcome::Success(result) => println!("{}: {}", result.plant_name, result.condition),
//!         AnalysisOutcome::Failure(err) => eprintln!("{}: {err}", err.kind()),
//!     }
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod analysis;
pub mod config;
pub mod error;
pub mod image;
pub mod llm;
pub mod output;

// Re-exports for convenient access
pub use analysis::{
    AnalysisOutcome, AnalysisRecord, AnalysisRequest, Analyzer, DiseaseAnalysisResult,
    TimedOutcome, TreatmentPlan, Verdict,
};
pub use config::Config;
pub use error::{AnalysisError, ConfigError, ErrorKind, FloraError, Result, TransportError};
pub use image::EncodedImage;
pub use llm::{GeminiClient, InferenceClient, InferenceClientFactory, InferenceResponse};
pub use output::{OutputFormat, RecordWriter};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
