//! The image analysis request adapter.
//!
//! Turns one encoded image into one inference call and maps whatever comes
//! back into an [`AnalysisOutcome`]. Stateless: no retries, no caching, no
//! concurrency guard. Callers keep at most one analysis in flight.

use super::request::AnalysisRequest;
use super::types::{AnalysisOutcome, DiseaseAnalysisResult, TimedOutcome};
use crate::config::GeminiConfig;
use crate::error::{AnalysisError, ConfigError, TransportError};
use crate::image::EncodedImage;
use crate::llm::{InferenceClient, InferenceClientFactory};
use std::time::Instant;

/// Plant disease analyzer backed by an injectable inference client.
pub struct Analyzer {
    client: Box<dyn InferenceClient>,
}

impl Analyzer {
    pub fn new(client: Box<dyn InferenceClient>) -> Self {
        Self { client }
    }

    /// Build an analyzer with the Gemini client described by `config`.
    pub fn from_config(
        config: &GeminiConfig,
        api_key_override: Option<&str>,
        model_override: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let client = InferenceClientFactory::create(config, api_key_override, model_override)?;
        Ok(Self::new(client))
    }

    /// Model identifier requests are sent to.
    pub fn model(&self) -> &str {
        self.client.model()
    }

    /// Diagnose one image.
    pub async fn analyze(&self, image: &EncodedImage) -> AnalysisOutcome {
        self.try_analyze(image).await.into()
    }

    /// Diagnose an image given as a `data:<mime>;base64,<payload>` string.
    pub async fn analyze_data_uri(&self, data_uri: &str) -> AnalysisOutcome {
        self.analyze(&EncodedImage::from_data_uri(data_uri)).await
    }

    /// Diagnose one image and report which model answered and how long the
    /// whole analysis took, failures included.
    pub async fn analyze_timed(&self, image: &EncodedImage) -> TimedOutcome {
        let start = Instant::now();
        let (result, model) = self.call(image).await;
        TimedOutcome {
            outcome: result.into(),
            model: model.unwrap_or_else(|| self.client.model().to_string()),
            latency_ms: start.elapsed().as_millis() as u64,
        }
    }

    /// Like [`Analyzer::analyze`], but as a `Result` for `?` propagation.
    pub async fn try_analyze(
        &self,
        image: &EncodedImage,
    ) -> Result<DiseaseAnalysisResult, AnalysisError> {
        self.call(image).await.0
    }

    /// One call to the client. The model is `Some` once the service answered.
    async fn call(
        &self,
        image: &EncodedImage,
    ) -> (Result<DiseaseAnalysisResult, AnalysisError>, Option<String>) {
        let request = AnalysisRequest::new(image.clone());
        tracing::debug!(
            "Sending {} ({} base64 chars) to {} model {}",
            request.image.media_type,
            request.image.data.len(),
            self.client.name(),
            self.client.model()
        );

        let timeout = self.client.timeout();
        let response = match tokio::time::timeout(timeout, self.client.generate(&request)).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                tracing::error!("{} analysis failed: {e}", self.client.name());
                return (Err(e.into()), None);
            }
            Err(_) => {
                let err = TransportError::new(format!(
                    "{} request timed out after {}ms",
                    self.client.name(),
                    timeout.as_millis()
                ));
                tracing::error!("{err}");
                return (Err(err.into()), None);
            }
        };

        let model = response.model;
        let Some(text) = response.text else {
            tracing::warn!("{model} returned no text");
            return (
                Err(AnalysisError::EmptyResponse {
                    model: model.clone(),
                }),
                Some(model),
            );
        };

        let result = match parse_diagnosis(&text) {
            Ok(result) => result,
            Err(err) => return (Err(err), Some(model)),
        };
        tracing::info!(
            "Diagnosed {} as '{}' ({}% confidence) in {}ms{}",
            if result.is_plant { result.plant_name.as_str() } else { "non-plant image" },
            result.condition,
            result.confidence,
            response.latency_ms,
            response
                .tokens_used
                .map(|t| format!(", {t} tokens"))
                .unwrap_or_default()
        );
        (Ok(result), Some(model))
    }
}

/// Strictly parse the model's text into a diagnosis.
///
/// Invalid JSON, a missing required field or a wrong type all fail with
/// [`AnalysisError::MalformedResponse`]; nothing is coerced or defaulted
/// beyond the optional fields.
pub fn parse_diagnosis(text: &str) -> Result<DiseaseAnalysisResult, AnalysisError> {
    serde_json::from_str(text).map_err(|source| {
        tracing::warn!("Model response does not match the diagnosis schema: {source}");
        AnalysisError::MalformedResponse {
            message: source.to_string(),
            source,
        }
    })
}
