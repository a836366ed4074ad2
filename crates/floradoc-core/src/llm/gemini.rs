//! Gemini client using the `generateContent` REST API.
//!
//! Sends the image as an inline-data part followed by the instruction text,
//! with the response constrained to JSON by a response schema.

use super::provider::{InferenceClient, InferenceResponse};
use crate::analysis::AnalysisRequest;
use crate::config::GeminiConfig;
use crate::error::TransportError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{Duration, Instant};

/// Gemini client for structured image diagnosis.
pub struct GeminiClient {
    endpoint: String,
    api_key: String,
    model: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(api_key: &str, model: &str) -> Self {
        let defaults = GeminiConfig::default();
        Self::with_endpoint(
            &defaults.endpoint,
            api_key,
            model,
            Duration::from_millis(defaults.timeout_ms),
        )
    }

    /// Create with a custom endpoint (self-hosted proxies, tests).
    pub fn with_endpoint(endpoint: &str, api_key: &str, model: &str, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            timeout,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

// --- Request types ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
enum Part<'a> {
    InlineData(InlineData<'a>),
    Text(&'a str),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
    response_schema: &'a Value,
    temperature: f32,
}

impl<'a> GenerateContentRequest<'a> {
    fn from_request(request: &'a AnalysisRequest) -> Self {
        Self {
            contents: vec![Content {
                role: "user",
                parts: vec![
                    Part::InlineData(InlineData {
                        mime_type: &request.image.media_type,
                        data: &request.image.data,
                    }),
                    Part::Text(request.prompt),
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: request.response_mime_type,
                response_schema: request.schema,
                temperature: request.temperature,
            },
        }
    }
}

// --- Response types ---

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
    usage_metadata: Option<UsageMetadata>,
    model_version: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    total_token_count: Option<u32>,
}

impl GenerateContentResponse {
    /// Concatenated answer text of the first candidate, if any.
    fn text(&self) -> Option<String> {
        if let Some(reason) = self
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            tracing::warn!("Gemini blocked the prompt: {reason}");
        }

        let candidate = self.candidates.first()?;
        if let Some(reason) = candidate.finish_reason.as_deref() {
            if reason != "STOP" {
                tracing::warn!("Gemini finished with reason {reason}");
            }
        }

        let text = candidate
            .content
            .as_ref()?
            .parts
            .iter()
            .filter(|p| !p.thought)
            .filter_map(|p| p.text.as_deref())
            .collect::<String>();

        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

#[async_trait]
impl InferenceClient for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: &AnalysisRequest) -> Result<InferenceResponse, TransportError> {
        let start = Instant::now();
        let body = GenerateContentRequest::from_request(request);

        let resp = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                TransportError::new(format!("Gemini request failed: {e}")).with_source(e)
            })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(
                TransportError::new(format!("Gemini HTTP {status}: {text}"))
                    .with_status(status.as_u16()),
            );
        }

        let gen_resp: GenerateContentResponse = resp.json().await.map_err(|e| {
            TransportError::new(format!("Failed to parse Gemini response: {e}")).with_source(e)
        })?;

        Ok(InferenceResponse {
            text: gen_resp.text(),
            model: gen_resp
                .model_version
                .clone()
                .unwrap_or_else(|| self.model.clone()),
            tokens_used: gen_resp
                .usage_metadata
                .as_ref()
                .and_then(|u| u.total_token_count),
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}
