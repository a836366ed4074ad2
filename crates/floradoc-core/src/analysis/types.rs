//! Diagnosis data types returned by the analyzer.

use crate::error::{AnalysisError, ErrorKind};
use serde::{Deserialize, Serialize};

/// Remedies suggested for a detected disease.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TreatmentPlan {
    /// Organic or home remedies
    pub organic: Vec<String>,
    /// Chemical fungicides or pesticides
    pub chemical: Vec<String>,
}

impl TreatmentPlan {
    pub fn is_empty(&self) -> bool {
        self.organic.is_empty() && self.chemical.is_empty()
    }
}

/// Structured diagnosis as returned by the model.
///
/// Required wire fields have no serde default, so a response missing any of
/// them fails to deserialize instead of being silently filled in. Optional
/// fields (`description`, `causes`, `prevention`) normalize to empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiseaseAnalysisResult {
    /// False when no plant was detected; other fields are then generic
    pub is_plant: bool,

    /// Common name of the identified plant
    pub plant_name: String,

    /// Disease name, or "Healthy"
    pub condition: String,

    /// Confidence score from 0 to 100, as reported by the model
    pub confidence: f64,

    /// Brief summary of the condition
    #[serde(default)]
    pub description: String,

    /// Visual symptoms identified
    pub symptoms: Vec<String>,

    /// Potential causes (fungal, bacterial, pests, ...)
    #[serde(default)]
    pub causes: Vec<String>,

    /// Organic and chemical remedies
    pub treatments: TreatmentPlan,

    /// Steps to prevent future outbreaks
    #[serde(default)]
    pub prevention: Vec<String>,
}

/// How a diagnosis should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// No plant in the image; nothing else in the result is meaningful.
    NotAPlant,
    /// A plant without disease; treatments are not shown.
    Healthy,
    /// A plant with the disease named in `condition`.
    Diseased,
}

impl DiseaseAnalysisResult {
    /// Whether `condition` names the healthy state.
    ///
    /// The model only returns free text here, so "healthy" is recognized as a
    /// case-insensitive substring ("Healthy", "healthy lettuce", ...).
    pub fn is_healthy(&self) -> bool {
        self.condition.to_lowercase().contains("healthy")
    }

    pub fn verdict(&self) -> Verdict {
        if !self.is_plant {
            Verdict::NotAPlant
        } else if self.is_healthy() {
            Verdict::Healthy
        } else {
            Verdict::Diseased
        }
    }
}

/// Result of analyzing a single image.
#[derive(Debug)]
pub enum AnalysisOutcome {
    Success(DiseaseAnalysisResult),
    Failure(AnalysisError),
}

impl AnalysisOutcome {
    /// Message shown to the user when an analysis fails.
    pub const FAILURE_MESSAGE: &'static str = "Failed to analyze image. Please try again.";

    pub fn is_success(&self) -> bool {
        matches!(self, AnalysisOutcome::Success(_))
    }

    pub fn result(&self) -> Option<&DiseaseAnalysisResult> {
        match self {
            AnalysisOutcome::Success(result) => Some(result),
            AnalysisOutcome::Failure(_) => None,
        }
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            AnalysisOutcome::Success(_) => None,
            AnalysisOutcome::Failure(err) => Some(err.kind()),
        }
    }

    pub fn into_result(self) -> Result<DiseaseAnalysisResult, AnalysisError> {
        self.into()
    }
}

/// An outcome together with the model that handled it and the wall-clock
/// time the analysis took.
#[derive(Debug)]
pub struct TimedOutcome {
    pub outcome: AnalysisOutcome,
    pub model: String,
    pub latency_ms: u64,
}

impl From<Result<DiseaseAnalysisResult, AnalysisError>> for AnalysisOutcome {
    fn from(result: Result<DiseaseAnalysisResult, AnalysisError>) -> Self {
        match result {
            Ok(diagnosis) => AnalysisOutcome::Success(diagnosis),
            Err(err) => AnalysisOutcome::Failure(err),
        }
    }
}

impl From<AnalysisOutcome> for Result<DiseaseAnalysisResult, AnalysisError> {
    fn from(outcome: AnalysisOutcome) -> Self {
        match outcome {
            AnalysisOutcome::Success(diagnosis) => Ok(diagnosis),
            AnalysisOutcome::Failure(err) => Err(err),
        }
    }
}

/// Serializable failure summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub message: String,
}

/// Status discriminant of an [`AnalysisRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    Success,
    Failure,
}

/// One line of JSON/JSONL output describing an analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRecord {
    /// The input as the user named it (file path or "data-uri")
    pub input: String,

    pub status: RecordStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<Verdict>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<DiseaseAnalysisResult>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorReport>,

    /// Model that handled the request; absent if the service was never called
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

impl AnalysisRecord {
    pub fn new(input: impl Into<String>, outcome: &AnalysisOutcome) -> Self {
        let input = input.into();
        match outcome {
            AnalysisOutcome::Success(result) => Self {
                input,
                status: RecordStatus::Success,
                verdict: Some(result.verdict()),
                result: Some(result.clone()),
                error: None,
                model: None,
                latency_ms: None,
            },
            AnalysisOutcome::Failure(err) => Self::failure(input, err.kind(), err.to_string()),
        }
    }

    /// Record for an analysis that reached the service.
    pub fn from_timed(input: impl Into<String>, timed: &TimedOutcome) -> Self {
        Self {
            model: Some(timed.model.clone()),
            latency_ms: Some(timed.latency_ms),
            ..Self::new(input, &timed.outcome)
        }
    }

    /// A failure reported without an [`AnalysisError`], e.g. an unreadable
    /// file rejected before the analyzer was called.
    pub fn failure(input: impl Into<String>, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            status: RecordStatus::Failure,
            verdict: None,
            result: None,
            error: Some(ErrorReport {
                kind,
                message: message.into(),
            }),
            model: None,
            latency_ms: None,
        }
    }
}
