//! Plant disease analysis: the request contract, the adapter, and its
//! result types.

mod analyzer;
mod request;
mod types;

pub use analyzer::{parse_diagnosis, Analyzer};
pub use request::{
    response_schema, AnalysisRequest, PATHOLOGIST_PROMPT, REQUIRED_FIELDS, RESPONSE_MIME_TYPE,
    TEMPERATURE,
};
pub use types::{
    AnalysisOutcome, AnalysisRecord, DiseaseAnalysisResult, ErrorReport, RecordStatus,
    TimedOutcome, TreatmentPlan, Verdict,
};
