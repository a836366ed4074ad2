//! The fixed request contract sent with every image.
//!
//! The instruction, the response schema and the sampling temperature never
//! vary between calls; only the image does.

use crate::image::EncodedImage;
use serde_json::{json, Value};
use std::sync::OnceLock;

/// Sampling temperature for diagnosis requests.
pub const TEMPERATURE: f32 = 0.4;

/// MIME type the response is forced into.
pub const RESPONSE_MIME_TYPE: &str = "application/json";

/// Fields the model must always return.
pub const REQUIRED_FIELDS: &[&str] = &[
    "isPlant",
    "plantName",
    "condition",
    "confidence",
    "symptoms",
    "treatments",
];

/// Instruction sent alongside the image.
pub const PATHOLOGIST_PROMPT: &str = "You are an expert plant pathologist. Analyze this image. \
     If it is not a plant, set isPlant to false and leave other fields empty or generic. \
     If it is a plant, identify it, detect any diseases, and provide detailed treatments. \
     Return the result in JSON format.";

/// Response schema in the Gemini OpenAPI-subset dialect.
///
/// Built once and shared; every request borrows the same value.
pub fn response_schema() -> &'static Value {
    static SCHEMA: OnceLock<Value> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        let string_list = |description: &str| {
            json!({
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": description,
            })
        };

        json!({
            "type": "OBJECT",
            "properties": {
                "isPlant": {
                    "type": "BOOLEAN",
                    "description": "True if the image contains a plant or leaf, false otherwise.",
                },
                "plantName": {
                    "type": "STRING",
                    "description": "Common name of the plant identified.",
                },
                "condition": {
                    "type": "STRING",
                    "description": "The name of the disease detected, or 'Healthy' if no disease is found.",
                },
                "confidence": {
                    "type": "NUMBER",
                    "description": "Confidence score of the diagnosis from 0 to 100.",
                },
                "description": {
                    "type": "STRING",
                    "description": "A brief summary of the condition.",
                },
                "symptoms": string_list("List of visual symptoms identified."),
                "causes": string_list("Potential causes of the disease (fungal, bacterial, pests, etc.)."),
                "treatments": {
                    "type": "OBJECT",
                    "properties": {
                        "organic": string_list("Organic or home remedies."),
                        "chemical": string_list("Chemical fungicides or pesticides."),
                    },
                    "required": ["organic", "chemical"],
                },
                "prevention": string_list("Steps to prevent future outbreaks."),
            },
            "required": REQUIRED_FIELDS,
        })
    })
}

/// A single diagnosis request: one image plus the fixed contract.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    /// The image to diagnose
    pub image: EncodedImage,
    /// Instruction for the model
    pub prompt: &'static str,
    /// Structured-output schema
    pub schema: &'static Value,
    /// MIME type the response is constrained to
    pub response_mime_type: &'static str,
    /// Sampling temperature
    pub temperature: f32,
}

impl AnalysisRequest {
    pub fn new(image: EncodedImage) -> Self {
        Self {
            image,
            prompt: PATHOLOGIST_PROMPT,
            schema: response_schema(),
            response_mime_type: RESPONSE_MIME_TYPE,
            temperature: TEMPERATURE,
        }
    }
}
