//! Result records produced by the AI facade.
//!
//! All of these are plain immutable values: created at the return of a
//! request, discarded once the caller consumes them. Nothing persists.

use base64::Engine as _;
use serde::Deserialize;

/// Encode raw image bytes for use as an inline request payload.
pub fn encode_inline(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// Pest identification produced by a schema-constrained image analysis.
#[derive(Debug, Clone, Deserialize)]
pub struct PestAnalysisResult {
    pub name: String,
    pub description: String,
    pub prevention: Vec<String>,
    pub treatment: Vec<String>,
}

/// Soil assessment produced by a schema-constrained image analysis.
#[derive(Debug, Clone, Deserialize)]
pub struct SoilAnalysisResult {
    pub soil_type: String,
    #[serde(rename = "ph_level_estimate")]
    pub ph_estimate: String,
    #[serde(rename = "nutrient_deficiencies")]
    pub deficiencies: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Search-grounded summary text plus its citations, in provider order.
#[derive(Debug, Clone)]
pub struct DailySummaryResult {
    pub text: String,
    pub sources: Vec<SourceCitation>,
}

/// One grounding citation. Opaque beyond uri/title; `raw` keeps the full record.
#[derive(Debug, Clone)]
pub struct SourceCitation {
    pub uri: Option<String>,
    pub title: Option<String>,
    pub raw: serde_json::Value,
}

/// Base64-encoded synthesized speech.
#[derive(Debug, Clone)]
pub struct AudioPayload {
    pub data: String,
    pub mime_type: Option<String>,
}

/// Primary analysis plus its optional spoken rendition.
///
/// Invariant: `audio` is only ever populated when `analysis` is.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome<T> {
    pub analysis: Option<T>,
    pub audio: Option<AudioPayload>,
}

impl<T> AnalysisOutcome<T> {
    pub(crate) fn empty() -> Self {
        Self {
            analysis: None,
            audio: None,
        }
    }
}

/// Grounded summary plus its optional spoken rendition. Same invariant as
/// [`AnalysisOutcome`].
#[derive(Debug, Clone)]
pub struct SummaryOutcome {
    pub summary: Option<DailySummaryResult>,
    pub audio: Option<AudioPayload>,
}

impl SummaryOutcome {
    pub(crate) fn empty() -> Self {
        Self {
            summary: None,
            audio: None,
        }
    }
}
