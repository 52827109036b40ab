//! Recommendation Formatter — restructures the composite match text into the
//! job-listing schema the UI consumes.
//!
//! Guessed content is disallowed: when the model's output fails to parse, the
//! caller gets an empty list, never a partial or fabricated one.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::errors::AppError;
use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, NO_FABRICATION_INSTRUCTION};
use crate::llm_client::{strip_json_fences, LlmClient};
use crate::matching::prompts::FORMAT_RECOMMENDATIONS_PROMPT_TEMPLATE;

#[derive(Debug, Error)]
pub enum FormattingError {
    #[error("model output is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("model output lacks the \"jobs\" array")]
    MissingJobs,
}

/// A formatted job listing. Serialized field names are a wire contract with
/// the UI — do not rename them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecommendation {
    #[serde(rename = "jobTitle", default)]
    pub job_title: String,

    #[serde(default)]
    pub link: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub location: String,
}

/// Parses a model response into recommendations, tolerating code fences.
/// Invalid JSON or a missing `jobs` array is a `FormattingError`.
pub fn parse_recommendations(text: &str) -> Result<Vec<JobRecommendation>, FormattingError> {
    let value: serde_json::Value = serde_json::from_str(strip_json_fences(text))?;
    let jobs = value
        .get("jobs")
        .and_then(serde_json::Value::as_array)
        .ok_or(FormattingError::MissingJobs)?;
    jobs.iter()
        .map(|job| serde_json::from_value(job.clone()).map_err(FormattingError::InvalidJson))
        .collect()
}

/// Formats the composite match text with a single LLM call.
///
/// Transport failures surface as errors; unparseable model output is
/// discarded and the result is an empty list. An empty input means the vector
/// search found nothing — no call is made at all.
pub async fn format_recommendations(
    raw_matches: &str,
    llm: &LlmClient,
) -> Result<Vec<JobRecommendation>, AppError> {
    if raw_matches.trim().is_empty() {
        return Ok(Vec::new());
    }

    let prompt = FORMAT_RECOMMENDATIONS_PROMPT_TEMPLATE
        .replace("{no_fabrication}", NO_FABRICATION_INSTRUCTION)
        .replace("{raw_matches}", raw_matches);

    let text = llm.call_text(&prompt, JSON_ONLY_SYSTEM).await?;

    match parse_recommendations(&text) {
        Ok(jobs) => Ok(jobs),
        Err(e) => {
            warn!("discarding unparseable recommendation output: {e}");
            Ok(Vec::new())
        }
    }
}
