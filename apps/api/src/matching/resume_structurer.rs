//! Resume Structuring Service — converts free-text resume content into a
//! normalized structured record via one LLM extraction call.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, NO_FABRICATION_INSTRUCTION};
use crate::llm_client::{strip_json_fences, LlmClient, LlmError};
use crate::matching::prompts::STRUCTURE_RESUME_PROMPT_TEMPLATE;

#[derive(Debug, Error)]
pub enum StructuringError {
    #[error("LLM call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("model output is not a valid resume object: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// The AI-normalized candidate profile.
///
/// Serialized field names are a wire contract with the resume-builder UI —
/// do not rename them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StructuredResume {
    #[serde(rename = "job_to_search_for", default)]
    pub job_to_search_for: String,

    /// Years of experience, as free text (e.g. "5 years").
    #[serde(rename = "Work Experience", default)]
    pub work_experience: String,

    #[serde(rename = "Key_Responsibilities_and_Achievements", default)]
    pub responsibilities: Vec<String>,

    #[serde(rename = "Skills", default)]
    pub skills: Vec<String>,

    #[serde(rename = "Certifications", default)]
    pub certifications: Vec<String>,

    #[serde(rename = "Projects", default)]
    pub projects: Vec<String>,

    #[serde(default)]
    pub recap: String,
}

/// Parses a model response into a `StructuredResume`, tolerating code fences.
/// List fields absent from the output come back empty, never missing.
pub fn parse_structured_resume(text: &str) -> Result<StructuredResume, StructuringError> {
    Ok(serde_json::from_str(strip_json_fences(text))?)
}

/// Structures raw resume text with a single LLM call. Not retried: a failure
/// here is terminal for the request, and nothing partial is persisted.
pub async fn structure_resume(
    raw_text: &str,
    llm: &LlmClient,
) -> Result<StructuredResume, StructuringError> {
    let prompt = STRUCTURE_RESUME_PROMPT_TEMPLATE
        .replace("{no_fabrication}", NO_FABRICATION_INSTRUCTION)
        .replace("{raw_text}", raw_text);

    let text = llm.call_text(&prompt, JSON_ONLY_SYSTEM).await?;
    parse_structured_resume(&text)
}
