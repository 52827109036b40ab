// All LLM prompt constants for the matching pipeline.
// Cross-cutting fragments come from llm_client::prompts.

/// Resume structuring prompt template.
/// Replace `{no_fabrication}` and `{raw_text}` before sending.
///
/// The output field names are a wire contract with the resume-builder UI —
/// downstream code depends on them exactly as written.
pub const STRUCTURE_RESUME_PROMPT_TEMPLATE: &str = r#"{no_fabrication}

Extract the candidate profile from the resume text below into a structured JSON object.

Return a JSON object with this EXACT schema (no extra fields):
{
  "job_to_search_for": "the role the candidate is best suited to search for",
  "Work Experience": "total years of experience, as free text",
  "Key_Responsibilities_and_Achievements": ["one responsibility or achievement per entry"],
  "Skills": ["one skill per entry"],
  "Certifications": ["one certification per entry"],
  "Projects": ["one project per entry"],
  "recap": "2-3 sentence summary of the candidate"
}

Rules:
1. Every list field must be present. Use an empty array when the resume has nothing for it.
2. "Work Experience" is free text, e.g. "5 years" — do not convert to a number.
3. Return ONLY the JSON object — nothing else, no code fences.

RESUME TEXT:
{raw_text}"#;

/// Recommendation formatting prompt template.
/// Replace `{no_fabrication}` and `{raw_matches}` before sending.
pub const FORMAT_RECOMMENDATIONS_PROMPT_TEMPLATE: &str = r#"{no_fabrication}

The text below contains job listings separated by "---". Restructure them into a JSON object.

Return a JSON object with this EXACT schema (no extra fields):
{
  "jobs": [
    {
      "jobTitle": "string",
      "link": "string",
      "description": "string",
      "location": "string"
    }
  ]
}

Rules:
1. One entry per listing in the input, in the same order.
2. Take jobTitle from the "Title:" line, link from the "Job URL:" line, and location from the "Location:" line. Leave a field empty when its line is missing.
3. description is a short summary of the listing's free text — never content from another listing.
4. Return ONLY the JSON object — nothing else, no code fences.

JOB LISTINGS:
{raw_matches}"#;
