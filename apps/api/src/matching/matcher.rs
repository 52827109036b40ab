//! Job Matcher — builds the search query, embeds it, runs the vector search,
//! and renders the matches into one composite text block for the formatter.

use serde_json::Value;
use tracing::debug;

use crate::embeddings::EmbeddingProvider;
use crate::errors::AppError;
use crate::matching::query_builder::build_query;
use crate::matching::resume_structurer::StructuredResume;
use crate::vector_store::{VectorIndex, VectorMatch};

/// Separator between match blocks in the composite text.
pub const MATCH_SEPARATOR: &str = "\n\n---\n\n";

/// Runs query building → query embedding → vector search and formats the
/// result. An empty index (or no matches) yields an empty composite string,
/// not an error.
///
/// The query embedding MUST come from the same backend that ingested the
/// stored chunks; every stored record carries its model id and any mismatch
/// is rejected here rather than silently returning cross-space scores.
pub async fn find_matches(
    resume: &StructuredResume,
    target_role: &str,
    target_country: &str,
    top_k: usize,
    embedder: &dyn EmbeddingProvider,
    index: &dyn VectorIndex,
) -> Result<String, AppError> {
    let query = build_query(resume, target_role, target_country);
    debug!("search query built ({} chars)", query.len());

    let vector = embedder.embed(&query).await?;
    let matches = index.query(&vector, top_k, true).await?;
    debug!("vector search returned {} matches", matches.len());

    for hit in &matches {
        check_embedding_model(hit, embedder.model_id())?;
    }

    let blocks: Vec<String> = matches.iter().filter_map(format_match_block).collect();
    Ok(blocks.join(MATCH_SEPARATOR))
}

/// Rejects matches whose stored vectors came from a different embedding model
/// than the one that produced the query vector. Untagged records count as a
/// mismatch: similarity across vector spaces is meaningless.
fn check_embedding_model(hit: &VectorMatch, expected: &str) -> Result<(), AppError> {
    let found = hit
        .metadata
        .as_ref()
        .and_then(|m| m.get("embedding_model"))
        .and_then(Value::as_str)
        .unwrap_or("<untagged>");
    if found != expected {
        return Err(AppError::ModelMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        });
    }
    Ok(())
}

/// Renders one match as a plain-text block. Blank fields are omitted, not
/// rendered as empty lines; a match with no usable metadata renders nothing.
fn format_match_block(hit: &VectorMatch) -> Option<String> {
    let meta = hit.metadata.as_ref()?;
    let mut lines = Vec::new();

    if let Some(title) = nonblank(meta, "title") {
        lines.push(format!("Title: {title}"));
    }
    if let Some(company) = nonblank(meta, "company") {
        lines.push(format!("Company: {company}"));
    }
    if let Some(text) = nonblank(meta, "chunk_text") {
        lines.push(text.to_string());
    }
    if let Some(location) = nonblank(meta, "location") {
        lines.push(format!("Location: {location}"));
    }
    if let Some(url) = nonblank(meta, "url") {
        lines.push(format!("Job URL: {url}"));
    }

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

fn nonblank<'a>(meta: &'a Value, key: &str) -> Option<&'a str> {
    meta.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hit(metadata: Value) -> VectorMatch {
        VectorMatch {
            id: "job-1#0".to_string(),
            score: 0.9,
            metadata: Some(metadata),
        }
    }

    #[test]
    fn test_block_renders_all_fields() {
        let block = format_match_block(&hit(json!({
            "title": "Software Engineer",
            "company": "Acme",
            "chunk_text": "Build and run backend services.",
            "location": "Berlin",
            "url": "https://jobs.example.com/1",
        })))
        .unwrap();
        assert_eq!(
            block,
            "Title: Software Engineer\nCompany: Acme\nBuild and run backend services.\nLocation: Berlin\nJob URL: https://jobs.example.com/1"
        );
    }

    #[test]
    fn test_blank_fields_are_omitted() {
        let block = format_match_block(&hit(json!({
            "title": "Software Engineer",
            "company": "",
            "location": "   ",
        })))
        .unwrap();
        assert_eq!(block, "Title: Software Engineer");
    }

    #[test]
    fn test_match_without_metadata_renders_nothing() {
        let hit = VectorMatch {
            id: "job-1#0".to_string(),
            score: 0.9,
            metadata: None,
        };
        assert!(format_match_block(&hit).is_none());
    }

    #[test]
    fn test_matching_model_tag_passes() {
        let hit = hit(json!({"embedding_model": "text-embedding-3-small"}));
        assert!(check_embedding_model(&hit, "text-embedding-3-small").is_ok());
    }

    #[test]
    fn test_mismatched_model_tag_is_rejected() {
        let hit = hit(json!({"embedding_model": "gemini-embedding-001"}));
        let err = check_embedding_model(&hit, "text-embedding-3-small").unwrap_err();
        assert!(matches!(err, AppError::ModelMismatch { .. }));
    }

    #[test]
    fn test_untagged_record_is_rejected() {
        let hit = hit(json!({"title": "Engineer"}));
        assert!(check_embedding_model(&hit, "text-embedding-3-small").is_err());
    }

    mod end_to_end {
        use super::*;
        use crate::embeddings::testing::KeywordEmbedder;
        use crate::ingestion::{ingest_postings, ChunkingConfig};
        use crate::matching::formatter::parse_recommendations;
        use crate::matching::resume_structurer::StructuredResume;
        use crate::models::job::{JobPosting, JobType};
        use crate::vector_store::testing::InMemoryIndex;
        use chrono::{TimeZone, Utc};

        fn posting(id: &str, title: &str, description: &str) -> JobPosting {
            JobPosting {
                external_id: id.to_string(),
                title: title.to_string(),
                company: "Acme".to_string(),
                location: "New York".to_string(),
                description: description.to_string(),
                url: format!("https://jobs.example.com/{id}"),
                is_remote: false,
                job_type: JobType::FullTime,
                salary_range: None,
                skills: None,
                posted_at: Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
            }
        }

        fn resume() -> StructuredResume {
            StructuredResume {
                job_to_search_for: "Software Engineer".to_string(),
                skills: vec!["Python".to_string(), "React".to_string()],
                ..StructuredResume::default()
            }
        }

        /// Two engineering postings and one marketing posting: at top_k=2 the
        /// composite text must contain exactly the engineering pair.
        #[tokio::test]
        async fn test_engineering_postings_outrank_marketing() {
            let embedder = KeywordEmbedder;
            let index = InMemoryIndex::default();
            let postings = vec![
                posting("eng-1", "Software Engineer", "Engineer backend services. Software engineer role."),
                posting("eng-2", "Software Engineer", "Engineer distributed systems as a software engineer."),
                posting("mkt-1", "Marketing Intern", "Support the marketing team with marketing campaigns."),
            ];
            ingest_postings(&postings, &embedder, &index, ChunkingConfig::default())
                .await
                .unwrap();

            let composite = find_matches(&resume(), "Software Engineer", "usa", 2, &embedder, &index)
                .await
                .unwrap();

            let blocks: Vec<&str> = composite.split(MATCH_SEPARATOR).collect();
            assert_eq!(blocks.len(), 2);
            assert!(composite.contains("https://jobs.example.com/eng-1"));
            assert!(composite.contains("https://jobs.example.com/eng-2"));
            assert!(!composite.contains("Marketing Intern"));

            // The formatter stage parses a schema-conforming model response
            // into exactly one recommendation per block.
            let model_output = r#"{"jobs": [
                {"jobTitle": "Software Engineer", "link": "https://jobs.example.com/eng-1", "description": "Backend services.", "location": "New York"},
                {"jobTitle": "Software Engineer", "link": "https://jobs.example.com/eng-2", "description": "Distributed systems.", "location": "New York"}
            ]}"#;
            let recommendations = parse_recommendations(model_output).unwrap();
            assert_eq!(recommendations.len(), 2);
        }

        /// Querying an empty index is a valid empty result, not an error.
        #[tokio::test]
        async fn test_empty_index_yields_empty_composite() {
            let composite = find_matches(
                &resume(),
                "Software Engineer",
                "usa",
                5,
                &KeywordEmbedder,
                &InMemoryIndex::default(),
            )
            .await
            .unwrap();
            assert!(composite.is_empty());
        }
    }
}
