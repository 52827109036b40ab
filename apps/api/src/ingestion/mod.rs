//! Job Ingestion Pipeline — chunks job postings, embeds each chunk, and
//! upserts the results into the vector index.
//!
//! Runs at startup, on the manual HTTP trigger, and on the periodic refresh
//! task. The index is append-only from this side: postings that disappear
//! from the feed keep their stale records, and only `is_active` filtering at
//! the database layer limits what gets re-indexed. Queries running while an
//! ingest is in flight may observe a partially-ingested posting.

use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::embeddings::EmbeddingProvider;
use crate::errors::AppError;
use crate::matching::chunker::chunk_text;
use crate::models::job::JobPosting;
use crate::vector_store::{VectorIndex, VectorRecord};

/// Chunking parameters for posting documents.
#[derive(Debug, Clone, Copy)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            overlap: 200,
        }
    }
}

/// Counts reported back from one ingestion run.
#[derive(Debug, Default, Serialize)]
pub struct IngestReport {
    pub postings: usize,
    pub chunks: usize,
    pub records: usize,
}

/// Indexes the given postings: document assembly → chunking → batch embedding
/// → vector records → sequential batched upsert.
///
/// Chunk order is preserved end to end: `embed_batch` returns one vector per
/// chunk in input order, and record `i` carries `chunk_index = i` with
/// `embeddings[i]`. Misaligning the two would silently pair the wrong text
/// with a vector.
pub async fn ingest_postings(
    postings: &[JobPosting],
    embedder: &dyn EmbeddingProvider,
    index: &dyn VectorIndex,
    chunking: ChunkingConfig,
) -> Result<IngestReport, AppError> {
    let mut report = IngestReport::default();

    for posting in postings {
        let document = posting.to_document();
        let chunks = chunk_text(&document, chunking.chunk_size, chunking.overlap);
        if chunks.is_empty() {
            debug!("posting {} has no text to index", posting.external_id);
            continue;
        }

        let embeddings = embedder.embed_batch(&chunks).await?;

        let records: Vec<VectorRecord> = chunks
            .iter()
            .zip(embeddings)
            .enumerate()
            .map(|(i, (chunk, values))| VectorRecord {
                id: format!("{}#{}", posting.external_id, i),
                values,
                metadata: posting_metadata(posting, i, chunk, embedder.model_id()),
            })
            .collect();

        index.upsert(&records).await?;

        report.postings += 1;
        report.chunks += chunks.len();
        report.records += records.len();
    }

    info!(
        "ingested {} postings ({} chunks) into the vector index",
        report.postings, report.chunks
    );
    Ok(report)
}

/// Builds the denormalized metadata stored with each chunk vector. The store
/// rejects null values, so optional fields collapse to empty strings.
fn posting_metadata(posting: &JobPosting, chunk_index: usize, chunk: &str, model_id: &str) -> Value {
    json!({
        "job_id": posting.external_id,
        "title": posting.title,
        "company": posting.company,
        "location": posting.location,
        "url": posting.url,
        "is_remote": posting.is_remote,
        "job_type": posting.job_type.as_str(),
        "salary_range": posting.salary_range.as_deref().unwrap_or_default(),
        "skills": posting.skills.as_deref().unwrap_or_default().join(", "),
        "posted_at": posting.posted_at.to_rfc3339(),
        "chunk_index": chunk_index,
        "chunk_text": chunk,
        "embedding_model": model_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::testing::KeywordEmbedder;
    use crate::models::job::JobType;
    use crate::vector_store::testing::InMemoryIndex;
    use chrono::{TimeZone, Utc};

    fn posting(id: &str, description: &str) -> JobPosting {
        JobPosting {
            external_id: id.to_string(),
            title: "Software Engineer".to_string(),
            company: "Acme".to_string(),
            location: "Berlin".to_string(),
            description: description.to_string(),
            url: format!("https://jobs.example.com/{id}"),
            is_remote: false,
            job_type: JobType::FullTime,
            salary_range: None,
            skills: None,
            posted_at: Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_record_ids_and_chunk_indexes_align_with_embeddings() {
        let embedder = KeywordEmbedder;
        let index = InMemoryIndex::default();
        let long_description = "responsibilities and requirements ".repeat(20);
        let p = posting("job-1", &long_description);

        let report = ingest_postings(
            &[p.clone()],
            &embedder,
            &index,
            ChunkingConfig {
                chunk_size: 100,
                overlap: 20,
            },
        )
        .await
        .unwrap();

        assert_eq!(report.postings, 1);
        assert!(report.chunks > 1);
        assert_eq!(report.chunks, report.records);

        let chunks = chunk_text(&p.to_document(), 100, 20);
        let map = index.records.lock().unwrap();
        assert_eq!(map.len(), chunks.len());
        for (i, chunk) in chunks.iter().enumerate() {
            let record = map.get(&format!("job-1#{i}")).expect("record for chunk");
            assert_eq!(record.metadata["chunk_index"], i);
            assert_eq!(record.metadata["chunk_text"], chunk.as_str());
            assert_eq!(record.values, embedder.embed(chunk).await.unwrap());
        }
    }

    #[tokio::test]
    async fn test_metadata_contains_no_nulls() {
        let index = InMemoryIndex::default();
        let mut p = posting("job-2", "short description");
        p.salary_range = None;
        p.skills = None;

        ingest_postings(&[p], &KeywordEmbedder, &index, ChunkingConfig::default())
            .await
            .unwrap();

        let map = index.records.lock().unwrap();
        for record in map.values() {
            for (key, value) in record.metadata.as_object().unwrap() {
                assert!(!value.is_null(), "metadata key {key} is null");
            }
            assert_eq!(record.metadata["embedding_model"], "keyword-stub-v1");
        }
    }

    #[tokio::test]
    async fn test_reingest_overwrites_rather_than_duplicates() {
        let index = InMemoryIndex::default();
        let p1 = posting("job-3", "original text");
        ingest_postings(&[p1], &KeywordEmbedder, &index, ChunkingConfig::default())
            .await
            .unwrap();

        let mut p2 = posting("job-3", "updated text");
        p2.title = "Senior Software Engineer".to_string();
        ingest_postings(&[p2], &KeywordEmbedder, &index, ChunkingConfig::default())
            .await
            .unwrap();

        let map = index.records.lock().unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map["job-3#0"].metadata["title"], "Senior Software Engineer");
    }

    #[tokio::test]
    async fn test_empty_posting_list_is_a_noop() {
        let index = InMemoryIndex::default();
        let report = ingest_postings(&[], &KeywordEmbedder, &index, ChunkingConfig::default())
            .await
            .unwrap();
        assert_eq!(report.postings, 0);
        assert!(index.records.lock().unwrap().is_empty());
    }
}
