//! Vector Store Client — stores `(id, vector, metadata)` tuples and answers
//! nearest-neighbor queries against them.
//!
//! The index is the only long-lived shared resource in the matching pipeline
//! and is never locked: concurrent ingestion and query operations interleave
//! freely, so a query may observe a partially-ingested posting. Accepted
//! consistency relaxation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub mod pinecone;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("vector store error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// The unit stored in the vector index. Metadata carries the denormalized
/// posting fields needed to render a result without a secondary lookup.
/// Metadata values must never be null — a backend constraint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorRecord {
    pub id: String,
    pub values: Vec<f32>,
    pub metadata: Value,
}

/// A single nearest-neighbor hit, ranked by descending similarity.
#[derive(Debug, Clone, Deserialize)]
pub struct VectorMatch {
    pub id: String,
    pub score: f32,
    #[serde(default)]
    pub metadata: Option<Value>,
}

/// The vector index contract. Concrete vendors are interchangeable; the
/// Pinecone client is the production backend, and tests swap in an
/// in-memory index.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Upserts records, idempotent by id — re-upserting an id overwrites its
    /// prior values and metadata. Issued in bounded batches, sequentially;
    /// a mid-sequence failure leaves earlier batches committed.
    async fn upsert(&self, records: &[VectorRecord]) -> Result<(), StoreError>;

    /// Returns up to `top_k` nearest records by descending similarity.
    /// An empty index yields an empty list, not an error.
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        include_metadata: bool,
    ) -> Result<Vec<VectorMatch>, StoreError>;
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::{StoreError, VectorIndex, VectorMatch, VectorRecord};

    /// In-memory index keyed by record id, last write wins, cosine-ranked.
    #[derive(Default)]
    pub struct InMemoryIndex {
        pub records: Mutex<HashMap<String, VectorRecord>>,
    }

    #[async_trait]
    impl VectorIndex for InMemoryIndex {
        async fn upsert(&self, records: &[VectorRecord]) -> Result<(), StoreError> {
            let mut map = self.records.lock().unwrap();
            for record in records {
                map.insert(record.id.clone(), record.clone());
            }
            Ok(())
        }

        async fn query(
            &self,
            vector: &[f32],
            top_k: usize,
            include_metadata: bool,
        ) -> Result<Vec<VectorMatch>, StoreError> {
            let map = self.records.lock().unwrap();
            let mut scored: Vec<VectorMatch> = map
                .values()
                .map(|record| VectorMatch {
                    id: record.id.clone(),
                    score: cosine(&record.values, vector),
                    metadata: include_metadata.then(|| record.metadata.clone()),
                })
                .collect();
            scored.sort_by(|a, b| b.score.total_cmp(&a.score));
            scored.truncate(top_k);
            Ok(scored)
        }
    }

    fn cosine(a: &[f32], b: &[f32]) -> f32 {
        let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
        let norm = |v: &[f32]| v.iter().map(|x| x * x).sum::<f32>().sqrt();
        let denom = norm(a) * norm(b);
        if denom == 0.0 {
            0.0
        } else {
            dot / denom
        }
    }
}
