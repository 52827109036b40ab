//! Pinecone REST client for the vector index.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::vector_store::{StoreError, VectorIndex, VectorMatch, VectorRecord};

/// Pinecone rejects upsert payloads above this record count.
const UPSERT_BATCH_SIZE: usize = 100;

#[derive(Debug, Serialize)]
struct UpsertRequest<'a> {
    vectors: &'a [VectorRecord],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<VectorMatch>,
}

/// Client for one Pinecone index, addressed by its dedicated host URL.
#[derive(Clone)]
pub struct PineconeClient {
    client: Client,
    index_host: String,
    api_key: String,
}

impl PineconeClient {
    pub fn new(api_key: String, index_host: String, timeout: std::time::Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
            index_host: index_host.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<reqwest::Response, StoreError> {
        let response = self
            .client
            .post(format!("{}{}", self.index_host, path))
            .header("Api-Key", &self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl VectorIndex for PineconeClient {
    async fn upsert(&self, records: &[VectorRecord]) -> Result<(), StoreError> {
        // Batches go out one at a time to bound burst load on the backend.
        // There is no atomicity across the sequence: a failure here leaves
        // earlier batches committed, which is safe because upsert overwrites.
        for batch in records.chunks(UPSERT_BATCH_SIZE) {
            self.post("/vectors/upsert", &UpsertRequest { vectors: batch })
                .await?;
            debug!("upserted batch of {} records", batch.len());
        }
        Ok(())
    }

    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        include_metadata: bool,
    ) -> Result<Vec<VectorMatch>, StoreError> {
        let response = self
            .post(
                "/query",
                &QueryRequest {
                    vector,
                    top_k,
                    include_metadata,
                },
            )
            .await?;

        let parsed: QueryResponse = response.json().await?;
        Ok(parsed.matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_request_uses_camel_case_keys() {
        let request = QueryRequest {
            vector: &[0.1, 0.2],
            top_k: 5,
            include_metadata: true,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["topK"], 5);
        assert_eq!(value["includeMetadata"], true);
    }

    #[test]
    fn test_query_response_without_matches_key_is_empty() {
        let parsed: QueryResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.matches.is_empty());
    }

    #[test]
    fn test_vector_match_deserializes_with_metadata() {
        let parsed: QueryResponse = serde_json::from_value(json!({
            "matches": [
                {"id": "job-1#0", "score": 0.92, "metadata": {"title": "Engineer"}},
                {"id": "job-2#1", "score": 0.85}
            ]
        }))
        .unwrap();
        assert_eq!(parsed.matches.len(), 2);
        assert_eq!(parsed.matches[0].id, "job-1#0");
        assert_eq!(parsed.matches[0].metadata.as_ref().unwrap()["title"], "Engineer");
        assert!(parsed.matches[1].metadata.is_none());
    }
}
