use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::embeddings::EmbeddingProvider;
use crate::llm_client::LlmClient;
use crate::vector_store::VectorIndex;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub llm: LlmClient,
    /// Active embedding backend, selected at startup via EMBEDDING_PROVIDER.
    /// Ingestion and queries must share it — stored vectors are tagged with
    /// its model id and the matcher rejects cross-model results.
    pub embedder: Arc<dyn EmbeddingProvider>,
    pub vectors: Arc<dyn VectorIndex>,
    pub config: Config,
}
