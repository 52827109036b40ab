//! Embedding Provider Client — converts text into fixed-dimension vectors.
//!
//! Two interchangeable backends (OpenAI and Gemini) sit behind one trait.
//! Callers must not depend on which backend is active, but every vector
//! compared in one similarity query has to come from the same backend —
//! vector spaces are not interoperable across models. The active model id is
//! stamped into stored records at ingestion and checked again at query time.

use async_trait::async_trait;
use thiserror::Error;

pub mod gemini;
pub mod openai;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("embedding API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("malformed embedding response: {0}")]
    Malformed(String),
}

/// The embedding contract shared by all backends. Carried in `AppState` as
/// `Arc<dyn EmbeddingProvider>`, selected at startup via config.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Identifier of the model producing the vectors.
    fn model_id(&self) -> &str;

    /// Embeds a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError>;

    /// Embeds a batch, returning exactly one vector per input in input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError>;
}

#[cfg(test)]
pub(crate) mod testing {
    use async_trait::async_trait;

    use super::{EmbeddingProvider, ProviderError};

    /// Deterministic embedder for tests: counts domain keywords, so related
    /// texts land near each other under cosine similarity.
    pub struct KeywordEmbedder;

    #[async_trait]
    impl EmbeddingProvider for KeywordEmbedder {
        fn model_id(&self) -> &str {
            "keyword-stub-v1"
        }

        async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
            let lower = text.to_lowercase();
            let count = |needle: &str| lower.matches(needle).count() as f32;
            Ok(vec![count("engineer"), count("marketing"), 1.0])
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
            let mut out = Vec::with_capacity(texts.len());
            for text in texts {
                out.push(self.embed(text).await?);
            }
            Ok(out)
        }
    }
}
