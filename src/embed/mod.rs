//! Embedding capability consumed by the semantic strategy.

use async_trait::async_trait;

use crate::error::EmbeddingError;

/// External text-embedding provider.
///
/// Returns one vector per input text, in the same order. Implementations own
/// their transport and retry policy; the clustering engine never retries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmbeddingClient: Send + Sync {
    async fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;
}
