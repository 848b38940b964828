use async_trait::async_trait;

use crate::error::VectorResult;
use crate::models::{EmbeddingProviderType, EmbeddingResult};

/// Turns text into vectors. The model is fixed by the provider's configuration.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    fn provider_type(&self) -> EmbeddingProviderType;

    /// Generate embedding for a single text
    async fn embed(&self, text: &str) -> VectorResult<EmbeddingResult>;

    /// Generate embeddings for multiple texts, in input order.
    /// May return fewer results than inputs if the backend drops some.
    async fn embed_batch(&self, texts: &[String]) -> VectorResult<Vec<EmbeddingResult>>;
}
