//! Vector Domain Library
//!
//! Embedding generation and nearest-neighbour lookup behind two traits, so the
//! conversation service never sees a concrete backend.
//!
//! ```text
//! ┌───────────────────┐     ┌─────────────────┐
//! │ EmbeddingProvider │     │   VectorIndex   │
//! │     (trait)       │     │    (trait)      │
//! └─────────┬─────────┘     └────────┬────────┘
//!           │                        │
//! ┌─────────▼─────────┐     ┌────────▼────────┐
//! │ OpenAIProvider    │     │ QdrantIndex     │
//! │ CloudflareProvider│     │ VectorizeIndex  │
//! └───────────────────┘     └─────────────────┘
//! ```
//!
//! HTTP backends share [`http::UpstreamClient`], which applies the configured
//! timeout and retries transient failures with exponential backoff.
//!
//! ```rust,no_run
//! use domain_vector::{QdrantConfig, QdrantIndex, VectorIndex};
//! use core_config::{FromEnv, upstream::UpstreamConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let index = QdrantIndex::new(QdrantConfig::from_env()?, &UpstreamConfig::default())?;
//! index.ensure_collection().await?;
//!
//! let matches = index.query(vec![0.1; 768], 1).await?;
//! # Ok(())
//! # }
//! ```

pub mod embedding;
pub mod error;
pub mod http;
pub mod index;
pub mod models;
pub mod qdrant;
pub mod vectorize;

pub use embedding::{
    CloudflareEmbeddingConfig, CloudflareProvider, EmbeddingProvider, OpenAIConfig,
    OpenAIProvider,
};
pub use error::{VectorError, VectorResult};
pub use index::VectorIndex;
pub use models::{
    DistanceMetric, EmbeddingProviderType, EmbeddingResult, UpsertResult, VectorMatch,
    VectorRecord,
};
pub use qdrant::{QdrantConfig, QdrantIndex};
pub use vectorize::{VectorizeConfig, VectorizeIndex};

#[cfg(any(test, feature = "mocks"))]
pub use embedding::MockEmbeddingProvider;
#[cfg(any(test, feature = "mocks"))]
pub use index::MockVectorIndex;
