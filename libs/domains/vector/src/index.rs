use async_trait::async_trait;

use crate::error::VectorResult;
use crate::models::{UpsertResult, VectorMatch, VectorRecord};

/// Nearest-neighbour store keyed by string ids
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Up to `top_k` matches for `vector`, highest score first
    async fn query(&self, vector: Vec<f32>, top_k: u32) -> VectorResult<Vec<VectorMatch>>;

    /// Insert or replace records by id
    async fn upsert(&self, records: Vec<VectorRecord>) -> VectorResult<UpsertResult>;
}
