use thiserror::Error;

use crate::http::UpstreamError;

#[derive(Debug, Error)]
pub enum VectorError {
    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Vector index error: {0}")]
    Index(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type VectorResult<T> = Result<T, VectorError>;

impl VectorError {
    pub(crate) fn embedding(err: UpstreamError) -> Self {
        VectorError::Embedding(err.to_string())
    }

    pub(crate) fn index(err: UpstreamError) -> Self {
        VectorError::Index(err.to_string())
    }
}

impl From<qdrant_client::QdrantError> for VectorError {
    fn from(err: qdrant_client::QdrantError) -> Self {
        VectorError::Index(format!("Qdrant: {}", err))
    }
}

impl From<core_config::ConfigError> for VectorError {
    fn from(err: core_config::ConfigError) -> Self {
        VectorError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for VectorError {
    fn from(err: serde_json::Error) -> Self {
        VectorError::Internal(format!("JSON error: {}", err))
    }
}
