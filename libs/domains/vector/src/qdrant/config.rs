use core_config::{ConfigError, FromEnv, env_or_default, env_parse};

use crate::models::DistanceMetric;

/// Qdrant connection and collection settings
#[derive(Debug, Clone)]
pub struct QdrantConfig {
    pub url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub collection: String,
    /// Vector size used when the collection has to be created
    pub dimension: u64,
    pub distance: DistanceMetric,
}

impl QdrantConfig {
    pub fn new(url: String) -> Self {
        Self {
            url,
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, api_key: String) -> Self {
        self.api_key = Some(api_key);
        self
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn with_dimension(mut self, dimension: u64) -> Self {
        self.dimension = dimension;
        self
    }
}

impl FromEnv for QdrantConfig {
    /// - QDRANT_URL: defaults to http://localhost:6334
    /// - QDRANT_API_KEY: optional
    /// - QDRANT_TIMEOUT_SECS: defaults to 30
    /// - QDRANT_COLLECTION: defaults to conversations
    /// - EMBEDDING_DIMENSION: defaults to 768
    /// - QDRANT_DISTANCE: cosine, euclidean or dot; defaults to cosine
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let distance = env_or_default("QDRANT_DISTANCE", "cosine")
            .parse()
            .map_err(|details| ConfigError::ParseError {
                key: "QDRANT_DISTANCE".to_string(),
                details,
            })?;

        Ok(Self {
            url: env_or_default("QDRANT_URL", &defaults.url),
            api_key: std::env::var("QDRANT_API_KEY").ok().filter(|k| !k.is_empty()),
            timeout_secs: env_parse("QDRANT_TIMEOUT_SECS", "30")?,
            collection: env_or_default("QDRANT_COLLECTION", &defaults.collection),
            dimension: env_parse("EMBEDDING_DIMENSION", "768")?,
            distance,
        })
    }
}

impl Default for QdrantConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:6334".to_string(),
            api_key: None,
            timeout_secs: 30,
            collection: "conversations".to_string(),
            dimension: 768,
            distance: DistanceMetric::Cosine,
        }
    }
}
