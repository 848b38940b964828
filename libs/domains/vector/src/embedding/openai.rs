use async_trait::async_trait;
use core_config::upstream::UpstreamConfig;
use core_config::{ConfigError, FromEnv, env_or_default, env_required};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::EmbeddingProvider;
use crate::error::{VectorError, VectorResult};
use crate::http::UpstreamClient;
use crate::models::{EmbeddingProviderType, EmbeddingResult};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_EMBEDDING_MODEL: &str = "text-embedding-3-small";

#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    /// Requested output size; `None` keeps the model's native dimension
    pub dimensions: Option<u32>,
}

impl OpenAIConfig {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            model: DEFAULT_OPENAI_EMBEDDING_MODEL.to_string(),
            dimensions: None,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    pub fn with_dimensions(mut self, dimensions: u32) -> Self {
        self.dimensions = Some(dimensions);
        self
    }
}

impl FromEnv for OpenAIConfig {
    /// - OPENAI_API_KEY: required
    /// - OPENAI_BASE_URL: defaults to https://api.openai.com/v1
    /// - OPENAI_EMBEDDING_MODEL: defaults to text-embedding-3-small
    /// - OPENAI_EMBEDDING_DIMENSIONS: optional
    fn from_env() -> Result<Self, ConfigError> {
        let dimensions = match std::env::var("OPENAI_EMBEDDING_DIMENSIONS") {
            Ok(raw) => Some(raw.parse().map_err(|e| ConfigError::ParseError {
                key: "OPENAI_EMBEDDING_DIMENSIONS".to_string(),
                details: format!("{}", e),
            })?),
            Err(_) => None,
        };

        Ok(Self {
            api_key: env_required("OPENAI_API_KEY")?,
            base_url: env_or_default("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
            model: env_or_default("OPENAI_EMBEDDING_MODEL", DEFAULT_OPENAI_EMBEDDING_MODEL),
            dimensions,
        })
    }
}

/// OpenAI `/embeddings` provider
pub struct OpenAIProvider {
    http: UpstreamClient,
    config: OpenAIConfig,
}

impl OpenAIProvider {
    pub fn new(config: OpenAIConfig, upstream: &UpstreamConfig) -> VectorResult<Self> {
        let http = UpstreamClient::new(upstream).map_err(VectorError::embedding)?;
        Ok(Self { http, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
    #[serde(default)]
    usage: Option<EmbeddingUsage>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

#[derive(Debug, Deserialize)]
struct EmbeddingUsage {
    total_tokens: u32,
}

#[async_trait]
impl EmbeddingProvider for OpenAIProvider {
    fn provider_type(&self) -> EmbeddingProviderType {
        EmbeddingProviderType::OpenAI
    }

    async fn embed(&self, text: &str) -> VectorResult<EmbeddingResult> {
        let results = self.embed_batch(&[text.to_string()]).await?;
        results
            .into_iter()
            .next()
            .ok_or_else(|| VectorError::Embedding("No embedding returned".to_string()))
    }

    #[instrument(skip(self, texts), fields(model = %self.config.model, count = texts.len()))]
    async fn embed_batch(&self, texts: &[String]) -> VectorResult<Vec<EmbeddingResult>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let request = EmbeddingRequest {
            model: &self.config.model,
            input: texts,
            dimensions: self.config.dimensions,
        };

        let url = format!("{}/embeddings", self.config.base_url.trim_end_matches('/'));
        let response: EmbeddingResponse = self
            .http
            .post_json(&url, &self.config.api_key, &request)
            .await
            .map_err(VectorError::embedding)?;

        // Sort by index to maintain order
        let mut data = response.data;
        data.sort_by_key(|d| d.index);

        let tokens_per_embedding = response
            .usage
            .map(|u| u.total_tokens / texts.len() as u32)
            .unwrap_or_default();

        Ok(data
            .into_iter()
            .map(|d| EmbeddingResult {
                tokens_used: tokens_per_embedding,
                ..EmbeddingResult::new(d.embedding)
            })
            .collect())
    }
}
