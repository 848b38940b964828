use async_trait::async_trait;
use core_config::cloudflare::CloudflareConfig;
use core_config::upstream::UpstreamConfig;
use core_config::{ConfigError, FromEnv, env_or_default};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::EmbeddingProvider;
use crate::error::{VectorError, VectorResult};
use crate::http::{CloudflareResponse, UpstreamClient};
use crate::models::{EmbeddingProviderType, EmbeddingResult};

/// Workers AI 768-dimension English embedding model
pub const DEFAULT_CLOUDFLARE_EMBEDDING_MODEL: &str = "@cf/baai/bge-base-en-v1.5";

#[derive(Debug, Clone)]
pub struct CloudflareEmbeddingConfig {
    pub account: CloudflareConfig,
    pub model: String,
}

impl CloudflareEmbeddingConfig {
    pub fn new(account: CloudflareConfig) -> Self {
        Self {
            account,
            model: DEFAULT_CLOUDFLARE_EMBEDDING_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

impl FromEnv for CloudflareEmbeddingConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            account: CloudflareConfig::from_env()?,
            model: env_or_default(
                "CLOUDFLARE_EMBEDDING_MODEL",
                DEFAULT_CLOUDFLARE_EMBEDDING_MODEL,
            ),
        })
    }
}

/// Workers AI text-embedding provider (`/ai/run/{model}`)
pub struct CloudflareProvider {
    http: UpstreamClient,
    config: CloudflareEmbeddingConfig,
}

impl CloudflareProvider {
    pub fn new(config: CloudflareEmbeddingConfig, upstream: &UpstreamConfig) -> VectorResult<Self> {
        let http = UpstreamClient::new(upstream).map_err(VectorError::embedding)?;
        Ok(Self { http, config })
    }

    fn run_url(&self) -> String {
        format!("{}/ai/run/{}", self.config.account.account_url(), self.config.model)
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    text: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingOutput {
    #[serde(default)]
    data: Vec<Vec<f32>>,
}

#[async_trait]
impl EmbeddingProvider for CloudflareProvider {
    fn provider_type(&self) -> EmbeddingProviderType {
        EmbeddingProviderType::Cloudflare
    }

    async fn embed(&self, text: &str) -> VectorResult<EmbeddingResult> {
        self.embed_batch(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| VectorError::Embedding("No embedding returned".to_string()))
    }

    #[instrument(skip(self, texts), fields(model = %self.config.model, count = texts.len()))]
    async fn embed_batch(&self, texts: &[String]) -> VectorResult<Vec<EmbeddingResult>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let response: CloudflareResponse<EmbeddingOutput> = self
            .http
            .post_json(
                &self.run_url(),
                &self.config.account.api_token,
                &EmbeddingRequest { text: texts },
            )
            .await
            .map_err(VectorError::embedding)?;

        let output = response.into_result().map_err(VectorError::embedding)?;

        Ok(output.data.into_iter().map(EmbeddingResult::new).collect())
    }
}
