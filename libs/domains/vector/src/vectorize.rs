//! Cloudflare Vectorize (v2 REST API) index.

use async_trait::async_trait;
use core_config::cloudflare::CloudflareConfig;
use core_config::upstream::UpstreamConfig;
use core_config::{ConfigError, FromEnv, env_or_default};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{VectorError, VectorResult};
use crate::http::{CloudflareResponse, UpstreamClient};
use crate::index::VectorIndex;
use crate::models::{UpsertResult, VectorMatch, VectorRecord};

pub const DEFAULT_VECTORIZE_INDEX: &str = "vector-index";

#[derive(Debug, Clone)]
pub struct VectorizeConfig {
    pub account: CloudflareConfig,
    pub index_name: String,
}

impl VectorizeConfig {
    pub fn new(account: CloudflareConfig, index_name: impl Into<String>) -> Self {
        Self {
            account,
            index_name: index_name.into(),
        }
    }
}

impl FromEnv for VectorizeConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            account: CloudflareConfig::from_env()?,
            index_name: env_or_default("VECTORIZE_INDEX_NAME", DEFAULT_VECTORIZE_INDEX),
        })
    }
}

pub struct VectorizeIndex {
    http: UpstreamClient,
    config: VectorizeConfig,
}

impl VectorizeIndex {
    pub fn new(config: VectorizeConfig, upstream: &UpstreamConfig) -> VectorResult<Self> {
        let http = UpstreamClient::new(upstream).map_err(VectorError::index)?;
        Ok(Self { http, config })
    }

    fn index_url(&self, action: &str) -> String {
        format!(
            "{}/vectorize/v2/indexes/{}/{}",
            self.config.account.account_url(),
            self.config.index_name,
            action
        )
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: u32,
    return_values: bool,
    return_metadata: &'static str,
}

#[derive(Debug, Deserialize)]
struct QueryResult {
    #[serde(default)]
    matches: Vec<VectorMatch>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MutationResult {
    mutation_id: Option<String>,
}

/// One JSON object per line, as the upsert endpoint expects
fn to_ndjson(records: &[VectorRecord]) -> VectorResult<Vec<u8>> {
    let mut body = Vec::new();
    for record in records {
        serde_json::to_writer(&mut body, record)?;
        body.push(b'\n');
    }
    Ok(body)
}

#[async_trait]
impl VectorIndex for VectorizeIndex {
    #[instrument(skip(self, vector), fields(index = %self.config.index_name, dimension = vector.len()))]
    async fn query(&self, vector: Vec<f32>, top_k: u32) -> VectorResult<Vec<VectorMatch>> {
        let request = QueryRequest {
            vector: &vector,
            top_k,
            return_values: false,
            return_metadata: "none",
        };

        let response: CloudflareResponse<QueryResult> = self
            .http
            .post_json(&self.index_url("query"), &self.config.account.api_token, &request)
            .await
            .map_err(VectorError::index)?;

        Ok(response.into_result().map_err(VectorError::index)?.matches)
    }

    #[instrument(skip(self, records), fields(index = %self.config.index_name, count = records.len()))]
    async fn upsert(&self, records: Vec<VectorRecord>) -> VectorResult<UpsertResult> {
        let body = to_ndjson(&records)?;

        let response: CloudflareResponse<MutationResult> = self
            .http
            .post_raw(
                &self.index_url("upsert"),
                &self.config.account.api_token,
                "application/x-ndjson",
                body,
            )
            .await
            .map_err(VectorError::index)?;

        let result = response.into_result().map_err(VectorError::index)?;

        Ok(UpsertResult {
            count: records.len(),
            ids: records.into_iter().map(|r| r.id).collect(),
            mutation_id: result.mutation_id,
        })
    }
}
