//! Shared HTTP client for the REST backends (OpenAI, Workers AI, Vectorize).

use core_config::upstream::UpstreamConfig;
use database::common::{RetryConfig, retry_with_backoff_if};
use reqwest::{Client, StatusCode, header};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::debug;

/// Error bodies are cut to this many bytes before they reach logs or clients
const MAX_ERROR_BODY: usize = 512;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("invalid response body: {0}")]
    Decode(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("request failed: {0}")]
    Request(String),
}

impl UpstreamError {
    /// Timeouts, connection failures, 429 and 5xx are worth another attempt
    pub fn is_transient(&self) -> bool {
        match self {
            UpstreamError::Timeout | UpstreamError::Connect(_) => true,
            UpstreamError::Status { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout
        } else if err.is_connect() {
            UpstreamError::Connect(err.to_string())
        } else if err.is_decode() {
            UpstreamError::Decode(err.to_string())
        } else {
            UpstreamError::Request(err.to_string())
        }
    }
}

/// Retry policy derived from the upstream settings
pub fn retry_config(config: &UpstreamConfig) -> RetryConfig {
    RetryConfig::new()
        .with_max_retries(config.max_retries)
        .with_initial_delay(config.retry_delay_ms)
}

/// `reqwest` client with a per-request timeout and bounded retries
#[derive(Clone)]
pub struct UpstreamClient {
    client: Client,
    retry: RetryConfig,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| UpstreamError::Request(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            retry: retry_config(config),
        })
    }

    /// POST a JSON body with bearer auth, decoding a JSON reply
    pub async fn post_json<B, R>(&self, url: &str, token: &str, body: &B) -> Result<R, UpstreamError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let payload = serde_json::to_vec(body).map_err(|e| UpstreamError::Request(e.to_string()))?;
        self.post_raw(url, token, "application/json", payload).await
    }

    /// POST a pre-encoded body, retrying transient failures
    pub async fn post_raw<R>(
        &self,
        url: &str,
        token: &str,
        content_type: &'static str,
        body: Vec<u8>,
    ) -> Result<R, UpstreamError>
    where
        R: DeserializeOwned,
    {
        retry_with_backoff_if(
            || self.send_once(url, token, content_type, body.clone()),
            self.retry.clone(),
            UpstreamError::is_transient,
        )
        .await
    }

    async fn send_once<R>(
        &self,
        url: &str,
        token: &str,
        content_type: &'static str,
        body: Vec<u8>,
    ) -> Result<R, UpstreamError>
    where
        R: DeserializeOwned,
    {
        debug!(url, bytes = body.len(), "Sending upstream request");

        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .header(header::CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            truncate_utf8(&mut body, MAX_ERROR_BODY);
            return Err(UpstreamError::Status { status, body });
        }

        response
            .json::<R>()
            .await
            .map_err(|e| UpstreamError::Decode(e.to_string()))
    }
}

fn truncate_utf8(s: &mut String, max: usize) {
    if s.len() > max {
        let mut end = max;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        s.truncate(end);
    }
}

/// Envelope wrapping every Cloudflare API v4 reply
#[derive(Debug, Deserialize)]
pub struct CloudflareResponse<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    pub result: Option<T>,
    #[serde(default)]
    pub errors: Vec<CloudflareMessage>,
}

#[derive(Debug, Deserialize)]
pub struct CloudflareMessage {
    #[serde(default)]
    pub code: i64,
    pub message: String,
}

fn default_success() -> bool {
    true
}

impl<T> CloudflareResponse<T> {
    pub fn into_result(self) -> Result<T, UpstreamError> {
        match self.result {
            Some(result) if self.success => Ok(result),
            _ if self.errors.is_empty() => Err(UpstreamError::Api("empty result".to_string())),
            _ => Err(UpstreamError::Api(
                self.errors
                    .iter()
                    .map(|e| format!("{} ({})", e.message, e.code))
                    .collect::<Vec<_>>()
                    .join("; "),
            )),
        }
    }
}
