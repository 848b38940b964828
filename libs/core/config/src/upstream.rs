//! Settings shared by every outbound call to a managed service
//! (embedding, language model, vector index).

use crate::{env_parse, ConfigError, FromEnv};
use std::time::Duration;

#[derive(Clone, Debug, PartialEq)]
pub struct UpstreamConfig {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Retries after the first attempt for transient failures
    pub max_retries: u32,
    /// Initial backoff delay in milliseconds
    pub retry_delay_ms: u64,
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Configuration with retries turned off, used by tests
    pub fn without_retries(mut self) -> Self {
        self.max_retries = 0;
        self
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_retries: 2,
            retry_delay_ms: 200,
        }
    }
}

impl FromEnv for UpstreamConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            timeout_secs: env_parse("UPSTREAM_TIMEOUT_SECS", "30")?,
            max_retries: env_parse("UPSTREAM_MAX_RETRIES", "2")?,
            retry_delay_ms: env_parse("UPSTREAM_RETRY_DELAY_MS", "200")?,
        })
    }
}
