//! Exponential backoff for connection attempts and outbound service calls.

use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Backoff policy: `initial_delay_ms * backoff_multiplier^n`, capped at `max_delay_ms`
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Attempts after the first call; zero disables retries
    pub max_retries: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub backoff_multiplier: f64,
    /// Sleep a random 50-100% of each delay
    pub use_jitter: bool,
}

impl RetryConfig {
    /// Defaults: 3 retries, 100ms initial delay, 5s cap, x2 backoff, jitter on
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_initial_delay(mut self, delay_ms: u64) -> Self {
        self.initial_delay_ms = delay_ms;
        self
    }

    pub fn with_max_delay(mut self, delay_ms: u64) -> Self {
        self.max_delay_ms = delay_ms;
        self
    }

    pub fn without_jitter(mut self) -> Self {
        self.use_jitter = false;
        self
    }

    /// Un-jittered delay before retry number `retry` (1-based)
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = self.backoff_multiplier.powi(retry.saturating_sub(1) as i32);
        let millis = (self.initial_delay_ms as f64 * factor).min(self.max_delay_ms as f64);
        Duration::from_millis(millis as u64)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 100,
            max_delay_ms: 5000,
            backoff_multiplier: 2.0,
            use_jitter: true,
        }
    }
}

/// Retry `operation` on every error
///
/// ```ignore
/// use database::common::{retry_with_backoff, RetryConfig};
///
/// let db = retry_with_backoff(|| database::postgres::connect(&url), RetryConfig::new()).await?;
/// ```
pub async fn retry_with_backoff<F, Fut, T, E>(operation: F, config: RetryConfig) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    retry_with_backoff_if(operation, config, |_| true).await
}

/// Retry `operation` while `should_retry` accepts the error.
/// A rejected error is returned at once.
///
/// ```ignore
/// let reply = retry_with_backoff_if(
///     || client.send_once(url, body.clone()),
///     RetryConfig::new().with_max_retries(2),
///     UpstreamError::is_transient,
/// )
/// .await?;
/// ```
pub async fn retry_with_backoff_if<F, Fut, T, E, P>(
    mut operation: F,
    config: RetryConfig,
    should_retry: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    P: Fn(&E) -> bool,
{
    let mut retries = 0;

    loop {
        let error = match operation().await {
            Ok(value) => {
                if retries > 0 {
                    debug!(retries, "Operation succeeded after retrying");
                }
                return Ok(value);
            }
            Err(e) => e,
        };

        if !should_retry(&error) {
            return Err(error);
        }
        if retries >= config.max_retries {
            if config.max_retries > 0 {
                warn!(attempts = retries + 1, error = %error, "Giving up");
            }
            return Err(error);
        }

        retries += 1;
        let mut delay = config.backoff(retries);
        if config.use_jitter {
            delay = apply_jitter(delay);
        }

        debug!(
            retry = retries,
            max_retries = config.max_retries,
            delay_ms = delay.as_millis() as u64,
            error = %error,
            "Operation failed, retrying"
        );
        tokio::time::sleep(delay).await;
    }
}

/// Scale a delay by a pseudo-random factor in [0.5, 1.0)
fn apply_jitter(delay: Duration) -> Duration {
    use std::collections::hash_map::RandomState;
    use std::hash::BuildHasher;

    let sample = RandomState::new().hash_one(std::time::SystemTime::now()) % 50;
    delay.mul_f64(0.5 + sample as f64 / 100.0)
}
