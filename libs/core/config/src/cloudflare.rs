use crate::{env_or_default, env_required, ConfigError, FromEnv};

pub const DEFAULT_CLOUDFLARE_API_URL: &str = "https://api.cloudflare.com/client/v4";

/// Credentials for the Cloudflare REST API (Workers AI, Vectorize)
#[derive(Clone, Debug)]
pub struct CloudflareConfig {
    pub account_id: String,
    pub api_token: String,
    pub base_url: String,
}

impl CloudflareConfig {
    pub fn new(account_id: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            api_token: api_token.into(),
            base_url: DEFAULT_CLOUDFLARE_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// `{base}/accounts/{account_id}`, the prefix of every account-scoped endpoint
    pub fn account_url(&self) -> String {
        format!(
            "{}/accounts/{}",
            self.base_url.trim_end_matches('/'),
            self.account_id
        )
    }
}

impl FromEnv for CloudflareConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            account_id: env_required("CLOUDFLARE_ACCOUNT_ID")?,
            api_token: env_required("CLOUDFLARE_API_TOKEN")?,
            base_url: env_or_default("CLOUDFLARE_API_URL", DEFAULT_CLOUDFLARE_API_URL),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_url_trims_trailing_slash() {
        let config = CloudflareConfig::new("abc123", "token").with_base_url("http://localhost:1234/");
        assert_eq!(config.account_url(), "http://localhost:1234/accounts/abc123");
    }

    #[test]
    fn test_cloudflare_config_requires_token() {
        temp_env::with_vars(
            [
                ("CLOUDFLARE_ACCOUNT_ID", Some("abc123")),
                ("CLOUDFLARE_API_TOKEN", None),
            ],
            || {
                let err = CloudflareConfig::from_env().unwrap_err();
                assert!(err.to_string().contains("CLOUDFLARE_API_TOKEN"));
            },
        );
    }
}
