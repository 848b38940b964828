use async_trait::async_trait;
use core_config::cloudflare::CloudflareConfig;
use core_config::upstream::UpstreamConfig;
use core_config::{ConfigError, FromEnv, env_or_default};
use domain_vector::http::{CloudflareResponse, UpstreamClient};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{ChatMessage, ChatModel};
use crate::error::{ConversationError, ConversationResult};

pub const DEFAULT_CLOUDFLARE_CHAT_MODEL: &str = "@cf/mistral/mistral-7b-instruct-v0.1";

#[derive(Debug, Clone)]
pub struct CloudflareChatConfig {
    pub account: CloudflareConfig,
    pub model: String,
}

impl CloudflareChatConfig {
    pub fn new(account: CloudflareConfig) -> Self {
        Self {
            account,
            model: DEFAULT_CLOUDFLARE_CHAT_MODEL.to_string(),
        }
    }
}

impl FromEnv for CloudflareChatConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            account: CloudflareConfig::from_env()?,
            model: env_or_default("CLOUDFLARE_CHAT_MODEL", DEFAULT_CLOUDFLARE_CHAT_MODEL),
        })
    }
}

/// Workers AI text-generation model (`/ai/run/{model}` with `messages`)
pub struct CloudflareChat {
    http: UpstreamClient,
    config: CloudflareChatConfig,
}

impl CloudflareChat {
    pub fn new(config: CloudflareChatConfig, upstream: &UpstreamConfig) -> ConversationResult<Self> {
        let http = UpstreamClient::new(upstream).map_err(ConversationError::chat)?;
        Ok(Self { http, config })
    }

    fn run_url(&self) -> String {
        format!("{}/ai/run/{}", self.config.account.account_url(), self.config.model)
    }
}

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct GenerationOutput {
    response: Option<String>,
}

#[async_trait]
impl ChatModel for CloudflareChat {
    #[instrument(skip(self, messages), fields(model = %self.config.model, messages = messages.len()))]
    async fn complete(&self, messages: Vec<ChatMessage>) -> ConversationResult<String> {
        let response: CloudflareResponse<GenerationOutput> = self
            .http
            .post_json(
                &self.run_url(),
                &self.config.account.api_token,
                &GenerationRequest {
                    messages: &messages,
                },
            )
            .await
            .map_err(ConversationError::chat)?;

        response
            .into_result()
            .map_err(ConversationError::chat)?
            .response
            .ok_or_else(|| ConversationError::Chat("No response returned".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    const RUN_PATH: &str = "/accounts/acc-1/ai/run/@cf/mistral/mistral-7b-instruct-v0.1";

    fn client(base_url: String, max_retries: u32) -> CloudflareChat {
        let account = CloudflareConfig::new("acc-1", "cf-token").with_base_url(base_url);
        let upstream = UpstreamConfig {
            timeout_secs: 5,
            max_retries,
            retry_delay_ms: 1,
        };
        CloudflareChat::new(CloudflareChatConfig::new(account), &upstream).unwrap()
    }

    #[tokio::test]
    async fn test_complete_reads_result_response() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", RUN_PATH)
            .match_header("authorization", "Bearer cf-token")
            .match_body(Matcher::Json(json!({
                "messages": [{"role": "user", "content": "Kasko nedir?"}]
            })))
            .with_status(200)
            .with_body(
                json!({"result": {"response": "Kasko bir araç sigortasıdır."}, "success": true})
                    .to_string(),
            )
            .create_async()
            .await;

        let answer = client(server.url(), 0)
            .complete(vec![ChatMessage::user("Kasko nedir?")])
            .await
            .unwrap();

        assert_eq!(answer, "Kasko bir araç sigortasıdır.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_server_error_is_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", RUN_PATH)
            .with_status(503)
            .with_body("overloaded")
            .expect(3)
            .create_async()
            .await;

        let err = client(server.url(), 2)
            .complete(vec![ChatMessage::user("hi")])
            .await
            .unwrap_err();

        assert!(matches!(err, ConversationError::Chat(_)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unsuccessful_envelope_is_chat_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", RUN_PATH)
            .with_status(200)
            .with_body(r#"{"result": null, "success": false, "errors": [{"code": 3036, "message": "account limit"}]}"#)
            .create_async()
            .await;

        let err = client(server.url(), 0)
            .complete(vec![ChatMessage::user("hi")])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("account limit"));
    }
}
