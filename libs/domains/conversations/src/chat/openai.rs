use async_trait::async_trait;
use core_config::upstream::UpstreamConfig;
use core_config::{ConfigError, FromEnv, env_or_default, env_required};
use domain_vector::http::UpstreamClient;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{ChatMessage, ChatModel};
use crate::error::{ConversationError, ConversationResult};

pub const DEFAULT_OPENAI_CHAT_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Clone)]
pub struct OpenAIChatConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl OpenAIChatConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: domain_vector::embedding::DEFAULT_OPENAI_BASE_URL.to_string(),
            model: DEFAULT_OPENAI_CHAT_MODEL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl FromEnv for OpenAIChatConfig {
    /// - OPENAI_API_KEY: required
    /// - OPENAI_BASE_URL: defaults to https://api.openai.com/v1
    /// - OPENAI_CHAT_MODEL: defaults to gpt-4o-mini
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: env_required("OPENAI_API_KEY")?,
            base_url: env_or_default(
                "OPENAI_BASE_URL",
                domain_vector::embedding::DEFAULT_OPENAI_BASE_URL,
            ),
            model: env_or_default("OPENAI_CHAT_MODEL", DEFAULT_OPENAI_CHAT_MODEL),
        })
    }
}

/// OpenAI `/chat/completions` client
pub struct OpenAIChat {
    http: UpstreamClient,
    config: OpenAIChatConfig,
}

impl OpenAIChat {
    pub fn new(config: OpenAIChatConfig, upstream: &UpstreamConfig) -> ConversationResult<Self> {
        let http = UpstreamClient::new(upstream).map_err(ConversationError::chat)?;
        Ok(Self { http, config })
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl ChatModel for OpenAIChat {
    #[instrument(skip(self, messages), fields(model = %self.config.model, messages = messages.len()))]
    async fn complete(&self, messages: Vec<ChatMessage>) -> ConversationResult<String> {
        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let request = CompletionRequest {
            model: &self.config.model,
            messages: &messages,
        };

        let response: CompletionResponse = self
            .http
            .post_json(&url, &self.config.api_key, &request)
            .await
            .map_err(ConversationError::chat)?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ConversationError::Chat("No completion returned".to_string()))
    }
}
