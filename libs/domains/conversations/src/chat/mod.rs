mod cloudflare;
mod openai;

pub use cloudflare::{CloudflareChat, CloudflareChatConfig, DEFAULT_CLOUDFLARE_CHAT_MODEL};
pub use openai::{DEFAULT_OPENAI_CHAT_MODEL, OpenAIChat, OpenAIChatConfig};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConversationResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
}

/// One role-tagged entry of a chat prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// Hosted language model answering a message list
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// The assistant's reply to `messages`
    async fn complete(&self, messages: Vec<ChatMessage>) -> ConversationResult<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChatProviderType {
    #[default]
    Cloudflare,
    OpenAI,
}

impl fmt::Display for ChatProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatProviderType::Cloudflare => write!(f, "cloudflare"),
            ChatProviderType::OpenAI => write!(f, "openai"),
        }
    }
}

impl FromStr for ChatProviderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cloudflare" | "workers-ai" => Ok(ChatProviderType::Cloudflare),
            "openai" => Ok(ChatProviderType::OpenAI),
            other => Err(format!("unknown chat provider '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_serializes_lowercase_role() {
        let json = serde_json::to_value(ChatMessage::system("ctx")).unwrap();
        assert_eq!(json, serde_json::json!({"role": "system", "content": "ctx"}));
    }

    #[test]
    fn test_provider_type_parse() {
        assert_eq!("OpenAI".parse::<ChatProviderType>().unwrap(), ChatProviderType::OpenAI);
        assert_eq!(ChatProviderType::default().to_string(), "cloudflare");
        assert!("gemini".parse::<ChatProviderType>().is_err());
    }
}
