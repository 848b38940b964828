//! Retrieval settings and prompt assembly for the query path.

use core_config::{ConfigError, FromEnv, env_or_default, env_parse};

use crate::chat::ChatMessage;
use crate::models::Conversation;

/// Insurance-agent persona sent with every question
pub const DEFAULT_SYSTEM_PROMPT: &str = "Sen bir sigorta çalışansın. Soruyu cevaplarken veya yanıt verirken, sağlanan bağlamı, sağlanırsa ve ilgiliyse kullanın.";

pub const DEFAULT_TOP_K: u32 = 1;
pub const DEFAULT_SIMILARITY_CUTOFF: f32 = 0.75;

#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalConfig {
    /// Neighbours requested from the index
    pub top_k: u32,
    /// Matches must score strictly above this
    pub similarity_cutoff: f32,
    pub system_prompt: String,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            similarity_cutoff: DEFAULT_SIMILARITY_CUTOFF,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

impl FromEnv for RetrievalConfig {
    /// - RAG_TOP_K: defaults to 1
    /// - RAG_SIMILARITY_CUTOFF: defaults to 0.75
    /// - RAG_SYSTEM_PROMPT: defaults to the insurance-agent persona
    fn from_env() -> Result<Self, ConfigError> {
        let top_k: u32 = env_parse("RAG_TOP_K", "1")?;
        if top_k == 0 {
            return Err(ConfigError::ParseError {
                key: "RAG_TOP_K".to_string(),
                details: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            top_k,
            similarity_cutoff: env_parse("RAG_SIMILARITY_CUTOFF", "0.75")?,
            system_prompt: env_or_default("RAG_SYSTEM_PROMPT", DEFAULT_SYSTEM_PROMPT),
        })
    }
}

/// `"Context:\n> q1\n> a1\n> q2\n> a2"`, or empty when nothing was retrieved
pub fn build_context(rows: &[Conversation]) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let lines = rows
        .iter()
        .map(|row| format!("> {}\n> {}", row.request, row.response))
        .collect::<Vec<_>>()
        .join("\n");

    format!("Context:\n{}", lines)
}

/// Context message (only when non-empty), then the persona, then the question
pub fn build_messages(context: &str, system_prompt: &str, question: &str) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(3);
    if !context.is_empty() {
        messages.push(ChatMessage::system(context));
    }
    messages.push(ChatMessage::system(system_prompt));
    messages.push(ChatMessage::user(question));
    messages
}
