//! Conversations Domain
//!
//! Stores question/answer pairs and answers new questions with the most
//! similar stored exchanges as model context.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │   Handlers   │  ← GET / (query), POST /insert
//! └──────┬───────┘
//!        │
//! ┌──────▼───────┐
//! │  RagService  │  ← orchestration, similarity cutoff, prompt assembly
//! └──┬───┬───┬───┘
//!    │   │   │
//!    │   │   └── ChatModel (OpenAI, Workers AI)
//!    │   └────── EmbeddingProvider + VectorIndex (domain_vector)
//!    └────────── ConversationRepository (Postgres)
//! ```
//!
//! Writes go to Postgres first and the vector index second. They are not
//! transactional: a failure between the two leaves a row without a vector,
//! which is logged with its id and never compensated.
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_conversations::{
//!     CloudflareChat, CloudflareChatConfig, ErrorContract, PgConversationRepository,
//!     RagService, RetrievalConfig, router,
//! };
//! use domain_vector::{CloudflareEmbeddingConfig, CloudflareProvider, QdrantConfig, QdrantIndex};
//! use core_config::{FromEnv, upstream::UpstreamConfig};
//! use sea_orm::Database;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let upstream = UpstreamConfig::default();
//! let db = Database::connect("postgres://...").await?;
//!
//! let service = RagService::new(
//!     Arc::new(PgConversationRepository::new(db)),
//!     Arc::new(CloudflareProvider::new(CloudflareEmbeddingConfig::from_env()?, &upstream)?),
//!     Arc::new(QdrantIndex::new(QdrantConfig::from_env()?, &upstream)?),
//!     Arc::new(CloudflareChat::new(CloudflareChatConfig::from_env()?, &upstream)?),
//!     RetrievalConfig::default(),
//! );
//!
//! let app: axum::Router = router(service, ErrorContract::Legacy);
//! # Ok(())
//! # }
//! ```

pub mod chat;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod prompt;
pub mod repository;
pub mod service;

pub use chat::{
    ChatMessage, ChatModel, ChatProviderType, ChatRole, CloudflareChat, CloudflareChatConfig,
    OpenAIChat, OpenAIChatConfig,
};
pub use error::{ConversationError, ConversationResult};
pub use handlers::{ConversationState, ConversationsApiDoc, ErrorContract, HandlerError, router};
pub use models::{Conversation, InsertRequest, InsertResponse, NewConversation};
pub use postgres::PgConversationRepository;
pub use prompt::{DEFAULT_SYSTEM_PROMPT, RetrievalConfig, build_context, build_messages};
pub use repository::ConversationRepository;
pub use service::RagService;
