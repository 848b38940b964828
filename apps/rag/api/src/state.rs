//! Application state and collaborator wiring.
//!
//! Every backend is chosen once at startup from [`Backends`] and handed to
//! the service as a trait object.

use core_config::FromEnv;
use core_config::upstream::UpstreamConfig;
use domain_conversations::{
    ChatModel, ChatProviderType, CloudflareChat, CloudflareChatConfig, OpenAIChat,
    OpenAIChatConfig, PgConversationRepository, RagService,
};
use domain_vector::{
    CloudflareEmbeddingConfig, CloudflareProvider, EmbeddingProvider, EmbeddingProviderType,
    OpenAIConfig, OpenAIProvider, QdrantConfig, QdrantIndex, VectorIndex, VectorizeConfig,
    VectorizeIndex,
};
use std::sync::Arc;
use tracing::info;

use crate::config::{Backends, Config, VectorIndexKind};

/// Shared application state.
///
/// Cloned into the readiness handler; the conversation routes carry their
/// own state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: Config,
    /// PostgreSQL database connection pool
    pub db: database::postgres::DatabaseConnection,
}

fn embedder(
    kind: EmbeddingProviderType,
    upstream: &UpstreamConfig,
) -> eyre::Result<Arc<dyn EmbeddingProvider>> {
    info!(provider = %kind, "Using embedding provider");
    let provider: Arc<dyn EmbeddingProvider> = match kind {
        EmbeddingProviderType::Cloudflare => Arc::new(CloudflareProvider::new(
            CloudflareEmbeddingConfig::from_env()?,
            upstream,
        )?),
        EmbeddingProviderType::OpenAI => {
            Arc::new(OpenAIProvider::new(OpenAIConfig::from_env()?, upstream)?)
        }
    };
    Ok(provider)
}

fn chat_model(kind: ChatProviderType, upstream: &UpstreamConfig) -> eyre::Result<Arc<dyn ChatModel>> {
    info!(provider = %kind, "Using chat provider");
    let model: Arc<dyn ChatModel> = match kind {
        ChatProviderType::Cloudflare => {
            Arc::new(CloudflareChat::new(CloudflareChatConfig::from_env()?, upstream)?)
        }
        ChatProviderType::OpenAI => {
            Arc::new(OpenAIChat::new(OpenAIChatConfig::from_env()?, upstream)?)
        }
    };
    Ok(model)
}

async fn vector_index(
    kind: VectorIndexKind,
    upstream: &UpstreamConfig,
) -> eyre::Result<Arc<dyn VectorIndex>> {
    let index: Arc<dyn VectorIndex> = match kind {
        VectorIndexKind::Qdrant => {
            let config = QdrantConfig::from_env()?;
            info!(url = %config.url, collection = %config.collection, "Using Qdrant index");
            let index = QdrantIndex::new(config, upstream)?;
            index.ensure_collection().await?;
            Arc::new(index)
        }
        VectorIndexKind::Vectorize => {
            let config = VectorizeConfig::from_env()?;
            info!(index = %config.index_name, "Using Vectorize index");
            Arc::new(VectorizeIndex::new(config, upstream)?)
        }
    };
    Ok(index)
}

/// Build the RAG service over the configured backends
pub async fn build_service(config: &Config, db: sea_orm::DatabaseConnection) -> eyre::Result<RagService> {
    let Backends {
        embedding,
        chat,
        index,
    } = config.backends.clone();

    Ok(RagService::new(
        Arc::new(PgConversationRepository::new(db)),
        embedder(embedding, &config.upstream)?,
        vector_index(index, &config.upstream).await?,
        chat_model(chat, &config.upstream)?,
        config.retrieval.clone(),
    ))
}
