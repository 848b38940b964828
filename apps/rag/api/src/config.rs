use core_config::upstream::UpstreamConfig;
use core_config::{AppInfo, ConfigError, FromEnv, app_info, env_or_default, env_parse, server::ServerConfig};
use database::postgres::PostgresConfig;
use domain_conversations::{ChatProviderType, ErrorContract, RetrievalConfig};
use domain_vector::EmbeddingProviderType;
use std::str::FromStr;

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Backend holding the conversation vectors
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum VectorIndexKind {
    #[default]
    Qdrant,
    Vectorize,
}

impl FromStr for VectorIndexKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "qdrant" => Ok(VectorIndexKind::Qdrant),
            "vectorize" | "cloudflare" => Ok(VectorIndexKind::Vectorize),
            other => Err(format!("unknown vector index '{}'", other)),
        }
    }
}

/// Which implementation backs each collaborator
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Backends {
    pub embedding: EmbeddingProviderType,
    pub chat: ChatProviderType,
    pub index: VectorIndexKind,
}

impl FromEnv for Backends {
    /// - EMBEDDING_PROVIDER: `cloudflare` (default) or `openai`
    /// - CHAT_PROVIDER: `cloudflare` (default) or `openai`
    /// - VECTOR_INDEX: `qdrant` (default) or `vectorize`
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            embedding: env_parse("EMBEDDING_PROVIDER", "cloudflare")?,
            chat: env_parse("CHAT_PROVIDER", "cloudflare")?,
            index: env_parse("VECTOR_INDEX", "qdrant")?,
        })
    }
}

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub database: PostgresConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    pub upstream: UpstreamConfig,
    pub retrieval: RetrievalConfig,
    pub backends: Backends,
    pub error_contract: ErrorContract,
    /// Apply pending migrations before serving
    pub run_migrations: bool,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let database = PostgresConfig::from_env()?; // Required - will fail if not set
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=8080
        let run_migrations = env_or_default("RUN_MIGRATIONS", "true").eq_ignore_ascii_case("true");

        Ok(Self {
            app: app_info!(),
            database,
            server,
            environment,
            upstream: UpstreamConfig::from_env()?,
            retrieval: RetrievalConfig::from_env()?,
            backends: Backends::from_env()?,
            error_contract: ErrorContract::from_env()?,
            run_migrations,
        })
    }
}
