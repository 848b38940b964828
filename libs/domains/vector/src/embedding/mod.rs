mod cloudflare;
mod openai;
mod provider;

pub use cloudflare::{
    CloudflareEmbeddingConfig, CloudflareProvider, DEFAULT_CLOUDFLARE_EMBEDDING_MODEL,
};
pub use openai::{
    DEFAULT_OPENAI_BASE_URL, DEFAULT_OPENAI_EMBEDDING_MODEL, OpenAIConfig, OpenAIProvider,
};
pub use provider::EmbeddingProvider;

#[cfg(any(test, feature = "mocks"))]
pub use provider::MockEmbeddingProvider;
