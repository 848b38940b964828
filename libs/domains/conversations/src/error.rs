use axum_helpers::AppError;
use domain_vector::VectorError;
use domain_vector::http::UpstreamError;
use thiserror::Error;

pub const MISSING_FIELDS_MESSAGE: &str = "Missing request/response";
pub const HISTORY_NOT_CREATED_MESSAGE: &str = "Failed to create chat history";
pub const EMBEDDING_MISSING_MESSAGE: &str = "Failed to generate vector embedding";

#[derive(Debug, Error)]
pub enum ConversationError {
    #[error("{}", MISSING_FIELDS_MESSAGE)]
    MissingFields,

    #[error("{}", HISTORY_NOT_CREATED_MESSAGE)]
    HistoryNotCreated,

    /// The row exists but has no vector
    #[error("{} for conversation {id}", EMBEDDING_MISSING_MESSAGE)]
    EmbeddingMissing { id: i64 },

    #[error("Embedding service error: {0}")]
    Embedding(String),

    #[error("Vector index error: {0}")]
    VectorIndex(String),

    #[error("Chat completion failed: {0}")]
    Chat(String),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ConversationResult<T> = Result<T, ConversationError>;

impl ConversationError {
    /// Failures of the embedding, index or model services
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            ConversationError::Embedding(_)
                | ConversationError::VectorIndex(_)
                | ConversationError::Chat(_)
        )
    }

    /// Fixed text body for the insert-path failures that keep their own status
    pub fn insert_failure_message(&self) -> Option<&'static str> {
        match self {
            ConversationError::MissingFields => Some(MISSING_FIELDS_MESSAGE),
            ConversationError::HistoryNotCreated => Some(HISTORY_NOT_CREATED_MESSAGE),
            ConversationError::EmbeddingMissing { .. } => Some(EMBEDDING_MISSING_MESSAGE),
            _ => None,
        }
    }
}

/// Convert ConversationError to AppError for the structured JSON contract
impl From<ConversationError> for AppError {
    fn from(err: ConversationError) -> Self {
        match err {
            ConversationError::MissingFields => AppError::Validation(err.to_string()),
            ConversationError::InvalidBody(msg) => AppError::BadRequest(msg),
            ConversationError::Embedding(_)
            | ConversationError::VectorIndex(_)
            | ConversationError::Chat(_) => AppError::BadGateway(err.to_string()),
            ConversationError::Database(db) => AppError::Database(db),
            ConversationError::HistoryNotCreated
            | ConversationError::EmbeddingMissing { .. }
            | ConversationError::Internal(_) => AppError::InternalServerError(err.to_string()),
        }
    }
}

impl ConversationError {
    pub(crate) fn embedding(err: VectorError) -> Self {
        ConversationError::Embedding(err.to_string())
    }

    pub(crate) fn index(err: VectorError) -> Self {
        ConversationError::VectorIndex(err.to_string())
    }

    pub(crate) fn chat(err: UpstreamError) -> Self {
        ConversationError::Chat(err.to_string())
    }
}
