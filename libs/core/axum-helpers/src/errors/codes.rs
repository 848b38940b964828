//! Error codes carried in every JSON error body.
//!
//! Each code has a SCREAMING_SNAKE_CASE identifier for clients, an integer for
//! logs and dashboards, and a default message.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::UpstreamError;
//! assert_eq!(code.as_str(), "UPSTREAM_ERROR");
//! assert_eq!(code.code(), 1012);
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000s)
    BadRequest,
    ValidationError,
    NotFound,

    // Server errors (1000s)
    InternalError,
    /// An embedding, vector index or chat backend failed
    UpstreamError,

    // Database errors (2000s)
    DatabaseNotFound,
    DatabaseError,
    DatabasePoolTimeout,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BadRequest => "BAD_REQUEST",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::NotFound => "NOT_FOUND",
            Self::InternalError => "INTERNAL_ERROR",
            Self::UpstreamError => "UPSTREAM_ERROR",
            Self::DatabaseNotFound => "DATABASE_NOT_FOUND",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::DatabasePoolTimeout => "DATABASE_POOL_TIMEOUT",
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            Self::BadRequest => 1000,
            Self::ValidationError => 1001,
            Self::NotFound => 1004,
            Self::InternalError => 1005,
            Self::UpstreamError => 1012,

            Self::DatabaseNotFound => 2001,
            Self::DatabaseError => 2003,
            Self::DatabasePoolTimeout => 2013,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            Self::BadRequest => "Bad request",
            Self::ValidationError => "Request validation failed",
            Self::NotFound => "Resource not found",
            Self::InternalError => "An internal server error occurred",
            Self::UpstreamError => "An upstream service failed",
            Self::DatabaseNotFound => "Database record not found",
            Self::DatabaseError => "Database error occurred",
            Self::DatabasePoolTimeout => "Database connection pool timed out",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
