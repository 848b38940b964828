pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// JSON body of every structured error response.
///
/// ```json
/// {
///   "code": 1012,
///   "error": "UPSTREAM_ERROR",
///   "message": "Chat completion failed: 429 Too Many Requests"
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable error identifier
    pub error: String,
    /// Human-readable error message
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application error type that renders as an [`ErrorResponse`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Bad Gateway: {0}")]
    BadGateway(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
}

impl AppError {
    /// Status code and error code this error renders with
    pub fn status_and_code(&self) -> (StatusCode, ErrorCode) {
        match self {
            AppError::Database(e) => map_db_error(e),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, ErrorCode::ValidationError),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, ErrorCode::BadRequest),
            AppError::BadGateway(_) => (StatusCode::BAD_GATEWAY, ErrorCode::UpstreamError),
            AppError::InternalServerError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::InternalError)
            }
        }
    }

    /// Client-facing message. Internal failures use the code's default
    /// message so driver details stay in the logs.
    fn client_message(self, code: ErrorCode) -> String {
        match self {
            AppError::Validation(msg)
            | AppError::BadRequest(msg)
            | AppError::BadGateway(msg)
            | AppError::InternalServerError(msg) => msg,
            AppError::Database(_) => code.default_message().to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        if status.is_server_error() {
            tracing::error!(error_code = code.code(), error = %self, "Request failed");
        } else {
            tracing::info!(error_code = code.code(), error = %self, "Request rejected");
        }

        error_response(status, self.client_message(code), code)
    }
}

fn map_db_error(error: &DbErr) -> (StatusCode, ErrorCode) {
    match error {
        DbErr::RecordNotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::DatabaseNotFound),
        DbErr::ConnectionAcquire(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::DatabasePoolTimeout,
        ),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::DatabaseError),
    }
}

/// Build a JSON error response without going through [`AppError`]
pub fn error_response(status: StatusCode, message: String, error_code: ErrorCode) -> Response {
    let body = Json(ErrorResponse {
        code: error_code.code(),
        error: error_code.as_str().to_string(),
        message,
        details: None,
    });

    (status, body).into_response()
}
