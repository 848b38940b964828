//! Mapping of [`ConversationError`] onto HTTP responses.

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use axum_helpers::AppError;
use core_config::{ConfigError, FromEnv, env_or_default};
use std::str::FromStr;

use crate::error::ConversationError;

/// Prefix of every catch-all body in the legacy contract
pub const LEGACY_ERROR_PREFIX: &str = "Error occured";

/// How errors outside the insert-path failures are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorContract {
    /// `200 text/plain` with `"Error occured" + detail`
    #[default]
    Legacy,
    /// Structured JSON [`AppError`] with a 4xx/5xx status
    Strict,
}

impl FromStr for ErrorContract {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "legacy" | "" => Ok(ErrorContract::Legacy),
            "strict" => Ok(ErrorContract::Strict),
            other => Err(format!("expected 'legacy' or 'strict', got '{}'", other)),
        }
    }
}

impl FromEnv for ErrorContract {
    /// RAG_ERROR_CONTRACT: `legacy` (default) or `strict`
    fn from_env() -> Result<Self, ConfigError> {
        env_or_default("RAG_ERROR_CONTRACT", "legacy")
            .parse()
            .map_err(|details| ConfigError::ParseError {
                key: "RAG_ERROR_CONTRACT".to_string(),
                details,
            })
    }
}

/// A handler failure paired with the contract it renders under
#[derive(Debug)]
pub struct HandlerError {
    pub error: ConversationError,
    pub contract: ErrorContract,
}

impl HandlerError {
    pub fn new(error: ConversationError, contract: ErrorContract) -> Self {
        Self { error, contract }
    }
}

fn plain_text(status: StatusCode, body: String) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        body,
    )
        .into_response()
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        // Insert-path failures keep their own status and body in both contracts
        if let Some(message) = self.error.insert_failure_message() {
            let status = match self.error {
                ConversationError::MissingFields => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            if status.is_server_error() {
                tracing::error!(error = %self.error, "Insert failed");
            } else {
                tracing::info!(error = %self.error, "Insert rejected");
            }
            return plain_text(status, message.to_string());
        }

        match self.contract {
            ErrorContract::Legacy => {
                tracing::error!(error = %self.error, "Request failed");
                plain_text(StatusCode::OK, format!("{}{}", LEGACY_ERROR_PREFIX, self.error))
            }
            ErrorContract::Strict => AppError::from(self.error).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_text(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_legacy_catch_all_is_200_text() {
        let response = HandlerError::new(
            ConversationError::Chat("HTTP 500".to_string()),
            ErrorContract::Legacy,
        )
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response.headers()[header::CONTENT_TYPE]
                .to_str()
                .unwrap()
                .starts_with("text/plain")
        );
        assert_eq!(
            body_text(response).await,
            "Error occuredChat completion failed: HTTP 500"
        );
    }

    #[tokio::test]
    async fn test_strict_upstream_is_502_json() {
        let response = HandlerError::new(
            ConversationError::Embedding("timeout".to_string()),
            ErrorContract::Strict,
        )
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json["error"], "UPSTREAM_ERROR");
    }

    #[tokio::test]
    async fn test_insert_failures_ignore_contract() {
        for contract in [ErrorContract::Legacy, ErrorContract::Strict] {
            let response =
                HandlerError::new(ConversationError::MissingFields, contract).into_response();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(body_text(response).await, "Missing request/response");

            let response = HandlerError::new(ConversationError::EmbeddingMissing { id: 3 }, contract)
                .into_response();
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body_text(response).await, "Failed to generate vector embedding");
        }
    }

    #[test]
    fn test_contract_from_env() {
        temp_env::with_var_unset("RAG_ERROR_CONTRACT", || {
            assert_eq!(ErrorContract::from_env().unwrap(), ErrorContract::Legacy);
        });
        temp_env::with_var("RAG_ERROR_CONTRACT", Some("STRICT"), || {
            assert_eq!(ErrorContract::from_env().unwrap(), ErrorContract::Strict);
        });
        temp_env::with_var("RAG_ERROR_CONTRACT", Some("lenient"), || {
            assert!(ErrorContract::from_env().is_err());
        });
    }
}
