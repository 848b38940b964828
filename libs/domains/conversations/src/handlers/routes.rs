use axum::{Json, body::Bytes, extract::State};

use super::ConversationState;
use super::response::HandlerError;
use crate::error::ConversationError;
use crate::models::{InsertRequest, InsertResponse};

/// Answer a question, using similar stored exchanges as context
///
/// The whole request body is the question. `POST` is accepted for clients
/// that cannot send a body with `GET`.
#[utoipa::path(
    method(get, post),
    path = "/",
    tag = "conversations",
    request_body(content = String, content_type = "text/plain", description = "The question"),
    responses(
        (status = 200, description = "Model answer, or \"Error occured\" text in the legacy error contract", body = String, content_type = "text/plain"),
        (status = 502, response = axum_helpers::errors::responses::BadGatewayResponse),
        (status = 500, response = axum_helpers::errors::responses::InternalServerErrorResponse)
    )
)]
pub async fn ask(
    State(state): State<ConversationState>,
    body: Bytes,
) -> Result<String, HandlerError> {
    // Invalid UTF-8 is replaced, not rejected
    let question = String::from_utf8_lossy(&body);
    state
        .service
        .ask(&question)
        .await
        .map_err(|e| HandlerError::new(e, state.contract))
}

/// Store a question/answer pair and index the question
#[utoipa::path(
    post,
    path = "/insert",
    tag = "conversations",
    request_body = InsertRequest,
    responses(
        (status = 200, description = "Row stored and indexed", body = InsertResponse),
        (status = 400, description = "Missing request/response", body = String, content_type = "text/plain"),
        (status = 500, description = "Failed to create chat history, or failed to generate vector embedding", body = String, content_type = "text/plain"),
        (status = 502, response = axum_helpers::errors::responses::BadGatewayResponse)
    )
)]
pub async fn insert(
    State(state): State<ConversationState>,
    body: Bytes,
) -> Result<Json<InsertResponse>, HandlerError> {
    let fail = |e: ConversationError| HandlerError::new(e, state.contract);

    // Parsed by hand so a missing content-type header is not a rejection
    let input = InsertRequest::from_json(&body)
        .map_err(|e| fail(ConversationError::InvalidBody(e.to_string())))?;
    let input = input.into_new().ok_or_else(|| fail(ConversationError::MissingFields))?;

    let response = state.service.insert(input).await.map_err(fail)?;
    Ok(Json(response))
}
