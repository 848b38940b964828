mod response;
mod routes;

pub use response::{ErrorContract, HandlerError, LEGACY_ERROR_PREFIX};

use axum::{Router, routing::{get, post}};
use axum_helpers::errors::responses::{BadGatewayResponse, InternalServerErrorResponse};
use axum_helpers::ErrorResponse;
use domain_vector::UpsertResult;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::models::{Conversation, InsertRequest, InsertResponse};
use crate::service::RagService;

/// OpenAPI documentation for the query and insert routes
#[derive(OpenApi)]
#[openapi(
    paths(routes::ask, routes::insert),
    components(
        schemas(Conversation, InsertRequest, InsertResponse, UpsertResult, ErrorResponse),
        responses(BadGatewayResponse, InternalServerErrorResponse)
    ),
    tags(
        (name = "conversations", description = "Retrieval-augmented question answering")
    )
)]
pub struct ConversationsApiDoc;

/// Shared state of the conversation routes
#[derive(Clone)]
pub struct ConversationState {
    pub service: Arc<RagService>,
    pub contract: ErrorContract,
}

/// `/` (query) and `/insert` routes
pub fn router(service: RagService, contract: ErrorContract) -> Router {
    let state = ConversationState {
        service: Arc::new(service),
        contract,
    };

    Router::new()
        .route("/", get(routes::ask).post(routes::ask))
        .route("/insert", post(routes::insert))
        .with_state(state)
}
