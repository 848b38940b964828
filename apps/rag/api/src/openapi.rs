use domain_conversations::ConversationsApiDoc;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(crate::api::health::ready_handler),
    components(
        schemas(axum_helpers::ErrorResponse),
        responses(axum_helpers::errors::responses::ServiceUnavailableResponse)
    ),
    info(
        title = "RAG API",
        version = "0.1.0",
        description = "Answers questions with similar stored exchanges as context, and stores new question/answer pairs"
    ),
    tags((name = "health", description = "Liveness and readiness"))
)]
struct RootDoc;

/// Full document: service routes plus the conversation routes at the root
pub struct ApiDoc;

impl OpenApi for ApiDoc {
    fn openapi() -> utoipa::openapi::OpenApi {
        let mut doc = RootDoc::openapi();
        doc.merge(ConversationsApiDoc::openapi());
        doc
    }
}
