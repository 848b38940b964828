pub mod health;

use axum::{Router, routing::get};
use domain_conversations::RagService;

use crate::state::AppState;

/// Query and insert routes, mounted at the root
pub fn routes(state: &AppState, service: RagService) -> Router {
    domain_conversations::router(service, state.config.error_contract)
}

/// Creates a router with the /ready endpoint that performs actual health checks.
///
/// This router has state applied and can be merged with the stateless app router
/// from `create_router`.
pub fn ready_router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
