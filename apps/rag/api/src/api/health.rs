//! Readiness endpoint with a real database check.

use crate::state::AppState;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use axum_helpers::server::{HealthCheckFuture, run_health_checks};

/// Readiness check
///
/// Runs `SELECT 1` against PostgreSQL.
#[utoipa::path(
    get,
    path = "/ready",
    tag = "health",
    responses(
        (status = 200, description = "All dependencies reachable", body = serde_json::Value),
        (status = 503, response = axum_helpers::errors::responses::ServiceUnavailableResponse)
    )
)]
pub async fn ready_handler(State(state): State<AppState>) -> Response {
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
        "database",
        Box::pin(async {
            database::postgres::check_health(&state.db)
                .await
                .map_err(|e| format!("Database check failed: {}", e))
        }),
    )];

    match run_health_checks(checks).await {
        Ok((status, json)) => (status, json).into_response(),
        Err((status, json)) => (status, json).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Backends, Config, Environment};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use core_config::{app_info, server::ServerConfig, upstream::UpstreamConfig};
    use database::postgres::PostgresConfig;
    use domain_conversations::{ChatProviderType, ErrorContract, RetrievalConfig};
    use domain_vector::EmbeddingProviderType;
    use http_body_util::BodyExt;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::collections::BTreeMap;
    use tower::ServiceExt;

    fn config() -> Config {
        Config {
            app: app_info!(),
            database: PostgresConfig::new("postgres://localhost/rag"),
            server: ServerConfig::default(),
            environment: Environment::Development,
            upstream: UpstreamConfig::default(),
            retrieval: RetrievalConfig::default(),
            backends: Backends {
                embedding: EmbeddingProviderType::Cloudflare,
                chat: ChatProviderType::Cloudflare,
                index: Default::default(),
            },
            error_contract: ErrorContract::Legacy,
            run_migrations: false,
        }
    }

    async fn ready(db: sea_orm::DatabaseConnection) -> (StatusCode, serde_json::Value) {
        let app = crate::api::ready_router(AppState {
            config: config(),
            db,
        });

        let response = app
            .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_ready_when_database_answers() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![BTreeMap::from([("?column?", sea_orm::Value::from(1i32))])]])
            .into_connection();

        let (status, json) = ready(db).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ready");
        assert_eq!(json["database"], "connected");
    }

    #[tokio::test]
    async fn test_not_ready_when_database_fails() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([sea_orm::DbErr::Custom("connection refused".into())])
            .into_connection();

        let (status, json) = ready(db).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json["status"], "not ready");
        assert_eq!(json["database"], "disconnected");
    }
}
