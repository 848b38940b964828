use super::shutdown::ShutdownCoordinator;
use crate::errors::handlers::not_found;
use crate::http::cors::{create_cors_layer, parse_origins};
use crate::http::security::security_headers;
use axum::{Router, middleware};
use core_config::server::ServerConfig;
use std::future::Future;
use std::io;
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info, warn};
use utoipa::OpenApi;

/// Path the OpenAPI document is served from
pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

/// Wrap `apis` with API docs and the shared middleware stack.
///
/// - ReDoc at `/redoc`, RapiDoc at `/rapidoc`, Scalar at `/scalar`
/// - `apis` merged at the root, so its paths are served as declared
/// - tracing, security headers and response compression
/// - CORS for `cors_allowed_origins`, skipped when the list is empty
/// - JSON 404 fallback
///
/// Health routes are merged by the caller.
///
/// # Errors
/// Returns `InvalidInput` when a configured CORS origin is not a valid header value.
pub fn create_router<T>(apis: Router, server_config: &ServerConfig) -> io::Result<Router>
where
    T: OpenApi + 'static,
{
    use utoipa_rapidoc::RapiDoc;
    use utoipa_redoc::{Redoc, Servable as RedocServable};
    use utoipa_scalar::{Scalar, Servable as ScalarServable};

    let router = Router::new()
        .merge(RapiDoc::with_openapi(OPENAPI_JSON_PATH, T::openapi()).path("/rapidoc"))
        .merge(Redoc::with_url("/redoc", T::openapi()))
        .merge(Scalar::with_url("/scalar", T::openapi()))
        .merge(apis)
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn(security_headers));

    let router = if server_config.cors_allowed_origins.is_empty() {
        router
    } else {
        let origins = parse_origins(&server_config.cors_allowed_origins)?;
        info!(
            "CORS configured with allowed origins: {}",
            server_config.cors_allowed_origins.join(",")
        );
        router.layer(create_cors_layer(origins))
    };

    Ok(router.layer(CompressionLayer::new()))
}

/// Serve `router` until SIGINT/SIGTERM, drain in-flight requests, then run
/// `cleanup` bounded by `shutdown_timeout`.
///
/// ```ignore
/// create_production_app(router, &config, Duration::from_secs(30), async move {
///     close_postgres(db, "main").await;
/// })
/// .await?;
/// ```
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    shutdown_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let coordinator = ShutdownCoordinator::default();
    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    info!("Server starting on {}", listener.local_addr()?);

    let signal = coordinator.clone();
    let serve_result = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move { signal.wait_for_signal().await })
        .await
        .inspect_err(|e| {
            tracing::error!("Server encountered an error: {:?}", e);
        });

    info!("Starting cleanup tasks (timeout: {:?})", shutdown_timeout);
    match tokio::time::timeout(shutdown_timeout, cleanup).await {
        Ok(()) => info!("Cleanup completed successfully"),
        Err(_) => warn!(
            "Cleanup exceeded timeout of {:?}, forcing shutdown",
            shutdown_timeout
        ),
    }

    serve_result
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use axum::routing::get;
    use tower::ServiceExt;

    #[derive(OpenApi)]
    #[openapi(info(title = "test"))]
    struct TestDoc;

    fn api() -> Router {
        Router::new().route("/", get(|| async { "root" }))
    }

    #[tokio::test]
    async fn test_routes_mounted_at_root() {
        let app = create_router::<TestDoc>(api(), &ServerConfig::default()).unwrap();

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-frame-options"));
    }

    #[tokio::test]
    async fn test_unknown_path_is_json_404() {
        let app = create_router::<TestDoc>(api(), &ServerConfig::default()).unwrap();

        let response = app
            .oneshot(Request::builder().uri("/missing").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    }

    #[tokio::test]
    async fn test_openapi_document_served() {
        let app = create_router::<TestDoc>(api(), &ServerConfig::default()).unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri(OPENAPI_JSON_PATH)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_cors_preflight_for_configured_origin() {
        let config =
            ServerConfig::default().with_cors_origins(vec!["http://localhost:3000".to_string()]);
        let app = create_router::<TestDoc>(api(), &config).unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/")
                    .header(header::ORIGIN, "http://localhost:3000")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:3000"
        );
    }

    #[test]
    fn test_invalid_cors_origin_rejected() {
        let config = ServerConfig::default().with_cors_origins(vec!["bad\norigin".to_string()]);
        assert!(create_router::<TestDoc>(api(), &config).is_err());
    }
}
