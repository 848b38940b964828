//! Reusable OpenAPI response types.

use super::ErrorResponse;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Internal Server Error",
    content_type = "application/json",
    example = json!({
        "code": 1005,
        "error": "INTERNAL_ERROR",
        "message": "An internal server error occurred"
    })
)]
pub struct InternalServerErrorResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Gateway - an upstream service failed",
    content_type = "application/json",
    example = json!({
        "code": 1012,
        "error": "UPSTREAM_ERROR",
        "message": "Embedding service error: 503 Service Unavailable"
    })
)]
pub struct BadGatewayResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Service Unavailable",
    content_type = "application/json",
    example = json!({
        "status": "not ready",
        "database": "disconnected"
    })
)]
pub struct ServiceUnavailableResponse(pub ErrorResponse);
