use axum::http::{HeaderValue, Method, header};
use std::io;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// CORS layer for an explicit origin list
///
/// Allows GET, POST and OPTIONS with `Content-Type` and `Accept`, cached for one hour.
pub fn create_cors_layer(allowed_origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600))
}

/// Parse configured origins into header values, rejecting malformed entries
pub fn parse_origins(origins: &[String]) -> io::Result<Vec<HeaderValue>> {
    origins
        .iter()
        .map(|origin| {
            origin.parse::<HeaderValue>().map_err(|e| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("Invalid CORS origin '{}': {}", origin, e),
                )
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins() {
        let origins = vec![
            "http://localhost:3000".to_string(),
            "https://chat.example.com".to_string(),
        ];
        let parsed = parse_origins(&origins).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1], "https://chat.example.com");
    }

    #[test]
    fn test_parse_origins_rejects_invalid() {
        let origins = vec!["http://bad\norigin".to_string()];
        let err = parse_origins(&origins).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
