use axum::http::{HeaderValue, Method, header, header::InvalidHeaderValue};
use core_config::cors::CorsConfig;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// CORS layer admitting exactly the configured browser origin.
///
/// Allows GET, POST, PUT, DELETE and OPTIONS with credentials; preflight
/// responses are cached for one hour.
pub fn create_cors_layer(config: &CorsConfig) -> Result<CorsLayer, InvalidHeaderValue> {
    let origin = HeaderValue::from_str(&config.allowed_origin)?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list([origin]))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::Request, routing::get};
    use tower::ServiceExt;

    fn app() -> Router {
        let layer = create_cors_layer(&CorsConfig::default()).unwrap();
        Router::new().route("/products", get(|| async { "[]" })).layer(layer)
    }

    #[tokio::test]
    async fn test_configured_origin_is_echoed() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/products")
                    .header(header::ORIGIN, "http://localhost:4200")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:4200"
        );
    }

    #[tokio::test]
    async fn test_other_origin_gets_no_allow_header() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/products")
                    .header(header::ORIGIN, "http://evil.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }
}
