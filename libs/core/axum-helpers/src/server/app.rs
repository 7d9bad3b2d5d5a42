use super::shutdown::{ShutdownCoordinator, shutdown_signal};
use crate::errors::handlers::not_found;
use crate::http::{cors::create_cors_layer, security::security_headers};
use axum::{Router, middleware};
use core_config::{cors::CorsConfig, server::ServerConfig};
use std::future::{Future, IntoFuture};
use std::io;
use tower_http::compression::CompressionLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info, warn};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as ScalarServable};
use utoipa_swagger_ui::SwaggerUi;

/// Combine domain routes with docs and cross-cutting middleware.
///
/// - Swagger UI at `/swagger-ui` (spec at `/api-docs/openapi.json`) and Scalar at `/scalar`
/// - `apis` merged at the root, so `/products`, `/orders` and `/categories` keep their paths
/// - JSON 404 fallback
/// - request tracing, security headers, single-origin CORS and response compression
///
/// Domain routers apply their own state before being passed in.
pub fn create_router<T>(apis: Router, cors: &CorsConfig) -> io::Result<Router>
where
    T: OpenApi + 'static,
{
    let cors_layer = create_cors_layer(cors).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("Invalid CORS origin '{}': {}", cors.allowed_origin, e),
        )
    })?;
    info!(origin = %cors.allowed_origin, "CORS configured");

    let router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", T::openapi()))
        .merge(Scalar::with_url("/scalar", T::openapi()))
        .merge(apis)
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn(security_headers))
        .layer(cors_layer)
        .layer(CompressionLayer::new());

    Ok(router)
}

/// Serve `router` until SIGINT/SIGTERM, then drain and run `cleanup`.
///
/// In-flight requests get `server_config.shutdown_timeout` to finish; `cleanup`
/// (closing the DB pool) gets the same budget afterwards.
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    cleanup: F,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let timeout = server_config.shutdown_timeout;
    let coordinator = ShutdownCoordinator::new();

    let signal_coordinator = coordinator.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        signal_coordinator.shutdown();
    });

    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    info!("Server listening on {}", listener.local_addr()?);

    let graceful = coordinator.clone();
    let server = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move { graceful.wait().await })
        .into_future();

    let drain_deadline = async {
        coordinator.wait().await;
        tokio::time::sleep(timeout).await;
    };

    let serve_result = tokio::select! {
        result = server => result.inspect_err(|e| tracing::error!("Server error: {:?}", e)),
        _ = drain_deadline => {
            warn!(?timeout, "In-flight requests did not finish in time, forcing shutdown");
            Ok(())
        }
    };

    info!(?timeout, "Running cleanup");
    if tokio::time::timeout(timeout, cleanup).await.is_err() {
        warn!(?timeout, "Cleanup exceeded timeout");
    } else {
        info!("Cleanup completed");
    }

    serve_result
}
