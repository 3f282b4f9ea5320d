use super::shutdown::{ShutdownCoordinator, shutdown_signal};
use crate::errors::handlers::not_found;
use crate::http::{cors_layer, security_headers};
use axum::{Router, middleware};
use core_config::server::ServerConfig;
use std::io;
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use utoipa::OpenApi;

/// Creates a configured Axum router with common middleware and documentation.
///
/// This function sets up:
/// - OpenAPI documentation (Swagger UI, ReDoc, RapiDoc, Scalar) backed by
///   `/api-docs/openapi.json`
/// - API routes nested under `/api`
/// - Request tracing, security headers, CORS and response compression
/// - JSON 404 fallback
///
/// Health endpoints are merged by the app with `health_router()`.
///
/// # Type Parameters
/// * `T` - A type implementing `utoipa::OpenApi` for API documentation
///
/// # Errors
/// Returns `InvalidInput` when the configured CORS origins are not valid
/// header values.
pub fn create_router<T>(apis: Router, server_config: &ServerConfig) -> io::Result<Router>
where
    T: OpenApi + 'static,
{
    use utoipa_rapidoc::RapiDoc;
    use utoipa_redoc::{Redoc, Servable as RedocServable};
    use utoipa_scalar::{Scalar, Servable as ScalarServable};
    use utoipa_swagger_ui::SwaggerUi;

    let cors = cors_layer(server_config)?;

    let router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", T::openapi()))
        .merge(Redoc::with_url("/redoc", T::openapi()))
        .merge(RapiDoc::new("/api-docs/openapi.json").path("/rapidoc"))
        .merge(Scalar::with_url("/scalar", T::openapi()))
        .nest("/api", apis)
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn(security_headers))
        .layer(cors)
        .layer(CompressionLayer::new());

    Ok(router)
}

/// Serve `router` until SIGINT/SIGTERM, then drain and run `cleanup`.
///
/// `cleanup` starts when shutdown is signalled and is bounded by
/// `shutdown_timeout`; a cleanup that overruns is abandoned with a warning.
///
/// # Example
/// ```ignore
/// use std::time::Duration;
/// use axum_helpers::server::create_production_app;
///
/// create_production_app(router, &config, Duration::from_secs(30), async move {
///     tracing::info!("Dropping catalog");
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
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let coordinator = ShutdownCoordinator::new();

    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    info!("Server starting on {}", listener.local_addr()?);

    let signal_handle = {
        let coordinator = coordinator.clone();
        tokio::spawn(async move {
            shutdown_signal().await;
            coordinator.shutdown();
        })
    };

    let cleanup_handle = {
        let coordinator = coordinator.clone();
        tokio::spawn(async move {
            coordinator.wait().await;

            info!("Starting cleanup tasks (timeout: {:?})", shutdown_timeout);
            match tokio::time::timeout(shutdown_timeout, cleanup).await {
                Ok(_) => info!("Cleanup completed successfully"),
                Err(_) => tracing::warn!(
                    "Cleanup exceeded timeout of {:?}, forcing shutdown",
                    shutdown_timeout
                ),
            }
        })
    };

    let serve_result = {
        let coordinator = coordinator.clone();
        axum::serve(listener, router.into_make_service())
            .with_graceful_shutdown(async move { coordinator.wait().await })
            .await
            .inspect_err(|e| {
                tracing::error!("Server encountered an error: {:?}", e);
            })
    };

    // Release the cleanup task if the server stopped on its own.
    coordinator.shutdown();
    signal_handle.abort();
    cleanup_handle.await.ok();

    serve_result
}
