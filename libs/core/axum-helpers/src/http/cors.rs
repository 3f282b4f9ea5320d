use axum::http::{HeaderValue, Method, header};
use core_config::server::ServerConfig;
use std::io;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

/// Build the CORS layer from the server configuration.
///
/// A `*` entry yields a permissive layer (any origin, method and header).
/// Otherwise the listed origins are allowed for the catalog's methods
/// (GET, POST, DELETE, OPTIONS) with a 1 hour preflight cache.
///
/// # Errors
/// Returns `InvalidInput` when an origin is not a valid header value.
pub fn cors_layer(config: &ServerConfig) -> io::Result<CorsLayer> {
    if config.allows_any_origin() {
        warn!("CORS configured to allow any origin");
        return Ok(CorsLayer::permissive());
    }

    let origins = config
        .cors_allowed_origins
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid CORS_ALLOWED_ORIGIN value: {}", e),
            )
        })?;

    info!(origins = ?config.cors_allowed_origins, "CORS configured");

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600)))
}
