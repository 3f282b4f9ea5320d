//! # Axum Helpers
//!
//! Shared HTTP plumbing for the workspace's Axum services.
//!
//! ## Modules
//!
//! - **[`server`]**: Router assembly, health endpoint, graceful shutdown
//! - **[`http`]**: CORS and security header middleware
//! - **[`errors`]**: Structured error responses with error codes
//! - **[`extractors`]**: JSON body, query string and UUID path extractors
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum::Router;
//! use axum_helpers::server::{create_production_app, create_router};
//! use core_config::server::ServerConfig;
//! use std::time::Duration;
//! use utoipa::OpenApi;
//!
//! #[derive(OpenApi)]
//! #[openapi(paths())]
//! struct ApiDoc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::default();
//!     let router = create_router::<ApiDoc>(Router::new(), &config)?;
//!     create_production_app(router, &config, Duration::from_secs(30), async {}).await?;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use server::{
    HealthResponse, ShutdownCoordinator, create_production_app, create_router, health_router,
    shutdown_signal,
};

pub use http::{cors_layer, security_headers};

pub use errors::{AppError, ErrorCode, ErrorResponse};

pub use extractors::{JsonBody, QueryParams, UuidPath};
