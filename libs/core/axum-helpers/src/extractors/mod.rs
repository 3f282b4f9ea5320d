//! Custom extractors for Axum handlers.
//!
//! All of them reject with [`AppError`](crate::errors::AppError) so malformed
//! requests get the standard JSON error body.

pub mod json_body;
pub mod query_params;
pub mod uuid_path;

pub use json_body::JsonBody;
pub use query_params::QueryParams;
pub use uuid_path::UuidPath;
