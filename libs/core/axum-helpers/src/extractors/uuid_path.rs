//! UUID path parameter extractor.

use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

/// Extractor for a single UUID path parameter.
///
/// Malformed values are rejected with `400 INVALID_UUID` before the handler
/// runs.
///
/// # Example
/// ```ignore
/// use axum::Router;
/// use axum::routing::get;
/// use axum_helpers::extractors::UuidPath;
///
/// async fn get_item(UuidPath(id): UuidPath) -> String {
///     format!("Item ID: {}", id)
/// }
///
/// let app = Router::new().route("/items/{id}", get(get_item));
/// ```
pub struct UuidPath(pub Uuid);

impl<S> FromRequestParts<S> for UuidPath
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| e.into_response())?;

        Uuid::parse_str(&raw)
            .map(UuidPath)
            .map_err(|_| AppError::InvalidUuid(raw).into_response())
    }
}
