//! Query string extractor with standardized rejections.

use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

/// Query extractor whose rejection is an [`AppError`] response
/// (`400 INVALID_QUERY` with the standard error body).
///
/// # Example
/// ```ignore
/// use axum_helpers::extractors::QueryParams;
///
/// async fn list(QueryParams(filter): QueryParams<ItemFilter>) -> String {
///     format!("{:?}", filter)
/// }
/// ```
pub struct QueryParams<T>(pub T);

impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::from(e).into_response())?;

        Ok(QueryParams(params))
    }
}
