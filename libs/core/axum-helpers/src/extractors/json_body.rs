//! JSON body extractor with standardized rejections.

use crate::errors::AppError;
use axum::{
    extract::{FromRequest, Json, Request},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

/// JSON extractor whose rejection is an [`AppError`] response.
///
/// Axum's plain `Json` rejects with a text body and `422` for type errors;
/// this wrapper answers `400` with the standard error body instead. Field
/// level validation stays with the domain service.
///
/// # Example
/// ```ignore
/// use axum_helpers::extractors::JsonBody;
///
/// async fn create(JsonBody(payload): JsonBody<CreateItem>) -> String {
///     format!("{:?}", payload)
/// }
/// ```
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::from(e).into_response())?;

        Ok(JsonBody(data))
    }
}
