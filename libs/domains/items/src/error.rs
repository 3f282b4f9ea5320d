use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq)]
pub enum ItemError {
    /// Caller input is missing or malformed; `field` uses the wire name.
    #[error("Invalid input: {field} {reason}")]
    Validation { field: String, reason: String },

    #[error("Item not found: {0}")]
    NotFound(Uuid),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ItemError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ItemError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// The offending field of a validation error.
    pub fn field(&self) -> Option<&str> {
        match self {
            ItemError::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}

pub type ItemResult<T> = Result<T, ItemError>;

/// Convert ItemError to AppError for standardized error responses
impl From<ItemError> for AppError {
    fn from(err: ItemError) -> Self {
        match err {
            ItemError::Validation { field, reason } => AppError::InvalidField { field, reason },
            ItemError::NotFound(id) => AppError::NotFound(format!("Item {} not found", id)),
            ItemError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for ItemError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
