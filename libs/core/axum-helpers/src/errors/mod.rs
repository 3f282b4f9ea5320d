pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Standard error response structure.
///
/// Returned for every error response:
/// - `code`: integer error code for logging/monitoring (e.g., 1004)
/// - `error`: machine-readable identifier (e.g., "NOT_FOUND")
/// - `message`: human-readable message
/// - `details`: optional structured details (e.g., the offending field)
///
/// # JSON Example
///
/// ```json
/// {
///   "code": 1001,
///   "error": "VALIDATION_ERROR",
///   "message": "description is required",
///   "details": { "field": "description", "reason": "is required" }
/// }
/// ```
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable error identifier for programmatic handling
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Optional structured error details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application error type that can be converted to HTTP responses.
///
/// Domain crates convert their own error enums into this type so every
/// service renders errors the same way.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Query extraction error: {0}")]
    QueryExtractorRejection(#[from] QueryRejection),

    #[error("Invalid UUID: {0}")]
    InvalidUuid(String),

    #[error("Invalid field '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, details, code) = match self {
            AppError::JsonExtractorRejection(e) => {
                tracing::warn!(
                    error_code = ErrorCode::JsonExtraction.code(),
                    "JSON extraction error: {:?}",
                    e
                );
                let status = match &e {
                    JsonRejection::MissingJsonContentType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
                    _ => StatusCode::BAD_REQUEST,
                };
                (status, e.body_text(), None, ErrorCode::JsonExtraction)
            }
            AppError::QueryExtractorRejection(e) => {
                tracing::info!(
                    error_code = ErrorCode::InvalidQuery.code(),
                    "Query extraction error: {:?}",
                    e
                );
                (
                    StatusCode::BAD_REQUEST,
                    e.body_text(),
                    None,
                    ErrorCode::InvalidQuery,
                )
            }
            AppError::InvalidUuid(raw) => {
                tracing::info!(
                    error_code = ErrorCode::InvalidUuid.code(),
                    "Invalid UUID: {}",
                    raw
                );
                (
                    StatusCode::BAD_REQUEST,
                    format!("{}: {}", ErrorCode::InvalidUuid.default_message(), raw),
                    None,
                    ErrorCode::InvalidUuid,
                )
            }
            AppError::InvalidField { field, reason } => {
                tracing::info!(
                    error_code = ErrorCode::ValidationError.code(),
                    field = %field,
                    "Validation error: {}",
                    reason
                );
                (
                    StatusCode::BAD_REQUEST,
                    format!("{} {}", field, reason),
                    Some(serde_json::json!({ "field": field, "reason": reason })),
                    ErrorCode::ValidationError,
                )
            }
            AppError::NotFound(msg) => {
                tracing::info!(
                    error_code = ErrorCode::NotFound.code(),
                    "Not found: {}",
                    msg
                );
                (StatusCode::NOT_FOUND, msg, None, ErrorCode::NotFound)
            }
            AppError::InternalServerError(msg) => {
                tracing::error!(
                    error_code = ErrorCode::InternalError.code(),
                    "Internal server error: {}",
                    msg
                );
                // Internal details stay in the logs.
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::InternalError.default_message().to_string(),
                    None,
                    ErrorCode::InternalError,
                )
            }
        };

        error_response(status, message, details, code)
    }
}

/// Build a JSON error response with the standard body.
///
/// # Example
///
/// ```rust,ignore
/// use axum_helpers::errors::{error_response, ErrorCode};
/// use axum::http::StatusCode;
///
/// let response = error_response(
///     StatusCode::NOT_FOUND,
///     "No route".to_string(),
///     None,
///     ErrorCode::NotFound,
/// );
/// ```
pub fn error_response(
    status: StatusCode,
    message: String,
    details: Option<serde_json::Value>,
    error_code: ErrorCode,
) -> Response {
    let body = Json(ErrorResponse {
        code: error_code.code(),
        error: error_code.as_str().to_string(),
        message,
        details,
    });

    (status, body).into_response()
}
