//! Readiness endpoint

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    status: &'static str,
    items: u64,
}

/// Create the readiness router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(readiness_check))
        .with_state(state)
}

/// Readiness check - the catalog answers and reports its size
async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    match state.catalog.count_items().await {
        Ok(items) => (
            StatusCode::OK,
            Json(ReadinessResponse {
                status: "ready",
                items,
            }),
        ),
        Err(e) => {
            tracing::error!("Readiness check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadinessResponse {
                    status: "unavailable",
                    items: 0,
                }),
            )
        }
    }
}
