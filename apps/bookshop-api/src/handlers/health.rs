//! Health check handler

use axum::{extract::State, http::StatusCode};

use crate::AppState;

/// `OK` while the database answers, `503` otherwise.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, &'static str) {
    if state.db.health_check().await {
        (StatusCode::OK, "OK")
    } else {
        tracing::warn!("Health check failed: database unavailable");
        (StatusCode::SERVICE_UNAVAILABLE, "Database unavailable")
    }
}
