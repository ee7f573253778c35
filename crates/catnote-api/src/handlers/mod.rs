//! HTTP handlers.

pub mod jobs;
pub mod notes;

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value as JsonValue};

use crate::error::ApiError;
use crate::state::AppState;

/// GET /health
pub async fn health(State(state): State<AppState>) -> Result<Json<JsonValue>, ApiError> {
    let pending_jobs = state.scheduler.pending_count().await?;
    state.db.log_metrics();
    Ok(Json(json!({
        "status": "ok",
        "pending_jobs": pending_jobs,
    })))
}
