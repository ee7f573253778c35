//! Job inspection endpoints.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use uuid::Uuid;

use catnote_core::defaults::JOB_LIST_LIMIT;
use catnote_core::{Job, JobRepository};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListJobsQuery {
    limit: Option<i64>,
}

/// GET /api/jobs: recent jobs, newest first.
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(query): Query<ListJobsQuery>,
) -> Result<Json<JsonValue>, ApiError> {
    let limit = query.limit.unwrap_or(JOB_LIST_LIMIT).max(0);
    let jobs = state.scheduler.jobs().list_recent(limit).await?;
    let pending = state.scheduler.jobs().pending_count().await?;

    Ok(Json(json!({
        "jobs": jobs,
        "pending": pending,
    })))
}

/// GET /api/jobs/:id
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Job>, ApiError> {
    state
        .scheduler
        .jobs()
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("job {} not found", id)))
}
