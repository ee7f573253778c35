//! Notes endpoints.
//!
//! Each request gets its own [`ScopeSelector`], so the category header of one
//! request can never leak into another.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{FromRequestParts, State};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value as JsonValue};
use tracing::info;
use uuid::Uuid;

use catnote_core::{CategoryId, NoteRecord, NotesService, RequestHeaders, ScopeSelector};
use catnote_jobs::{CleanupArgs, NotesCleanupJob};

use crate::error::ApiError;
use crate::state::AppState;

/// Copy the transport headers into the transport-neutral snapshot.
///
/// Non-UTF-8 values are kept lossily so they fail category parsing instead of
/// reading as absent.
pub fn snapshot_headers(headers: &HeaderMap) -> RequestHeaders {
    RequestHeaders::from_pairs(headers.iter().map(|(name, value)| {
        (
            name.as_str(),
            String::from_utf8_lossy(value.as_bytes()).into_owned(),
        )
    }))
}

/// [`NotesService`] bound to the calling request's scope.
pub struct ScopedNotes(pub NotesService);

#[axum::async_trait]
impl FromRequestParts<AppState> for ScopedNotes {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let store = state.db.notes.clone();
        let scope = ScopeSelector::for_request(store.clone(), snapshot_headers(&parts.headers));
        let service =
            NotesService::new(store, Arc::new(scope)).with_category_locks(state.locks.clone());
        Ok(ScopedNotes(service))
    }
}

/// GET /api/notes: completed notes of the header's category.
pub async fn list_notes(
    ScopedNotes(service): ScopedNotes,
) -> Result<Json<Vec<NoteRecord>>, ApiError> {
    let notes = service.list_completed_notes().await?;
    Ok(Json(notes.into_iter().map(NoteRecord::from).collect()))
}

#[derive(Debug, Serialize)]
pub struct CleanupResponse {
    pub category_id: CategoryId,
    pub removed: u64,
}

/// DELETE /api/notes/completed: synchronous cleanup in the request scope.
pub async fn delete_completed_notes(
    ScopedNotes(service): ScopedNotes,
) -> Result<Json<CleanupResponse>, ApiError> {
    let removed = service.delete_completed_notes().await?;
    let category = service.current_category().await?;
    Ok(Json(CleanupResponse {
        category_id: category.id,
        removed,
    }))
}

/// POST /api/notes/run-cleanup-task: queue a background cleanup.
///
/// Only the header's syntax is checked here. The job itself reports an
/// unknown category when it runs.
pub async fn run_cleanup_task(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<JsonValue>, ApiError> {
    let category_id = snapshot_headers(&headers).category_id()?;

    let job_id: Uuid = state
        .scheduler
        .enqueue::<NotesCleanupJob>(CleanupArgs { category_id })
        .await?;

    info!(
        subsystem = "api",
        op = "run_cleanup_task",
        category_id,
        job_id = %job_id,
        "Cleanup task triggered"
    );

    Ok(Json(json!({
        "message": "Cleanup task triggered",
        "job_id": job_id,
        "category_id": category_id,
    })))
}
