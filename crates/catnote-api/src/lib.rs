//! # catnote-api
//!
//! HTTP surface for catnote: the category-scoped notes endpoints, the
//! cleanup trigger, job inspection and health.

pub mod config;
pub mod error;
pub mod handlers;
pub mod state;

pub use config::ServerConfig;
pub use error::ApiError;
pub use state::AppState;

use axum::routing::{delete, get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/notes", get(handlers::notes::list_notes))
        .route(
            "/api/notes/completed",
            delete(handlers::notes::delete_completed_notes),
        )
        .route(
            "/api/notes/run-cleanup-task",
            post(handlers::notes::run_cleanup_task),
        )
        .route("/api/jobs", get(handlers::jobs::list_jobs))
        .route("/api/jobs/:id", get(handlers::jobs::get_job))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}
