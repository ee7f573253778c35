//! Shared application state.

use catnote_core::CategoryLocks;
use catnote_db::Database;
use catnote_jobs::JobScheduler;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub scheduler: JobScheduler,
    /// Serializes cleanups of one category across requests and jobs.
    pub locks: CategoryLocks,
}

impl AppState {
    pub fn new(db: Database, locks: CategoryLocks) -> Self {
        let scheduler = JobScheduler::new(db.jobs.clone());
        Self {
            db,
            scheduler,
            locks,
        }
    }
}
