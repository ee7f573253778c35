//! Background cleanup of a category's completed notes.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use catnote_core::{
    CategoryId, CategoryLocks, JobType, NoteStore, NotesService, Result, RetryPolicy,
    ScopeSelector,
};

use crate::handler::{JobContext, JobHandler, JobResult};
use crate::scheduler::UnitOfWork;

/// Arguments captured when a cleanup is triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupArgs {
    pub category_id: CategoryId,
}

/// Deletes the completed notes of the category it was submitted with.
///
/// Runs outside any request, so its scope comes from the captured
/// `category_id` pushed into a detached [`ScopeSelector`]. A failure is
/// recorded once and never retried.
pub struct NotesCleanupJob {
    store: Arc<dyn NoteStore>,
    locks: CategoryLocks,
}

impl NotesCleanupJob {
    pub fn new(store: Arc<dyn NoteStore>, locks: CategoryLocks) -> Self {
        Self { store, locks }
    }

    /// Clean up `category_id` in a fresh execution scope.
    pub async fn run(&self, category_id: CategoryId) -> Result<u64> {
        let scope = Arc::new(ScopeSelector::detached(self.store.clone()));
        scope.job_scope().set_category_id(category_id);

        NotesService::new(self.store.clone(), scope)
            .with_category_locks(self.locks.clone())
            .delete_completed_notes()
            .await
    }
}

impl UnitOfWork for NotesCleanupJob {
    const JOB_TYPE: JobType = JobType::NotesCleanup;
    const RETRY_POLICY: RetryPolicy = RetryPolicy::NONE;
    type Args = CleanupArgs;
}

#[async_trait]
impl JobHandler for NotesCleanupJob {
    fn job_type(&self) -> JobType {
        <Self as UnitOfWork>::JOB_TYPE
    }

    async fn execute(&self, ctx: JobContext) -> JobResult {
        let args: CleanupArgs = match ctx.args() {
            Ok(args) => args,
            Err(e) => return JobResult::Failed(e.to_string()),
        };

        match self.run(args.category_id).await {
            Ok(removed) => {
                info!(
                    subsystem = "jobs",
                    component = "notes_cleanup",
                    job_id = %ctx.job.id,
                    category_id = args.category_id,
                    removed_count = removed,
                    "Notes cleanup finished"
                );
                JobResult::Success(Some(json!({
                    "category_id": args.category_id,
                    "removed": removed,
                })))
            }
            Err(e) => {
                warn!(
                    subsystem = "jobs",
                    component = "notes_cleanup",
                    job_id = %ctx.job.id,
                    category_id = args.category_id,
                    error = %e,
                    "Notes cleanup failed"
                );
                JobResult::Failed(e.to_string())
            }
        }
    }
}
