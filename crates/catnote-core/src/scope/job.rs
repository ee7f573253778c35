//! Scope resolution from an explicitly assigned category id.

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use tracing::{debug, warn};

use super::cell::ScopeCell;
use super::{lookup_category, ScopePhase, ScopeResolver};
use crate::error::{Result, ScopeError};
use crate::models::{Category, CategoryId};
use crate::traits::NoteStore;

/// Resolves the category a background job was submitted for.
///
/// There is no ambient request in a job, so the only input is
/// [`set_category_id`](Self::set_category_id), which the job calls before
/// invoking any business logic.
pub struct JobScopeResolver {
    store: Arc<dyn NoteStore>,
    category_id: OnceLock<CategoryId>,
    cell: ScopeCell,
}

impl JobScopeResolver {
    pub fn new(store: Arc<dyn NoteStore>) -> Self {
        Self {
            store,
            category_id: OnceLock::new(),
            cell: ScopeCell::new(),
        }
    }

    /// Assign the category for this job. Only the first assignment counts.
    pub fn set_category_id(&self, category_id: CategoryId) {
        match self.category_id.set(category_id) {
            Ok(()) => debug!(
                subsystem = "scope",
                component = "job_resolver",
                category_id,
                "Job scope assigned"
            ),
            Err(rejected) => {
                if self.category_id.get() != Some(&rejected) {
                    warn!(
                        subsystem = "scope",
                        component = "job_resolver",
                        category_id = rejected,
                        current = ?self.category_id.get(),
                        "Ignoring reassignment of job scope"
                    );
                }
            }
        }
    }

    /// The assigned id, if any.
    pub fn category_id(&self) -> Option<CategoryId> {
        self.category_id.get().copied()
    }

    async fn load(&self) -> Result<Category> {
        let category_id = self.category_id().ok_or(ScopeError::CategoryIdNotSet)?;
        debug!(
            subsystem = "scope",
            component = "job_resolver",
            op = "resolve",
            category_id,
            "Resolving category from job argument"
        );
        lookup_category(self.store.as_ref(), category_id).await
    }
}

#[async_trait]
impl ScopeResolver for JobScopeResolver {
    async fn resolve(&self) -> Result<Arc<Category>> {
        self.cell.get_or_resolve(move || self.load()).await
    }

    fn phase(&self) -> ScopePhase {
        self.cell.phase()
    }
}
