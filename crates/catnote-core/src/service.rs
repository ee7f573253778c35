//! Notes business logic scoped to the execution's category.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, instrument};

use crate::error::Result;
use crate::locks::CategoryLocks;
use crate::models::{Category, CategoryId, Note, NoteId, NoteQuery};
use crate::scope::ScopeResolver;
use crate::traits::NoteStore;

/// Lists and cleans up completed notes of the current scope.
///
/// Built once per execution around that execution's [`ScopeResolver`]; it
/// never knows whether a request or a job supplied the category.
#[derive(Clone)]
pub struct NotesService {
    store: Arc<dyn NoteStore>,
    scope: Arc<dyn ScopeResolver>,
    locks: Option<CategoryLocks>,
}

impl NotesService {
    pub fn new(store: Arc<dyn NoteStore>, scope: Arc<dyn ScopeResolver>) -> Self {
        Self {
            store,
            scope,
            locks: None,
        }
    }

    /// Serialize cleanups of the same category through a shared registry.
    pub fn with_category_locks(mut self, locks: CategoryLocks) -> Self {
        self.locks = Some(locks);
        self
    }

    /// Completed notes of the scoped category, in store order.
    #[instrument(skip(self), fields(subsystem = "service", op = "list_completed"))]
    pub async fn list_completed_notes(&self) -> Result<Vec<Note>> {
        let category = self.scope.resolve().await?;
        let notes = self
            .store
            .query_notes(&NoteQuery::completed_in(category.id))
            .await?;
        debug!(
            category_id = category.id,
            result_count = notes.len(),
            "Listed completed notes"
        );
        Ok(notes)
    }

    /// Remove every completed note of the scoped category in one commit.
    ///
    /// Scope is resolved before anything is touched, so a resolution failure
    /// aborts the call with no mutation. Returns the number of removed notes;
    /// repeating the call with nothing newly completed returns zero.
    #[instrument(skip(self), fields(subsystem = "service", op = "delete_completed"))]
    pub async fn delete_completed_notes(&self) -> Result<u64> {
        let start = Instant::now();
        let category = self.scope.resolve().await?;

        let _guard = match &self.locks {
            Some(locks) => Some(locks.acquire(category.id).await),
            None => None,
        };

        let query = NoteQuery::completed_in(category.id);
        let mut tx = self.store.begin().await?;
        let ids: Vec<NoteId> = tx
            .query_notes(&query)
            .await?
            .into_iter()
            .filter(|note| note.category_id == category.id)
            .map(|note| note.id)
            .collect();
        let removed = tx.remove_notes(&ids).await?;
        tx.commit().await?;

        info!(
            category_id = category.id,
            removed_count = removed,
            duration_ms = start.elapsed().as_millis() as u64,
            "Deleted completed notes"
        );
        Ok(removed)
    }

    /// The category this execution is scoped to.
    pub async fn current_category(&self) -> Result<Arc<Category>> {
        self.scope.resolve().await
    }

    /// Direct category lookup, not gated by the scope.
    pub async fn find_category(&self, id: CategoryId) -> Result<Option<Category>> {
        self.store.find_category(id).await
    }
}
