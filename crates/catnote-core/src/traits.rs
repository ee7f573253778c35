//! Core traits for catnote abstractions.
//!
//! These traits define the interfaces that store and queue implementations
//! must satisfy, enabling pluggable backends and test doubles.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// NOTE STORE TRAITS
// =============================================================================

/// Record store holding categories and their notes.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Look a category up by id, including its notes.
    async fn find_category(&self, id: CategoryId) -> Result<Option<Category>>;

    /// Query notes matching a predicate, in store-native order.
    async fn query_notes(&self, query: &NoteQuery) -> Result<Vec<Note>>;

    /// Open a unit of work. Changes become visible only on commit; dropping
    /// the transaction discards them.
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>>;

    /// Insert a category together with its notes (bootstrap only).
    async fn insert_category(&self, category: &Category) -> Result<()>;

    /// Flip a note's completion flag.
    async fn set_note_completed(&self, note_id: NoteId, completed: bool) -> Result<()>;
}

/// Atomic remove-then-commit boundary over a [`NoteStore`].
#[async_trait]
pub trait StoreTransaction: Send {
    /// Query notes as seen by this transaction.
    async fn query_notes(&mut self, query: &NoteQuery) -> Result<Vec<Note>>;

    /// Stage removal of the given notes. Returns how many existed.
    async fn remove_notes(&mut self, ids: &[NoteId]) -> Result<u64>;

    /// Make staged changes visible.
    async fn commit(self: Box<Self>) -> Result<()>;
}

// =============================================================================
// JOB REPOSITORY TRAITS
// =============================================================================

/// Repository for job queue operations.
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Queue a new job with its captured arguments and retry budget.
    async fn queue(
        &self,
        job_type: JobType,
        payload: Option<JsonValue>,
        max_retries: i32,
    ) -> Result<Uuid>;

    /// Claim the next pending job whose type is in `job_types`.
    /// An empty slice means "claim any type".
    async fn claim_next_for_types(&self, job_types: &[JobType]) -> Result<Option<Job>>;

    /// Mark job as completed.
    async fn complete(&self, job_id: Uuid, result: Option<JsonValue>) -> Result<()>;

    /// Record a failure. The job goes back to pending while
    /// `retry_count < max_retries`, otherwise it is marked failed.
    async fn fail(&self, job_id: Uuid, error: &str) -> Result<()>;

    /// Get job by ID.
    async fn get(&self, job_id: Uuid) -> Result<Option<Job>>;

    /// Get pending jobs count.
    async fn pending_count(&self) -> Result<i64>;

    /// List recent jobs, newest first.
    async fn list_recent(&self, limit: i64) -> Result<Vec<Job>>;

    /// Delete finished jobs beyond the `keep_count` most recently finished.
    /// Pending and running jobs are never removed. Returns the number deleted.
    async fn cleanup(&self, keep_count: i64) -> Result<i64>;
}
