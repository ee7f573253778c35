//! Domain models for categories, notes, and queued jobs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// Externally assigned category identifier.
pub type CategoryId = i32;

/// Note identifier, unique within a store.
pub type NoteId = i32;

// =============================================================================
// CATEGORIES AND NOTES
// =============================================================================

/// A category and the notes it owns.
///
/// Categories are created once at bootstrap and are read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    /// Owned notes in store-native (ascending id) order.
    pub notes: Vec<Note>,
}

impl Category {
    pub fn new(id: CategoryId, name: impl Into<String>, notes: Vec<Note>) -> Self {
        Self {
            id,
            name: name.into(),
            notes,
        }
    }
}

/// A single note belonging to a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub name: String,
    /// Foreign reference to the owning category.
    pub category_id: CategoryId,
    #[serde(default)]
    pub is_completed: bool,
}

impl Note {
    /// Create an incomplete note.
    pub fn new(id: NoteId, name: impl Into<String>, category_id: CategoryId) -> Self {
        Self {
            id,
            name: name.into(),
            category_id,
            is_completed: false,
        }
    }

    /// Mark the note as completed (builder style, used by seeding).
    pub fn completed(mut self) -> Self {
        self.is_completed = true;
        self
    }
}

/// Wire shape of a note returned by the read endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteRecord {
    pub id: NoteId,
    pub name: String,
    pub category_id: CategoryId,
}

impl From<Note> for NoteRecord {
    fn from(note: Note) -> Self {
        Self {
            id: note.id,
            name: note.name,
            category_id: note.category_id,
        }
    }
}

/// Predicate for note queries. `None` fields do not filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoteQuery {
    pub category_id: Option<CategoryId>,
    pub completed: Option<bool>,
}

impl NoteQuery {
    /// Completed notes of a single category.
    pub fn completed_in(category_id: CategoryId) -> Self {
        Self {
            category_id: Some(category_id),
            completed: Some(true),
        }
    }

    /// Check a note against this predicate.
    pub fn matches(&self, note: &Note) -> bool {
        self.category_id.map_or(true, |id| note.category_id == id)
            && self.completed.map_or(true, |c| note.is_completed == c)
    }
}

// =============================================================================
// JOBS
// =============================================================================

/// Job status in the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

/// Kinds of background work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    /// Delete the completed notes of one category
    NotesCleanup,
}

impl JobType {
    /// Stable wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::NotesCleanup => "notes_cleanup",
        }
    }
}

/// Automatic retry policy attached to a unit of work at submission time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// How many times a failed job is requeued. Zero means a failure is final.
    pub max_retries: i32,
}

impl RetryPolicy {
    /// Failures are surfaced once and never reattempted.
    pub const NONE: RetryPolicy = RetryPolicy { max_retries: 0 };

    pub const fn with_max_retries(max_retries: i32) -> Self {
        Self { max_retries }
    }
}

/// A queued unit of work and its execution record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub job_type: JobType,
    pub status: JobStatus,
    /// Arguments captured by value when the job was submitted.
    pub payload: Option<JsonValue>,
    pub result: Option<JsonValue>,
    pub error_message: Option<String>,
    pub retry_count: i32,
    pub max_retries: i32,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Job {
    /// Build a fresh pending job.
    pub fn pending(job_type: JobType, payload: Option<JsonValue>, max_retries: i32) -> Self {
        Self {
            id: Uuid::now_v7(),
            job_type,
            status: JobStatus::Pending,
            payload,
            result: None,
            error_message: None,
            retry_count: 0,
            max_retries,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_note_new_is_incomplete() {
        let note = Note::new(1, "Note 1", 1);
        assert!(!note.is_completed);
        assert!(Note::new(2, "Note 2", 1).completed().is_completed);
    }

    #[test]
    fn test_note_deserialize_defaults_completion() {
        let note: Note =
            serde_json::from_value(json!({"id": 4, "name": "n", "category_id": 2})).unwrap();
        assert!(!note.is_completed);
    }

    #[test]
    fn test_note_record_drops_completion_flag() {
        let record = NoteRecord::from(Note::new(7, "Note 7", 3).completed());
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({"id": 7, "name": "Note 7", "category_id": 3})
        );
    }

    #[test]
    fn test_note_query_completed_in() {
        let query = NoteQuery::completed_in(1);
        assert!(query.matches(&Note::new(1, "a", 1).completed()));
        assert!(!query.matches(&Note::new(2, "b", 1)));
        assert!(!query.matches(&Note::new(3, "c", 2).completed()));
    }

    #[test]
    fn test_note_query_default_matches_everything() {
        let query = NoteQuery::default();
        assert!(query.matches(&Note::new(1, "a", 1)));
        assert!(query.matches(&Note::new(2, "b", 9).completed()));
    }

    #[test]
    fn test_job_type_serde_name() {
        assert_eq!(
            serde_json::to_value(JobType::NotesCleanup).unwrap(),
            json!("notes_cleanup")
        );
        assert_eq!(JobType::NotesCleanup.as_str(), "notes_cleanup");
    }

    #[test]
    fn test_retry_policy_none_is_explicit_zero() {
        assert_eq!(RetryPolicy::NONE.max_retries, 0);
        assert_eq!(RetryPolicy::with_max_retries(0), RetryPolicy::NONE);
        assert_ne!(RetryPolicy::with_max_retries(2), RetryPolicy::NONE);
    }

    #[test]
    fn test_job_pending_defaults() {
        let job = Job::pending(JobType::NotesCleanup, Some(json!({"category_id": 1})), 0);
        assert_eq!(job.status, JobStatus::Pending);
        assert_eq!(job.retry_count, 0);
        assert_eq!(job.max_retries, 0);
        assert!(job.started_at.is_none());
        assert_eq!(job.id.get_version_num(), 7);
    }
}
