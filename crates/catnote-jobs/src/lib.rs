//! # catnote-jobs
//!
//! Background job processing for catnote.
//!
//! This crate provides:
//! - Typed, fire-and-forget submission through [`JobScheduler`]
//! - A polling worker that runs each claimed job in its own task
//! - Lifecycle notifications via a broadcast channel
//! - The [`NotesCleanupJob`] unit of work
//!
//! ## Example
//!
//! ```ignore
//! use catnote_jobs::{CleanupArgs, JobScheduler, NotesCleanupJob, WorkerBuilder, WorkerConfig};
//! use catnote_db::Database;
//!
//! let db = Database::in_memory();
//! let locks = CategoryLocks::new();
//!
//! let handle = WorkerBuilder::new(&db)
//!     .with_config(WorkerConfig::from_env())
//!     .with_handler(NotesCleanupJob::new(db.notes.clone(), locks.clone()))
//!     .build()
//!     .await
//!     .start();
//!
//! let scheduler = JobScheduler::new(db.jobs.clone());
//! let job_id = scheduler
//!     .enqueue::<NotesCleanupJob>(CleanupArgs { category_id: 1 })
//!     .await?;
//!
//! handle.shutdown().await?;
//! ```

pub mod cleanup;
pub mod handler;
pub mod scheduler;
pub mod worker;

// Re-export core types
pub use catnote_core::*;

pub use cleanup::{CleanupArgs, NotesCleanupJob};
pub use handler::{JobContext, JobHandler, JobResult, NoOpHandler};
pub use scheduler::{JobScheduler, UnitOfWork};
pub use worker::{JobWorker, WorkerBuilder, WorkerConfig, WorkerEvent, WorkerHandle};

/// Default polling interval for job processing (milliseconds).
pub const DEFAULT_POLL_INTERVAL_MS: u64 = catnote_core::defaults::JOB_POLL_INTERVAL_MS;
