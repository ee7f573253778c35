//! # catnote-db
//!
//! Storage layer for catnote.
//!
//! This crate provides:
//! - An in-memory note store (the default backend)
//! - A PostgreSQL note store on `sqlx`
//! - The in-process job queue
//! - Connection pool management and bootstrap seeding
//!
//! ## Example
//!
//! ```rust,ignore
//! use catnote_db::{seed, Database};
//!
//! let db = match std::env::var("DATABASE_URL") {
//!     Ok(url) => Database::connect(&url).await?,
//!     Err(_) => Database::in_memory(),
//! };
//! seed::seed_default(db.notes.as_ref()).await?;
//! ```

pub mod jobs;
pub mod memory;
pub mod notes;
pub mod pool;
pub mod seed;

// Always compiled so integration tests (in tests/) and downstream crates can use it
pub mod test_fixtures;

// Re-export core types
pub use catnote_core::*;

pub use jobs::MemoryJobRepository;
pub use memory::MemoryNoteStore;
pub use notes::PgNoteStore;
pub use pool::{create_pool, create_pool_with_config, log_pool_metrics, PoolConfig};

use std::sync::Arc;

use sqlx::{Pool, Postgres};

/// Store and queue collaborators shared by the API and the worker.
#[derive(Clone)]
pub struct Database {
    /// Category and note records.
    pub notes: Arc<dyn NoteStore>,
    /// Background job queue. Always in-process.
    pub jobs: Arc<MemoryJobRepository>,
    /// Connection pool when backed by PostgreSQL.
    pool: Option<Pool<Postgres>>,
}

impl Database {
    /// Create a Database backed by PostgreSQL.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            notes: Arc::new(PgNoteStore::new(pool.clone())),
            jobs: Arc::new(MemoryJobRepository::new()),
            pool: Some(pool),
        }
    }

    /// Create a Database that lives entirely in process memory.
    pub fn in_memory() -> Self {
        Self::with_store(Arc::new(MemoryNoteStore::new()))
    }

    /// Wrap an arbitrary note store (used by tests).
    pub fn with_store(notes: Arc<dyn NoteStore>) -> Self {
        Self {
            notes,
            jobs: Arc::new(MemoryJobRepository::new()),
            pool: None,
        }
    }

    /// Connect to PostgreSQL at the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Connect with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations. A no-op for the in-memory backend.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        let Some(pool) = &self.pool else {
            return Ok(());
        };
        sqlx::migrate!("../../migrations")
            .run(pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        tracing::info!(subsystem = "db", op = "migrate", "Migrations applied");
        Ok(())
    }

    /// Get the underlying connection pool, if any.
    pub fn pool(&self) -> Option<&Pool<Postgres>> {
        self.pool.as_ref()
    }

    /// Short backend label for logs and health output.
    pub fn backend(&self) -> &'static str {
        if self.pool.is_some() {
            "postgres"
        } else {
            "memory"
        }
    }

    /// Log pool health when backed by PostgreSQL.
    pub fn log_metrics(&self) {
        if let Some(pool) = &self.pool {
            log_pool_metrics(pool);
        }
    }
}
