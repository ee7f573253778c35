//! Centralized default constants for catnote.
//!
//! Crates and the API server reference these constants instead of defining
//! their own magic numbers.

// =============================================================================
// SCOPE
// =============================================================================

/// Request header carrying the category identifier.
pub const CATEGORY_HEADER: &str = "CategoryId";

// =============================================================================
// JOBS
// =============================================================================

/// Worker polling interval when the queue is empty (milliseconds).
pub const JOB_POLL_INTERVAL_MS: u64 = 500;

/// Jobs claimed per worker batch.
pub const JOB_MAX_CONCURRENT: usize = 4;

/// Finished jobs kept for inspection; older ones are pruned.
pub const JOB_HISTORY_KEEP: i64 = 1000;

/// Default page size for job listings.
pub const JOB_LIST_LIMIT: i64 = 50;

/// Capacity of the worker event broadcast channel.
pub const EVENT_BUS_CAPACITY: usize = 256;

// =============================================================================
// BOOTSTRAP
// =============================================================================

/// Category created by the bootstrap seeder.
pub const SEED_CATEGORY_ID: i32 = 1;

/// Notes created in the seed category.
pub const SEED_NOTE_COUNT: i32 = 3;

// =============================================================================
// SERVER
// =============================================================================

pub const SERVER_HOST: &str = "0.0.0.0";

pub const SERVER_PORT: u16 = 3000;
