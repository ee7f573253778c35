//! Structured logging conventions for catnote.
//!
//! `tracing` macros take field names as identifiers, so the vocabulary lives
//! here as documentation rather than constants. Every crate emits the same
//! names so log aggregation can query them across subsystems.
//!
//! ## Fields
//!
//! | Field | Meaning | Example values |
//! |-------|---------|----------------|
//! | `subsystem` | Subsystem originating the event | `api`, `db`, `jobs`, `scope`, `service` |
//! | `component` | Component within the subsystem | `request_resolver`, `job_resolver`, `selector`, `worker`, `queue` |
//! | `op` | Logical operation | `resolve`, `delete_completed`, `enqueue`, `cleanup` |
//! | `category_id` | Category the execution is scoped to | `1` |
//! | `job_id` | Job being processed | UUIDv7 |
//! | `job_type` | Job type wire name | `notes_cleanup` |
//! | `scope_source` | Resolver backing the execution | `request`, `job` |
//! | `duration_ms` | Wall-clock duration in milliseconds | `12` |
//! | `result_count` | Rows returned by a query | `2` |
//! | `removed_count` | Notes removed by a cleanup | `2` |
//! | `error` | Error message of a failed operation | |
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, failed job, ignored input |
//! | INFO  | Lifecycle events (startup, shutdown), operation completions |
//! | DEBUG | Decision points such as scope binding and resolution |
//! | TRACE | Per-item iteration |
