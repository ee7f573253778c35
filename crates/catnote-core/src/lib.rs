//! # catnote-core
//!
//! Core types, traits, and abstractions for catnote.
//!
//! This crate provides the domain model, the error taxonomy, the store and
//! job-queue traits, and the scope-resolution machinery that lets
//! [`NotesService`] run unchanged inside an HTTP request or a background job.

pub mod defaults;
pub mod error;
pub mod locks;
pub mod logging;
pub mod models;
pub mod scope;
pub mod service;
pub mod traits;

#[cfg(test)]
mod test_support;

// Re-export commonly used types at crate root
pub use error::{Error, Result, ScopeError};
pub use locks::CategoryLocks;
pub use models::*;
pub use scope::{
    parse_category_id, JobScopeResolver, RequestHeaders, RequestScopeResolver, ScopePhase,
    ScopeResolver, ScopeSelector, ScopeSource,
};
pub use service::NotesService;
pub use traits::*;
