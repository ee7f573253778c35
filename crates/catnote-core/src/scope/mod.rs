//! Category scope resolution.
//!
//! Every execution (one HTTP request, or one background job run) works on a
//! single category. The same business logic discovers that category from two
//! different places:
//!
//! - [`RequestScopeResolver`] reads the `CategoryId` header of the live request.
//! - [`JobScopeResolver`] uses an id pushed in explicitly by the job before it
//!   calls into the service, since no request exists.
//!
//! [`ScopeSelector`] owns one of each per execution and binds to the right one
//! the first time a consumer asks for the scope. Consumers only see the
//! [`ScopeResolver`] trait.
//!
//! Resolution is memoized per execution and its first outcome is terminal:
//!
//! ```text
//! Unresolved -> Resolving -> Resolved
//!                        \-> Failed
//! ```
//!
//! Resolver instances are never shared between executions, so the memo cell
//! only guards against re-entrancy inside one execution.

mod cell;
mod headers;
mod job;
mod request;
mod selector;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{Result, ScopeError};
use crate::models::{Category, CategoryId};
use crate::traits::NoteStore;

pub use headers::{parse_category_id, RequestHeaders};
pub use job::JobScopeResolver;
pub use request::RequestScopeResolver;
pub use selector::{ScopeSelector, ScopeSource};

/// Resolution progress of a single execution's scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopePhase {
    Unresolved,
    Resolving,
    Resolved,
    Failed,
}

/// Capability to answer "which category is this execution working on?".
#[async_trait]
pub trait ScopeResolver: Send + Sync {
    /// Resolve the execution's category. Repeated calls return the same
    /// `Arc` (or the same error) without touching the store again.
    async fn resolve(&self) -> Result<Arc<Category>>;

    /// Current resolution phase.
    fn phase(&self) -> ScopePhase;
}

/// Fetch a category or fail with [`ScopeError::UnknownCategory`].
async fn lookup_category(store: &dyn NoteStore, id: CategoryId) -> Result<Category> {
    store
        .find_category(id)
        .await?
        .ok_or_else(|| ScopeError::UnknownCategory(id).into())
}
