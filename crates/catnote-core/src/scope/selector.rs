//! Per-execution choice between request-backed and job-backed resolution.

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use tracing::debug;

use super::{JobScopeResolver, RequestHeaders, RequestScopeResolver, ScopePhase, ScopeResolver};
use crate::error::Result;
use crate::models::Category;
use crate::traits::NoteStore;

/// Which resolver an execution is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeSource {
    Request,
    Job,
}

impl ScopeSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScopeSource::Request => "request",
            ScopeSource::Job => "job",
        }
    }
}

/// The scope capability handed to business logic for one execution.
///
/// Owns a [`RequestScopeResolver`] when a live request exists and always owns
/// a [`JobScopeResolver`]. The binding is decided once, at the first
/// [`resolve`](ScopeResolver::resolve), and never re-evaluated.
pub struct ScopeSelector {
    request: Option<RequestScopeResolver>,
    job: JobScopeResolver,
    source: OnceLock<ScopeSource>,
}

impl ScopeSelector {
    /// Build a selector, with `request` set when the execution is an inbound request.
    pub fn new(store: Arc<dyn NoteStore>, request: Option<RequestHeaders>) -> Self {
        Self {
            request: request.map(|headers| RequestScopeResolver::new(store.clone(), headers)),
            job: JobScopeResolver::new(store),
            source: OnceLock::new(),
        }
    }

    /// Selector for an inbound request.
    pub fn for_request(store: Arc<dyn NoteStore>, headers: RequestHeaders) -> Self {
        Self::new(store, Some(headers))
    }

    /// Selector for an execution with no request, such as a background job.
    pub fn detached(store: Arc<dyn NoteStore>) -> Self {
        Self::new(store, None)
    }

    /// The explicit-input resolver of this execution.
    pub fn job_scope(&self) -> &JobScopeResolver {
        &self.job
    }

    /// The binding, once decided.
    pub fn source(&self) -> Option<ScopeSource> {
        self.source.get().copied()
    }

    fn bind(&self) -> ScopeSource {
        *self.source.get_or_init(|| {
            let source = if self.request.is_some() {
                ScopeSource::Request
            } else {
                ScopeSource::Job
            };
            debug!(
                subsystem = "scope",
                component = "selector",
                scope_source = source.as_str(),
                "Bound scope resolver"
            );
            source
        })
    }
}

#[async_trait]
impl ScopeResolver for ScopeSelector {
    async fn resolve(&self) -> Result<Arc<Category>> {
        match (self.bind(), &self.request) {
            (ScopeSource::Request, Some(request)) => request.resolve().await,
            _ => self.job.resolve().await,
        }
    }

    fn phase(&self) -> ScopePhase {
        match (self.source(), &self.request) {
            (None, _) => ScopePhase::Unresolved,
            (Some(ScopeSource::Request), Some(request)) => request.phase(),
            _ => self.job.phase(),
        }
    }
}
