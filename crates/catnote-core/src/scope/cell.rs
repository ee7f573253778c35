//! Execution-scoped memo cell shared by both resolvers.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Mutex;

use super::ScopePhase;
use crate::error::{Result, ScopeError};
use crate::models::Category;

enum ScopeState {
    Unresolved,
    Resolved(Arc<Category>),
    Failed(ScopeError),
}

/// Holds the first resolution outcome of one execution.
///
/// The lock is held for the whole lookup, which is what the `Resolving`
/// phase observes.
pub(crate) struct ScopeCell {
    state: Mutex<ScopeState>,
}

impl ScopeCell {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(ScopeState::Unresolved),
        }
    }

    /// Return the memoized outcome, running `resolve` only on first use.
    pub(crate) async fn get_or_resolve<F, Fut>(&self, resolve: F) -> Result<Arc<Category>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Category>>,
    {
        let mut state = self.state.lock().await;
        match &*state {
            ScopeState::Resolved(category) => return Ok(category.clone()),
            ScopeState::Failed(err) => return Err(err.clone().into()),
            ScopeState::Unresolved => {}
        }

        match resolve().await {
            Ok(category) => {
                let category = Arc::new(category);
                *state = ScopeState::Resolved(category.clone());
                Ok(category)
            }
            Err(err) => {
                *state = ScopeState::Failed(ScopeError::from_error(&err));
                Err(err)
            }
        }
    }

    pub(crate) fn phase(&self) -> ScopePhase {
        match self.state.try_lock() {
            Err(_) => ScopePhase::Resolving,
            Ok(state) => match &*state {
                ScopeState::Unresolved => ScopePhase::Unresolved,
                ScopeState::Resolved(_) => ScopePhase::Resolved,
                ScopeState::Failed(_) => ScopePhase::Failed,
            },
        }
    }
}
