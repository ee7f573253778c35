//! Scope resolution from the live request's headers.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::cell::ScopeCell;
use super::{lookup_category, RequestHeaders, ScopePhase, ScopeResolver};
use crate::error::Result;
use crate::models::Category;
use crate::traits::NoteStore;

/// Resolves the category named by the `CategoryId` request header.
pub struct RequestScopeResolver {
    store: Arc<dyn NoteStore>,
    headers: RequestHeaders,
    cell: ScopeCell,
}

impl RequestScopeResolver {
    pub fn new(store: Arc<dyn NoteStore>, headers: RequestHeaders) -> Self {
        Self {
            store,
            headers,
            cell: ScopeCell::new(),
        }
    }

    pub fn headers(&self) -> &RequestHeaders {
        &self.headers
    }

    async fn load(&self) -> Result<Category> {
        let category_id = self.headers.category_id()?;
        debug!(
            subsystem = "scope",
            component = "request_resolver",
            op = "resolve",
            category_id,
            "Resolving category from request header"
        );
        lookup_category(self.store.as_ref(), category_id).await
    }
}

#[async_trait]
impl ScopeResolver for RequestScopeResolver {
    async fn resolve(&self) -> Result<Arc<Category>> {
        self.cell.get_or_resolve(move || self.load()).await
    }

    fn phase(&self) -> ScopePhase {
        self.cell.phase()
    }
}
