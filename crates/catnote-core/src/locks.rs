//! Per-category mutual exclusion for cleanups.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::models::CategoryId;

/// Registry handing out one async mutex per category.
///
/// Two cleanups of the same category run one after the other; cleanups of
/// different categories never wait on each other. Cloning shares the registry.
#[derive(Clone, Default)]
pub struct CategoryLocks {
    inner: Arc<Mutex<HashMap<CategoryId, Arc<AsyncMutex<()>>>>>,
}

impl CategoryLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `category_id`.
    pub async fn acquire(&self, category_id: CategoryId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = match self.inner.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            locks.entry(category_id).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Number of categories that have been locked at least once.
    pub fn len(&self) -> usize {
        self.inner.lock().map(|locks| locks.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
