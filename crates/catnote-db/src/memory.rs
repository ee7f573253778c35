//! In-memory note store.
//!
//! The default backend when no `DATABASE_URL` is configured. Data lives for the
//! lifetime of the process.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{OwnedRwLockWriteGuard, RwLock};
use tracing::debug;

use catnote_core::{
    Category, CategoryId, Error, Note, NoteId, NoteQuery, NoteStore, Result, StoreTransaction,
};

#[derive(Debug, Default)]
struct MemoryState {
    categories: BTreeMap<CategoryId, String>,
    notes: BTreeMap<NoteId, Note>,
}

impl MemoryState {
    fn matching(&self, query: &NoteQuery) -> impl Iterator<Item = &Note> + '_ {
        let query = *query;
        self.notes.values().filter(move |note| query.matches(note))
    }
}

/// Process-local implementation of [`NoteStore`].
///
/// A transaction holds the write lock from `begin` until it is committed or
/// dropped, so readers never observe a half-applied cleanup.
#[derive(Clone, Default)]
pub struct MemoryNoteStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total notes currently stored.
    pub async fn note_count(&self) -> usize {
        self.state.read().await.notes.len()
    }
}

#[async_trait]
impl NoteStore for MemoryNoteStore {
    async fn find_category(&self, id: CategoryId) -> Result<Option<Category>> {
        let state = self.state.read().await;
        Ok(state.categories.get(&id).map(|name| {
            let notes = state
                .matching(&NoteQuery {
                    category_id: Some(id),
                    completed: None,
                })
                .cloned()
                .collect();
            Category::new(id, name.clone(), notes)
        }))
    }

    async fn query_notes(&self, query: &NoteQuery) -> Result<Vec<Note>> {
        let state = self.state.read().await;
        Ok(state.matching(query).cloned().collect())
    }

    async fn begin(&self) -> Result<Box<dyn StoreTransaction>> {
        let guard = self.state.clone().write_owned().await;
        Ok(Box::new(MemoryTransaction {
            guard,
            removed: BTreeSet::new(),
        }))
    }

    async fn insert_category(&self, category: &Category) -> Result<()> {
        let mut state = self.state.write().await;

        if state.categories.contains_key(&category.id) {
            return Err(Error::InvalidInput(format!(
                "category {} already exists",
                category.id
            )));
        }
        for note in &category.notes {
            if note.category_id != category.id {
                return Err(Error::InvalidInput(format!(
                    "note {} references category {}, expected {}",
                    note.id, note.category_id, category.id
                )));
            }
            if state.notes.contains_key(&note.id) {
                return Err(Error::InvalidInput(format!(
                    "note {} already exists",
                    note.id
                )));
            }
        }

        state.categories.insert(category.id, category.name.clone());
        for note in &category.notes {
            state.notes.insert(note.id, note.clone());
        }
        debug!(
            subsystem = "db",
            component = "memory_store",
            category_id = category.id,
            note_count = category.notes.len(),
            "Inserted category"
        );
        Ok(())
    }

    async fn set_note_completed(&self, note_id: NoteId, completed: bool) -> Result<()> {
        let mut state = self.state.write().await;
        let note = state
            .notes
            .get_mut(&note_id)
            .ok_or_else(|| Error::NotFound(format!("note {}", note_id)))?;
        note.is_completed = completed;
        Ok(())
    }
}

/// Staged removals applied on commit under the store's write lock.
struct MemoryTransaction {
    guard: OwnedRwLockWriteGuard<MemoryState>,
    removed: BTreeSet<NoteId>,
}

#[async_trait]
impl StoreTransaction for MemoryTransaction {
    async fn query_notes(&mut self, query: &NoteQuery) -> Result<Vec<Note>> {
        Ok(self
            .guard
            .matching(query)
            .filter(|note| !self.removed.contains(&note.id))
            .cloned()
            .collect())
    }

    async fn remove_notes(&mut self, ids: &[NoteId]) -> Result<u64> {
        let mut count = 0;
        for id in ids {
            if self.guard.notes.contains_key(id) && self.removed.insert(*id) {
                count += 1;
            }
        }
        Ok(count)
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let MemoryTransaction { mut guard, removed } = *self;
        for id in &removed {
            guard.notes.remove(id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    async fn seeded() -> MemoryNoteStore {
        let store = MemoryNoteStore::new();
        store
            .insert_category(&Category::new(
                1,
                "Category 1",
                vec![
                    Note::new(1, "Note 1", 1),
                    Note::new(2, "Note 2", 1).completed(),
                    Note::new(3, "Note 3", 1).completed(),
                ],
            ))
            .await
            .unwrap();
        store
            .insert_category(&Category::new(
                2,
                "Category 2",
                vec![Note::new(4, "Note 4", 2).completed()],
            ))
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_find_category_includes_notes_in_id_order() {
        let store = seeded().await;
        let category = store.find_category(1).await.unwrap().unwrap();

        assert_eq!(category.name, "Category 1");
        let ids: Vec<_> = category.notes.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(store.find_category(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_query_notes_by_predicate() {
        let store = seeded().await;

        let completed = store.query_notes(&NoteQuery::completed_in(1)).await.unwrap();
        assert_eq!(completed.iter().map(|n| n.id).collect::<Vec<_>>(), vec![2, 3]);

        let everything = store.query_notes(&NoteQuery::default()).await.unwrap();
        assert_eq!(everything.len(), 4);
    }

    #[tokio::test]
    async fn test_transaction_applies_only_on_commit() {
        let store = seeded().await;

        {
            let mut tx = store.begin().await.unwrap();
            assert_eq!(tx.remove_notes(&[2, 3]).await.unwrap(), 2);
            assert!(tx
                .query_notes(&NoteQuery::completed_in(1))
                .await
                .unwrap()
                .is_empty());
            // dropped without commit
        }
        assert_eq!(store.note_count().await, 4);

        let mut tx = store.begin().await.unwrap();
        tx.remove_notes(&[2, 3]).await.unwrap();
        tx.commit().await.unwrap();
        assert_eq!(store.note_count().await, 2);
    }

    #[tokio::test]
    async fn test_remove_counts_only_existing_notes_once() {
        let store = seeded().await;
        let mut tx = store.begin().await.unwrap();

        assert_eq!(tx.remove_notes(&[2, 2, 999]).await.unwrap(), 1);
        assert_eq!(tx.remove_notes(&[2]).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_readers_wait_for_open_transaction() {
        let store = seeded().await;
        let mut tx = store.begin().await.unwrap();
        tx.remove_notes(&[2, 3]).await.unwrap();

        let reader = {
            let store = store.clone();
            tokio::spawn(async move { store.query_notes(&NoteQuery::completed_in(1)).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!reader.is_finished());

        tx.commit().await.unwrap();
        let seen = reader.await.unwrap().unwrap();
        assert!(seen.is_empty());
    }

    #[tokio::test]
    async fn test_insert_category_rejects_foreign_notes() {
        let store = MemoryNoteStore::new();
        let err = store
            .insert_category(&Category::new(1, "Category 1", vec![Note::new(1, "n", 2)]))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(store.find_category(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_category_rejects_duplicates() {
        let store = seeded().await;

        let dup_category = store
            .insert_category(&Category::new(1, "again", vec![]))
            .await;
        assert!(matches!(dup_category, Err(Error::InvalidInput(_))));

        let dup_note = store
            .insert_category(&Category::new(3, "Category 3", vec![Note::new(1, "n", 3)]))
            .await;
        assert!(matches!(dup_note, Err(Error::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_set_note_completed() {
        let store = seeded().await;
        store.set_note_completed(1, true).await.unwrap();

        let completed = store.query_notes(&NoteQuery::completed_in(1)).await.unwrap();
        assert_eq!(completed.len(), 3);

        let missing = store.set_note_completed(999, true).await;
        assert!(matches!(missing, Err(Error::NotFound(_))));
    }
}
