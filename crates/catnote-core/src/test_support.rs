//! In-crate test double for [`NoteStore`].

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::models::*;
use crate::traits::{NoteStore, StoreTransaction};

#[derive(Default)]
struct StubState {
    categories: BTreeMap<CategoryId, String>,
    notes: BTreeMap<NoteId, Note>,
}

/// Store double that counts category lookups and can refuse commits.
pub(crate) struct StubStore {
    state: Arc<Mutex<StubState>>,
    lookups: AtomicUsize,
    fail_commit: bool,
}

impl StubStore {
    /// Category 1: notes 1 (open), 2 and 3 (completed).
    /// Category 2: notes 4 (completed), 5 (open).
    pub(crate) fn seeded() -> Self {
        let mut state = StubState::default();
        state.categories.insert(1, "Category 1".to_string());
        state.categories.insert(2, "Category 2".to_string());
        for note in [
            Note::new(1, "Note 1", 1),
            Note::new(2, "Note 2", 1).completed(),
            Note::new(3, "Note 3", 1).completed(),
            Note::new(4, "Note 4", 2).completed(),
            Note::new(5, "Note 5", 2),
        ] {
            state.notes.insert(note.id, note);
        }
        Self {
            state: Arc::new(Mutex::new(state)),
            lookups: AtomicUsize::new(0),
            fail_commit: false,
        }
    }

    pub(crate) fn failing_commit(mut self) -> Self {
        self.fail_commit = true;
        self
    }

    /// Number of `find_category` calls so far.
    pub(crate) fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub(crate) fn note_ids(&self) -> Vec<NoteId> {
        self.state.lock().unwrap().notes.keys().copied().collect()
    }
}

#[async_trait]
impl NoteStore for StubStore {
    async fn find_category(&self, id: CategoryId) -> Result<Option<Category>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let state = self.state.lock().unwrap();
        Ok(state.categories.get(&id).map(|name| {
            let notes = state
                .notes
                .values()
                .filter(|n| n.category_id == id)
                .cloned()
                .collect();
            Category::new(id, name.clone(), notes)
        }))
    }

    async fn query_notes(&self, query: &NoteQuery) -> Result<Vec<Note>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .notes
            .values()
            .filter(|n| query.matches(n))
            .cloned()
            .collect())
    }

    async fn begin(&self) -> Result<Box<dyn StoreTransaction>> {
        Ok(Box::new(StubTransaction {
            state: self.state.clone(),
            removed: Vec::new(),
            fail_commit: self.fail_commit,
        }))
    }

    async fn insert_category(&self, category: &Category) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.categories.insert(category.id, category.name.clone());
        for note in &category.notes {
            state.notes.insert(note.id, note.clone());
        }
        Ok(())
    }

    async fn set_note_completed(&self, note_id: NoteId, completed: bool) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let note = state
            .notes
            .get_mut(&note_id)
            .ok_or_else(|| Error::NotFound(format!("note {}", note_id)))?;
        note.is_completed = completed;
        Ok(())
    }
}

struct StubTransaction {
    state: Arc<Mutex<StubState>>,
    removed: Vec<NoteId>,
    fail_commit: bool,
}

#[async_trait]
impl StoreTransaction for StubTransaction {
    async fn query_notes(&mut self, query: &NoteQuery) -> Result<Vec<Note>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .notes
            .values()
            .filter(|n| query.matches(n) && !self.removed.contains(&n.id))
            .cloned()
            .collect())
    }

    async fn remove_notes(&mut self, ids: &[NoteId]) -> Result<u64> {
        let state = self.state.lock().unwrap();
        let mut count = 0;
        for id in ids {
            if state.notes.contains_key(id) && !self.removed.contains(id) {
                self.removed.push(*id);
                count += 1;
            }
        }
        Ok(count)
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        if self.fail_commit {
            return Err(Error::Persistence("commit rejected".to_string()));
        }
        let mut state = self.state.lock().unwrap();
        for id in &self.removed {
            state.notes.remove(id);
        }
        Ok(())
    }
}
