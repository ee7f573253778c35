//! Bootstrap data.

use tracing::info;

use catnote_core::defaults::{SEED_CATEGORY_ID, SEED_NOTE_COUNT};
use catnote_core::{Category, Note, NoteStore, Result};

/// The demo category inserted at startup.
///
/// Note 1 is left open; the rest are completed so a cleanup has something to
/// remove straight away.
pub fn default_category() -> Category {
    let notes = (1..=SEED_NOTE_COUNT)
        .map(|id| {
            let note = Note::new(id, format!("Note {}", id), SEED_CATEGORY_ID);
            if id == 1 {
                note
            } else {
                note.completed()
            }
        })
        .collect();
    Category::new(
        SEED_CATEGORY_ID,
        format!("Category {}", SEED_CATEGORY_ID),
        notes,
    )
}

/// Insert [`default_category`] unless it already exists.
///
/// Returns `true` when data was inserted.
pub async fn seed_default(store: &dyn NoteStore) -> Result<bool> {
    if store.find_category(SEED_CATEGORY_ID).await?.is_some() {
        info!(
            subsystem = "db",
            component = "seed",
            category_id = SEED_CATEGORY_ID,
            "Seed category already present, skipping"
        );
        return Ok(false);
    }

    let category = default_category();
    store.insert_category(&category).await?;
    info!(
        subsystem = "db",
        component = "seed",
        category_id = category.id,
        note_count = category.notes.len(),
        "Seeded default category"
    );
    Ok(true)
}
