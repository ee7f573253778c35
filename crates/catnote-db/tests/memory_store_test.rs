//! Cross-module behavior of the in-memory backend.

use std::sync::Arc;

use catnote_db::test_fixtures::{seeded_memory_store, CategoryBuilder};
use catnote_db::{
    CategoryLocks, Database, NoteStore, NotesService, RequestHeaders, ScopeSelector,
};

fn service_for(db: &Database, category: &str) -> NotesService {
    let scope = ScopeSelector::for_request(
        db.notes.clone(),
        RequestHeaders::new().with("CategoryId", category),
    );
    NotesService::new(db.notes.clone(), Arc::new(scope))
}

#[tokio::test]
async fn test_cleanup_through_database_bundle() {
    let store = seeded_memory_store().await;
    store
        .insert_category(
            &CategoryBuilder::new(2)
                .completed_note(4)
                .open_note(5)
                .build(),
        )
        .await
        .unwrap();
    let db = Database::with_store(store.clone());

    assert_eq!(service_for(&db, "1").delete_completed_notes().await.unwrap(), 2);
    assert_eq!(store.note_count().await, 3);
    assert_eq!(
        service_for(&db, "2").list_completed_notes().await.unwrap().len(),
        1
    );
}

#[tokio::test]
async fn test_overlapping_cleanups_remove_each_note_once() {
    let store = seeded_memory_store().await;
    let db = Database::with_store(store.clone());
    let locks = CategoryLocks::new();

    let a = service_for(&db, "1").with_category_locks(locks.clone());
    let b = service_for(&db, "1").with_category_locks(locks.clone());
    let (ra, rb) = futures::join!(a.delete_completed_notes(), b.delete_completed_notes());

    assert_eq!(ra.unwrap() + rb.unwrap(), 2);
    assert_eq!(store.note_count().await, 1);
}

#[tokio::test]
async fn test_newly_completed_note_is_removed_by_next_cleanup() {
    let store = seeded_memory_store().await;
    let db = Database::with_store(store.clone());
    let service = service_for(&db, "1");

    assert_eq!(service.delete_completed_notes().await.unwrap(), 2);
    store.set_note_completed(1, true).await.unwrap();
    assert_eq!(service.delete_completed_notes().await.unwrap(), 1);
    assert_eq!(store.note_count().await, 0);
}
