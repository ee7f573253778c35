//! PostgreSQL note store.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row, Transaction};
use tracing::debug;

use catnote_core::{
    Category, CategoryId, Error, Note, NoteId, NoteQuery, NoteStore, Result, StoreTransaction,
};

const SELECT_NOTES: &str = "SELECT id, name, category_id, is_completed FROM note
     WHERE ($1::int IS NULL OR category_id = $1)
       AND ($2::bool IS NULL OR is_completed = $2)
     ORDER BY id";

/// PostgreSQL implementation of [`NoteStore`].
pub struct PgNoteStore {
    pool: Pool<Postgres>,
}

impl PgNoteStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn parse_note_row(row: PgRow) -> Note {
        Note {
            id: row.get("id"),
            name: row.get("name"),
            category_id: row.get("category_id"),
            is_completed: row.get("is_completed"),
        }
    }
}

#[async_trait]
impl NoteStore for PgNoteStore {
    async fn find_category(&self, id: CategoryId) -> Result<Option<Category>> {
        let row = sqlx::query("SELECT id, name FROM category WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let notes = self
            .query_notes(&NoteQuery {
                category_id: Some(id),
                completed: None,
            })
            .await?;
        Ok(Some(Category::new(row.get("id"), row.get::<String, _>("name"), notes)))
    }

    async fn query_notes(&self, query: &NoteQuery) -> Result<Vec<Note>> {
        let rows = sqlx::query(SELECT_NOTES)
            .bind(query.category_id)
            .bind(query.completed)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(rows.into_iter().map(Self::parse_note_row).collect())
    }

    async fn begin(&self) -> Result<Box<dyn StoreTransaction>> {
        let tx = self.pool.begin().await.map_err(Error::Database)?;
        Ok(Box::new(PgStoreTransaction { tx }))
    }

    async fn insert_category(&self, category: &Category) -> Result<()> {
        if let Some(note) = category.notes.iter().find(|n| n.category_id != category.id) {
            return Err(Error::InvalidInput(format!(
                "note {} references category {}, expected {}",
                note.id, note.category_id, category.id
            )));
        }

        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let inserted = sqlx::query(
            "INSERT INTO category (id, name) VALUES ($1, $2) ON CONFLICT (id) DO NOTHING",
        )
        .bind(category.id)
        .bind(&category.name)
        .execute(&mut *tx)
        .await
        .map_err(Error::Database)?
        .rows_affected();
        if inserted == 0 {
            return Err(Error::InvalidInput(format!(
                "category {} already exists",
                category.id
            )));
        }

        for note in &category.notes {
            let inserted = sqlx::query(
                "INSERT INTO note (id, name, category_id, is_completed)
                 VALUES ($1, $2, $3, $4) ON CONFLICT (id) DO NOTHING",
            )
            .bind(note.id)
            .bind(&note.name)
            .bind(note.category_id)
            .bind(note.is_completed)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?
            .rows_affected();
            if inserted == 0 {
                return Err(Error::InvalidInput(format!("note {} already exists", note.id)));
            }
        }

        tx.commit().await.map_err(Error::Database)?;
        debug!(
            subsystem = "db",
            component = "pg_store",
            category_id = category.id,
            note_count = category.notes.len(),
            "Inserted category"
        );
        Ok(())
    }

    async fn set_note_completed(&self, note_id: NoteId, completed: bool) -> Result<()> {
        let updated = sqlx::query("UPDATE note SET is_completed = $1 WHERE id = $2")
            .bind(completed)
            .bind(note_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?
            .rows_affected();
        if updated == 0 {
            return Err(Error::NotFound(format!("note {}", note_id)));
        }
        Ok(())
    }
}

/// Row-locking transaction; dropping it rolls back.
struct PgStoreTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl StoreTransaction for PgStoreTransaction {
    async fn query_notes(&mut self, query: &NoteQuery) -> Result<Vec<Note>> {
        let sql = format!("{} FOR UPDATE", SELECT_NOTES);
        let rows = sqlx::query(&sql)
            .bind(query.category_id)
            .bind(query.completed)
            .fetch_all(&mut *self.tx)
            .await
            .map_err(Error::Database)?;
        Ok(rows.into_iter().map(PgNoteStore::parse_note_row).collect())
    }

    async fn remove_notes(&mut self, ids: &[NoteId]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query("DELETE FROM note WHERE id = ANY($1)")
            .bind(ids.to_vec())
            .execute(&mut *self.tx)
            .await
            .map_err(Error::Database)?;
        Ok(result.rows_affected())
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        self.tx.commit().await.map_err(Error::Database)
    }
}
