//! SQLite EntryLookup implementation.

use sqlx::{Row, SqlitePool};

use crate::db::{DbResult, Entry, EntryLookup, Id};

/// Read-only finder over the generic-attribute entry table.
pub struct SqliteEntryLookup<'a> {
    pub(crate) pool: &'a SqlitePool,
}

impl<'a> SqliteEntryLookup<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }
}

impl<'a> EntryLookup for SqliteEntryLookup<'a> {
    async fn find_by_id(&self, id: Id) -> DbResult<Option<Entry>> {
        let row = sqlx::query(
            "SELECT id_entry, title, code, entry_type FROM genericatt_entry WHERE id_entry = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|row| Entry {
            id: row.get("id_entry"),
            title: row.get("title"),
            code: row.get("code"),
            entry_type: row.get("entry_type"),
        }))
    }
}
