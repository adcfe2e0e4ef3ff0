//! SQLite StepLookup implementation.

use sqlx::{Row, SqlitePool};

use crate::db::{DbResult, Id, Step, StepLookup};

/// Read-only finder over `forms_step`.
pub struct SqliteStepLookup<'a> {
    pub(crate) pool: &'a SqlitePool,
}

impl<'a> SqliteStepLookup<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }
}

impl<'a> StepLookup for SqliteStepLookup<'a> {
    async fn find_by_id(&self, id: Id) -> DbResult<Option<Step>> {
        let row = sqlx::query(
            "SELECT id_step, title, description, id_form, is_initial, is_final
             FROM forms_step WHERE id_step = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|row| Step {
            id: row.get("id_step"),
            title: row.get("title"),
            description: row.get("description"),
            id_form: row.get("id_form"),
            initial: row.get("is_initial"),
            final_step: row.get("is_final"),
        }))
    }
}
