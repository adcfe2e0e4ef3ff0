//! SQLite QuestionRepository implementation.

use std::collections::HashMap;

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::{debug, instrument};

use crate::db::{
    DbResult, Entry, EntryLookup, Id, Question, QuestionRepository, ReferenceList, Step,
    StepLookup,
};

const SELECT_QUESTION: &str = "SELECT id_question, title, code, description, id_entry, id_step, \
     is_visible_multiview_global, is_visible_multiview_form_selected, column_title \
     FROM forms_question";

const SELECT_QUESTION_BY_FORM: &str = "SELECT fq.id_question, fq.title, fq.code, fq.description, \
     fq.id_entry, fq.id_step, fq.is_visible_multiview_global, \
     fq.is_visible_multiview_form_selected, fq.column_title \
     FROM forms_question fq INNER JOIN forms_step fs ON fq.id_step = fs.id_step \
     WHERE fs.id_form = ?";

/// SQLx-backed question repository.
///
/// Entries and steps are resolved through the injected lookups so the
/// repository never reads tables it does not own.
pub struct SqliteQuestionRepository<'a, E, S> {
    pub(crate) pool: &'a SqlitePool,
    pub(crate) entries: E,
    pub(crate) steps: S,
}

impl<'a, E, S> SqliteQuestionRepository<'a, E, S>
where
    E: EntryLookup,
    S: StepLookup,
{
    pub fn new(pool: &'a SqlitePool, entries: E, steps: S) -> Self {
        Self {
            pool,
            entries,
            steps,
        }
    }

    /// Attach entry and step references to freshly mapped rows.
    ///
    /// Each distinct key is looked up once per call.
    async fn hydrate(&self, mut questions: Vec<Question>) -> DbResult<Vec<Question>> {
        let mut entries: HashMap<Id, Option<Entry>> = HashMap::new();
        let mut steps: HashMap<Id, Option<Step>> = HashMap::new();

        for question in &mut questions {
            if !entries.contains_key(&question.id_entry) {
                let entry = self.entries.find_by_id(question.id_entry).await?;
                if entry.is_none() {
                    debug!(
                        id_question = question.id,
                        id_entry = question.id_entry,
                        "question references a missing entry"
                    );
                }
                entries.insert(question.id_entry, entry);
            }
            if !steps.contains_key(&question.id_step) {
                let step = self.steps.find_by_id(question.id_step).await?;
                if step.is_none() {
                    debug!(
                        id_question = question.id,
                        id_step = question.id_step,
                        "question references a missing step"
                    );
                }
                steps.insert(question.id_step, step);
            }

            question.entry = entries.get(&question.id_entry).cloned().flatten();
            question.step = steps.get(&question.id_step).cloned().flatten();
        }

        Ok(questions)
    }

    async fn fetch_hydrated(&self, rows: Vec<SqliteRow>) -> DbResult<Vec<Question>> {
        let questions = rows
            .iter()
            .map(row_to_question)
            .collect::<DbResult<Vec<_>>>()?;
        self.hydrate(questions).await
    }
}

/// Map one `forms_question` row. Works for the plain and the joined select
/// since both project the same unqualified column names.
fn row_to_question(row: &SqliteRow) -> DbResult<Question> {
    Ok(Question {
        id: row.try_get("id_question")?,
        title: row.try_get("title")?,
        code: row.try_get("code")?,
        description: row.try_get("description")?,
        id_entry: row.try_get("id_entry")?,
        id_step: row.try_get("id_step")?,
        visible_multiview_global: row.try_get("is_visible_multiview_global")?,
        visible_multiview_form_selected: row.try_get("is_visible_multiview_form_selected")?,
        column_title: row.try_get("column_title")?,
        entry: None,
        step: None,
    })
}

fn rows_to_reference_list(rows: &[SqliteRow]) -> DbResult<ReferenceList> {
    let mut list = ReferenceList::new();
    for row in rows {
        let id: Id = row.try_get("id_question")?;
        let title: String = row.try_get("title")?;
        list.add_item(id, title);
    }
    Ok(list)
}

impl<'a, E, S> QuestionRepository for SqliteQuestionRepository<'a, E, S>
where
    E: EntryLookup,
    S: StepLookup,
{
    #[instrument(skip(self, question), fields(title = %question.title))]
    async fn insert(&self, question: &Question) -> DbResult<Id> {
        let result = sqlx::query(
            r#"
            INSERT INTO forms_question (title, code, description, id_entry, id_step,
                is_visible_multiview_global, is_visible_multiview_form_selected, column_title)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&question.title)
        .bind(&question.code)
        .bind(&question.description)
        .bind(question.id_entry)
        .bind(question.id_step)
        .bind(question.visible_multiview_global)
        .bind(question.visible_multiview_form_selected)
        .bind(&question.column_title)
        .execute(self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!(id, "question inserted");
        Ok(id)
    }

    #[instrument(skip(self))]
    async fn load(&self, id: Id) -> DbResult<Option<Question>> {
        let row = sqlx::query(&format!("{} WHERE id_question = ?", SELECT_QUESTION))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        match row {
            Some(row) => Ok(self.fetch_hydrated(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    #[instrument(skip(self, question), fields(id = question.id))]
    async fn store(&self, question: &Question) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE forms_question
            SET title = ?, code = ?, description = ?, id_entry = ?, id_step = ?,
                is_visible_multiview_global = ?, is_visible_multiview_form_selected = ?,
                column_title = ?
            WHERE id_question = ?
            "#,
        )
        .bind(&question.title)
        .bind(&question.code)
        .bind(&question.description)
        .bind(question.id_entry)
        .bind(question.id_step)
        .bind(question.visible_multiview_global)
        .bind(question.visible_multiview_form_selected)
        .bind(&question.column_title)
        .bind(question.id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            debug!("store matched no row");
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Id) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM forms_question WHERE id_question = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            debug!("delete matched no row");
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn list(&self) -> DbResult<Vec<Question>> {
        let rows = sqlx::query(&format!("{} ORDER BY id_question", SELECT_QUESTION))
            .fetch_all(self.pool)
            .await?;

        self.fetch_hydrated(rows).await
    }

    #[instrument(skip(self))]
    async fn list_by_step(&self, id_step: Id) -> DbResult<Vec<Question>> {
        let rows = sqlx::query(&format!(
            "{} WHERE id_step = ? ORDER BY id_question",
            SELECT_QUESTION
        ))
        .bind(id_step)
        .fetch_all(self.pool)
        .await?;

        self.fetch_hydrated(rows).await
    }

    #[instrument(skip(self))]
    async fn list_by_form(&self, id_form: Id) -> DbResult<Vec<Question>> {
        let rows = sqlx::query(&format!("{} ORDER BY fq.id_question", SELECT_QUESTION_BY_FORM))
            .bind(id_form)
            .fetch_all(self.pool)
            .await?;

        self.fetch_hydrated(rows).await
    }

    #[instrument(skip(self))]
    async fn list_ids(&self) -> DbResult<Vec<Id>> {
        let ids: Vec<Id> =
            sqlx::query_scalar("SELECT id_question FROM forms_question ORDER BY id_question")
                .fetch_all(self.pool)
                .await?;

        Ok(ids)
    }

    #[instrument(skip(self))]
    async fn reference_list(&self) -> DbResult<ReferenceList> {
        let rows = sqlx::query("SELECT id_question, title FROM forms_question ORDER BY id_question")
            .fetch_all(self.pool)
            .await?;

        rows_to_reference_list(&rows)
    }

    #[instrument(skip(self))]
    async fn reference_list_by_form(&self, id_form: Id) -> DbResult<ReferenceList> {
        let rows = sqlx::query(
            "SELECT fq.id_question, fq.title
             FROM forms_question fq INNER JOIN forms_step fs ON fq.id_step = fs.id_step
             WHERE fs.id_form = ?
             ORDER BY fq.id_question",
        )
        .bind(id_form)
        .fetch_all(self.pool)
        .await?;

        rows_to_reference_list(&rows)
    }
}
