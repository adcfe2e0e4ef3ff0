//! Repository traits for data access abstraction.
//!
//! These traits define the contract for data access, allowing different
//! storage backends to be swapped without changing business logic.

use crate::db::{
    DbResult,
    models::{Entry, Id, Question, ReferenceList, Step},
};

/// Finder for entries owned by the generic-attribute subsystem.
#[allow(async_fn_in_trait)]
pub trait EntryLookup {
    /// Get an entry by ID, or `None` if it does not exist.
    async fn find_by_id(&self, id: Id) -> DbResult<Option<Entry>>;
}

/// Finder for form steps owned by the step subsystem.
#[allow(async_fn_in_trait)]
pub trait StepLookup {
    /// Get a step by ID, or `None` if it does not exist.
    async fn find_by_id(&self, id: Id) -> DbResult<Option<Step>>;
}

/// Repository for Question operations.
///
/// Read operations return questions with `entry` and `step` hydrated through
/// the injected lookups.
#[allow(async_fn_in_trait)]
pub trait QuestionRepository {
    /// Insert a question and return the id assigned by the store.
    async fn insert(&self, question: &Question) -> DbResult<Id>;

    /// Get a question by ID. Absence is `Ok(None)`, not an error.
    async fn load(&self, id: Id) -> DbResult<Option<Question>>;

    /// Overwrite every column of the row keyed by `question.id`.
    ///
    /// Does nothing if no row has that id.
    async fn store(&self, question: &Question) -> DbResult<()>;

    /// Delete a question by ID. Does nothing if it does not exist.
    async fn delete(&self, id: Id) -> DbResult<()>;

    /// Get all questions.
    async fn list(&self) -> DbResult<Vec<Question>>;

    /// Get all questions of a step.
    async fn list_by_step(&self, id_step: Id) -> DbResult<Vec<Question>>;

    /// Get all questions whose step belongs to the given form.
    async fn list_by_form(&self, id_form: Id) -> DbResult<Vec<Question>>;

    /// Get the ids of all questions.
    async fn list_ids(&self) -> DbResult<Vec<Id>>;

    /// Get `(id, title)` pairs for all questions.
    async fn reference_list(&self) -> DbResult<ReferenceList>;

    /// Get `(id, title)` pairs for the questions of a form.
    async fn reference_list_by_form(&self, id_form: Id) -> DbResult<ReferenceList>;
}

/// Combined database interface.
#[allow(async_fn_in_trait)]
pub trait Database: Send + Sync {
    type Entries<'a>: EntryLookup
    where
        Self: 'a;
    type Steps<'a>: StepLookup
    where
        Self: 'a;
    type Questions<'a>: QuestionRepository
    where
        Self: 'a;

    /// Run pending migrations.
    async fn migrate(&self) -> DbResult<()>;

    /// Get the entry lookup.
    fn entries(&self) -> Self::Entries<'_>;

    /// Get the step lookup.
    fn steps(&self) -> Self::Steps<'_>;

    /// Get the question repository, wired to this database's lookups.
    fn questions(&self) -> Self::Questions<'_>;
}
