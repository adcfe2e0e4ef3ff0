//! Tests for SqliteQuestionRepository.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use sqlx::SqlitePool;

use crate::db::{
    Database, DbError, DbResult, Entry, EntryLookup, Id, Question, QuestionRepository,
    SqliteDatabase, SqliteQuestionRepository, Step, StepLookup,
};

async fn setup_db() -> SqliteDatabase {
    let db = SqliteDatabase::in_memory()
        .await
        .expect("Failed to create in-memory database");
    db.migrate().await.expect("Migration should succeed");
    db
}

async fn seed_entry(pool: &SqlitePool, id: Id, title: &str) {
    sqlx::query(
        "INSERT INTO genericatt_entry (id_entry, title, code, entry_type) VALUES (?, ?, ?, 'text')",
    )
    .bind(id)
    .bind(title)
    .bind(title.to_lowercase())
    .execute(pool)
    .await
    .expect("Failed to seed entry");
}

async fn seed_step(pool: &SqlitePool, id: Id, id_form: Id) {
    sqlx::query("INSERT INTO forms_step (id_step, title, id_form) VALUES (?, ?, ?)")
        .bind(id)
        .bind(format!("Step {}", id))
        .bind(id_form)
        .execute(pool)
        .await
        .expect("Failed to seed step");
}

fn make_question(title: &str, id_entry: Id, id_step: Id) -> Question {
    Question {
        description: format!("About {}", title),
        column_title: format!("col_{}", title),
        ..Question::new(title, format!("code_{}", title), id_entry, id_step)
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn question_insert_load_delete() {
    let db = setup_db().await;
    seed_entry(db.pool(), 5, "Name").await;
    seed_step(db.pool(), 10, 1).await;
    let questions = db.questions();

    let question = Question {
        column_title: "col".to_string(),
        ..Question::new("Q1", "C1", 5, 10)
    };
    let id = questions.insert(&question).await.expect("Insert should succeed");
    assert!(id > 0);

    let loaded = questions
        .load(id)
        .await
        .expect("Load should succeed")
        .expect("Question should exist");
    assert_eq!(loaded.title, "Q1");
    assert!(loaded.same_row(&Question { id, ..question }));

    questions.delete(id).await.expect("Delete should succeed");
    let gone = questions.load(id).await.expect("Load should succeed");
    assert!(gone.is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn question_insert_assigns_distinct_ids() {
    let db = setup_db().await;
    let questions = db.questions();

    let first = questions.insert(&make_question("a", 1, 1)).await.unwrap();
    let second = questions.insert(&make_question("b", 1, 1)).await.unwrap();
    assert_ne!(first, second);
}

#[tokio::test(flavor = "multi_thread")]
async fn question_insert_ignores_input_id() {
    let db = setup_db().await;
    let questions = db.questions();

    let mut question = make_question("preset", 1, 1);
    question.id = 999;
    let id = questions.insert(&question).await.unwrap();
    assert_ne!(id, 999);
    assert!(questions.load(999).await.unwrap().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn question_load_hydrates_references() {
    let db = setup_db().await;
    seed_entry(db.pool(), 5, "Email").await;
    seed_step(db.pool(), 10, 3).await;
    let questions = db.questions();

    let id = questions.insert(&make_question("email", 5, 10)).await.unwrap();
    let loaded = questions.load(id).await.unwrap().expect("Question should exist");

    let entry = loaded.entry.expect("Entry should be hydrated");
    assert_eq!(entry.id, 5);
    assert_eq!(entry.title, "Email");
    let step = loaded.step.expect("Step should be hydrated");
    assert_eq!(step.id, 10);
    assert_eq!(step.id_form, 3);
}

#[tokio::test(flavor = "multi_thread")]
async fn question_load_with_dangling_references_leaves_them_empty() {
    let db = setup_db().await;
    let questions = db.questions();

    let id = questions.insert(&make_question("orphan", 77, 88)).await.unwrap();
    let loaded = questions.load(id).await.unwrap().expect("Question should exist");
    assert_eq!(loaded.id_entry, 77);
    assert_eq!(loaded.id_step, 88);
    assert!(loaded.entry.is_none());
    assert!(loaded.step.is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn question_load_missing_returns_none() {
    let db = setup_db().await;
    let loaded = db.questions().load(12345).await.expect("Load should succeed");
    assert!(loaded.is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn question_store_overwrites_all_fields() {
    let db = setup_db().await;
    seed_step(db.pool(), 20, 2).await;
    let questions = db.questions();

    let id = questions.insert(&make_question("before", 1, 1)).await.unwrap();

    let updated = Question {
        id,
        title: "after".to_string(),
        code: "new_code".to_string(),
        description: "new description".to_string(),
        id_entry: 2,
        id_step: 20,
        visible_multiview_global: true,
        visible_multiview_form_selected: true,
        column_title: "new column".to_string(),
        entry: None,
        step: None,
    };
    questions.store(&updated).await.expect("Store should succeed");

    let loaded = questions.load(id).await.unwrap().expect("Question should exist");
    assert!(loaded.same_row(&updated));
    assert_eq!(loaded.step.map(|s| s.id_form), Some(2));
}

#[tokio::test(flavor = "multi_thread")]
async fn question_store_missing_id_is_noop() {
    let db = setup_db().await;
    let questions = db.questions();
    let existing = questions.insert(&make_question("kept", 1, 1)).await.unwrap();

    let mut ghost = make_question("ghost", 1, 1);
    ghost.id = existing + 100;
    questions.store(&ghost).await.expect("Store should not fail");

    assert!(questions.load(ghost.id).await.unwrap().is_none());
    let kept = questions.load(existing).await.unwrap().unwrap();
    assert_eq!(kept.title, "kept");
    assert_eq!(questions.list_ids().await.unwrap(), vec![existing]);
}

#[tokio::test(flavor = "multi_thread")]
async fn question_delete_missing_id_is_noop() {
    let db = setup_db().await;
    let questions = db.questions();
    let id = questions.insert(&make_question("stay", 1, 1)).await.unwrap();

    questions.delete(id + 1).await.expect("Delete should not fail");
    assert_eq!(questions.list_ids().await.unwrap(), vec![id]);
}

#[tokio::test(flavor = "multi_thread")]
async fn question_list_returns_all_rows() {
    let db = setup_db().await;
    let questions = db.questions();

    assert!(questions.list().await.unwrap().is_empty());

    let a = questions.insert(&make_question("a", 1, 1)).await.unwrap();
    let b = questions.insert(&make_question("b", 1, 2)).await.unwrap();
    let c = questions.insert(&make_question("c", 2, 2)).await.unwrap();

    let mut ids: Vec<Id> = questions.list().await.unwrap().iter().map(|q| q.id).collect();
    ids.sort();
    assert_eq!(ids, vec![a, b, c]);
}

#[tokio::test(flavor = "multi_thread")]
async fn question_list_by_step_is_subset_of_list() {
    let db = setup_db().await;
    seed_step(db.pool(), 1, 1).await;
    seed_step(db.pool(), 2, 1).await;
    let questions = db.questions();

    questions.insert(&make_question("a", 1, 1)).await.unwrap();
    questions.insert(&make_question("b", 1, 2)).await.unwrap();
    questions.insert(&make_question("c", 1, 2)).await.unwrap();

    let all = questions.list().await.unwrap();
    let by_step = questions.list_by_step(2).await.unwrap();

    let expected: Vec<&Question> = all.iter().filter(|q| q.id_step == 2).collect();
    assert_eq!(by_step.len(), expected.len());
    for (got, want) in by_step.iter().zip(expected) {
        assert_eq!(got, want);
        assert_eq!(got.step.as_ref().map(|s| s.id), Some(2));
    }

    assert!(questions.list_by_step(99).await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn question_list_by_form_follows_step_form() {
    let db = setup_db().await;
    seed_step(db.pool(), 1, 100).await;
    seed_step(db.pool(), 2, 100).await;
    seed_step(db.pool(), 3, 200).await;
    let questions = db.questions();

    let a = questions.insert(&make_question("a", 1, 1)).await.unwrap();
    let b = questions.insert(&make_question("b", 1, 2)).await.unwrap();
    let c = questions.insert(&make_question("c", 1, 3)).await.unwrap();
    // Step 4 does not exist, so this question belongs to no form.
    questions.insert(&make_question("d", 1, 4)).await.unwrap();

    let form_100: Vec<Id> = questions
        .list_by_form(100)
        .await
        .unwrap()
        .iter()
        .map(|q| q.id)
        .collect();
    assert_eq!(form_100, vec![a, b]);

    let form_200 = questions.list_by_form(200).await.unwrap();
    assert_eq!(form_200.len(), 1);
    assert_eq!(form_200[0].id, c);
    assert_eq!(form_200[0].step.as_ref().map(|s| s.id_form), Some(200));

    assert!(questions.list_by_form(300).await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn question_list_ids_projection() {
    let db = setup_db().await;
    let questions = db.questions();

    assert!(questions.list_ids().await.unwrap().is_empty());

    let a = questions.insert(&make_question("a", 1, 1)).await.unwrap();
    let b = questions.insert(&make_question("b", 1, 1)).await.unwrap();
    assert_eq!(questions.list_ids().await.unwrap(), vec![a, b]);
}

#[tokio::test(flavor = "multi_thread")]
async fn question_reference_lists_pair_id_with_title() {
    let db = setup_db().await;
    seed_step(db.pool(), 1, 7).await;
    seed_step(db.pool(), 2, 8).await;
    let questions = db.questions();

    let a = questions.insert(&make_question("Alpha", 1, 1)).await.unwrap();
    let b = questions.insert(&make_question("Beta", 1, 2)).await.unwrap();

    let all = questions.reference_list().await.unwrap();
    let pairs: Vec<(Id, &str)> = all
        .items()
        .iter()
        .map(|item| (item.id, item.label.as_str()))
        .collect();
    assert_eq!(pairs, vec![(a, "Alpha"), (b, "Beta")]);

    let form_8 = questions.reference_list_by_form(8).await.unwrap();
    assert_eq!(form_8.len(), 1);
    assert_eq!(form_8.items()[0].id, b);
    assert_eq!(form_8.items()[0].label, "Beta");

    assert!(questions.reference_list_by_form(9).await.unwrap().is_empty());
}

// =============================================================================
// Injected lookups
// =============================================================================

#[derive(Default)]
struct FakeEntries {
    entries: HashMap<Id, Entry>,
    calls: AtomicUsize,
}

impl EntryLookup for FakeEntries {
    async fn find_by_id(&self, id: Id) -> DbResult<Option<Entry>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.entries.get(&id).cloned())
    }
}

#[derive(Default)]
struct FakeSteps {
    steps: HashMap<Id, Step>,
    calls: AtomicUsize,
}

impl StepLookup for FakeSteps {
    async fn find_by_id(&self, id: Id) -> DbResult<Option<Step>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.steps.get(&id).cloned())
    }
}

struct FailingSteps;

impl StepLookup for FailingSteps {
    async fn find_by_id(&self, _id: Id) -> DbResult<Option<Step>> {
        Err(DbError::Connection {
            message: "step service unavailable".to_string(),
        })
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn question_repository_uses_injected_lookups() {
    let db = setup_db().await;

    let mut entries = FakeEntries::default();
    entries.entries.insert(
        5,
        Entry {
            id: 5,
            title: "From fake".to_string(),
            ..Default::default()
        },
    );
    let mut steps = FakeSteps::default();
    steps.steps.insert(
        10,
        Step {
            id: 10,
            id_form: 42,
            ..Default::default()
        },
    );

    let questions = SqliteQuestionRepository::new(db.pool(), entries, steps);
    let id = questions.insert(&make_question("q", 5, 10)).await.unwrap();

    let loaded = questions.load(id).await.unwrap().unwrap();
    assert_eq!(loaded.entry.map(|e| e.title), Some("From fake".to_string()));
    assert_eq!(loaded.step.map(|s| s.id_form), Some(42));
}

#[tokio::test(flavor = "multi_thread")]
async fn question_list_looks_up_each_reference_once() {
    let db = setup_db().await;
    let questions =
        SqliteQuestionRepository::new(db.pool(), FakeEntries::default(), FakeSteps::default());

    for title in ["a", "b", "c", "d"] {
        questions.insert(&make_question(title, 1, 2)).await.unwrap();
    }
    questions.insert(&make_question("e", 3, 2)).await.unwrap();

    let listed = questions.list().await.unwrap();
    assert_eq!(listed.len(), 5);
    assert_eq!(questions.entries.calls.load(Ordering::SeqCst), 2);
    assert_eq!(questions.steps.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn question_lookup_failure_fails_the_read() {
    let db = setup_db().await;
    let questions = SqliteQuestionRepository::new(db.pool(), FakeEntries::default(), FailingSteps);

    let id = questions.insert(&make_question("q", 1, 1)).await.unwrap();

    let result = questions.load(id).await;
    assert!(matches!(result, Err(DbError::Connection { .. })));
    // Projections never hydrate, so they are unaffected.
    assert_eq!(questions.list_ids().await.unwrap(), vec![id]);
}
