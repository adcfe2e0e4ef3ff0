//! Tests for database error types.

use crate::db::{DbError, DbResult};

#[test]
fn not_found_error_displays_correctly() {
    let err = DbError::not_found("Question", 42);
    assert_eq!(err.to_string(), "Entity not found: Question with id '42'");
}

#[test]
fn validation_error_displays_correctly() {
    let err = DbError::Validation {
        message: "title cannot be empty".to_string(),
    };
    assert_eq!(err.to_string(), "Validation error: title cannot be empty");
}

#[test]
fn database_error_displays_correctly() {
    let err = DbError::Database {
        message: "no such table: forms_question".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Database error: no such table: forms_question"
    );
}

#[test]
fn migration_error_displays_correctly() {
    let err = DbError::Migration {
        message: "failed to apply migration 20250101000000".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Migration error: failed to apply migration 20250101000000"
    );
}

#[test]
fn connection_error_displays_correctly() {
    let err = DbError::Connection {
        message: "unable to open database".to_string(),
    };
    assert_eq!(err.to_string(), "Connection error: unable to open database");
}

#[test]
fn constraint_error_displays_correctly() {
    let err = DbError::Constraint {
        message: "NOT NULL constraint failed: forms_question.title".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Constraint violation: NOT NULL constraint failed: forms_question.title"
    );
}

#[test]
fn pool_timeout_maps_to_connection_error() {
    let err: DbError = sqlx::Error::PoolTimedOut.into();
    assert!(matches!(err, DbError::Connection { .. }));
}

#[test]
fn pool_closed_maps_to_connection_error() {
    let err: DbError = sqlx::Error::PoolClosed.into();
    assert!(matches!(err, DbError::Connection { .. }));
}

#[test]
fn row_not_found_maps_to_database_error() {
    let err: DbError = sqlx::Error::RowNotFound.into();
    assert!(matches!(err, DbError::Database { .. }));
}

#[test]
fn db_result_err_returns_error() {
    let result: DbResult<i64> = Err(DbError::not_found("Question", 7));
    assert!(result.is_err());
}
