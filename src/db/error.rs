//! Database error types.
//!
//! Storage failures are classified into connectivity, constraint and generic
//! statement errors and handed to the caller unchanged. Uses miette for
//! diagnostic output and thiserror for the derive.

use miette::Diagnostic;
use thiserror::Error;

/// Database operation errors.
#[derive(Error, Diagnostic, Debug)]
pub enum DbError {
    #[error("Entity not found: {entity_type} with id '{id}'")]
    #[diagnostic(code(forms::db::not_found))]
    NotFound { entity_type: String, id: String },

    #[error("Validation error: {message}")]
    #[diagnostic(code(forms::db::validation_error))]
    Validation { message: String },

    #[error("Database error: {message}")]
    #[diagnostic(code(forms::db::database_error))]
    Database { message: String },

    #[error("Migration error: {message}")]
    #[diagnostic(code(forms::db::migration_error))]
    Migration { message: String },

    #[error("Connection error: {message}")]
    #[diagnostic(
        code(forms::db::connection_error),
        help("Check that the database path is reachable and writable")
    )]
    Connection { message: String },

    #[error("Constraint violation: {message}")]
    #[diagnostic(code(forms::db::constraint))]
    Constraint { message: String },
}

impl DbError {
    /// Build a `NotFound` error for the given entity.
    pub fn not_found(entity_type: &str, id: impl ToString) -> Self {
        DbError::NotFound {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
        }
    }
}

impl From<sqlx::Error> for DbError {
    fn from(e: sqlx::Error) -> Self {
        use sqlx::error::ErrorKind;

        match &e {
            sqlx::Error::Database(db_err) => match db_err.kind() {
                ErrorKind::UniqueViolation
                | ErrorKind::ForeignKeyViolation
                | ErrorKind::NotNullViolation
                | ErrorKind::CheckViolation => DbError::Constraint {
                    message: db_err.message().to_string(),
                },
                _ if is_connectivity_code(db_err.code().as_deref()) => DbError::Connection {
                    message: e.to_string(),
                },
                _ => DbError::Database {
                    message: e.to_string(),
                },
            },
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => DbError::Connection {
                message: e.to_string(),
            },
            _ => DbError::Database {
                message: e.to_string(),
            },
        }
    }
}

/// SQLite primary result codes meaning the database file could not be
/// reached or locked: BUSY, LOCKED, IOERR, CANTOPEN.
const CONNECTIVITY_CODES: [i64; 4] = [5, 6, 10, 14];

/// Whether a driver error code (possibly an extended code) reports a
/// connectivity failure. Extended codes carry the primary code in the low byte.
fn is_connectivity_code(code: Option<&str>) -> bool {
    code.and_then(|c| c.parse::<i64>().ok())
        .is_some_and(|c| CONNECTIVITY_CODES.contains(&(c & 0xff)))
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(e: sqlx::migrate::MigrateError) -> Self {
        DbError::Migration {
            message: e.to_string(),
        }
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
