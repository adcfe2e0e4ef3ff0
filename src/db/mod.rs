//! Database abstraction layer.
//!
//! Trait-based abstractions for data access, so the storage backend can be
//! swapped without changing the callers.
//!
//! # Architecture
//!
//! - `error`: Storage-agnostic error types
//! - `models`: Domain entities (Question, Entry, Step, ReferenceList)
//! - `repository`: Trait definitions for data access
//! - `sqlite`: SQLx/SQLite implementation

mod error;
mod models;
mod repository;
pub mod sqlite;

#[cfg(test)]
mod error_test;

pub use error::{DbError, DbResult};
pub use models::*;
pub use repository::*;
pub use sqlite::{
    SqliteDatabase, SqliteEntryLookup, SqliteQuestionRepository, SqliteStepLookup,
};
