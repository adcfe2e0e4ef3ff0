//! SQLite implementation of the database traits.
//!
//! This module provides a SQLx-backed implementation of the repository
//! traits defined in the parent module.

mod connection;
mod entry;
mod question;
mod step;

#[cfg(test)]
mod question_test;

pub use connection::SqliteDatabase;
pub use entry::SqliteEntryLookup;
pub use question::SqliteQuestionRepository;
pub use step::SqliteStepLookup;
