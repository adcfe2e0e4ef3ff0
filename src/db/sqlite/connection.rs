//! SQLite database connection and migration management.

use std::path::Path;
use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::{debug, info};

use super::{SqliteEntryLookup, SqliteQuestionRepository, SqliteStepLookup};
use crate::db::{Database, DbError, DbResult};

/// SQLite database implementation.
///
/// Owns the connection pool and hands out repositories that borrow it.
pub struct SqliteDatabase {
    pool: SqlitePool,
}

impl SqliteDatabase {
    /// Open (or create) a database file at the given path.
    pub async fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening sqlite database");

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(|e| DbError::Connection {
                message: format!("Failed to open {}: {}", path.display(), e),
            })?;

        Ok(Self { pool })
    }

    /// Create an in-memory database (useful for testing).
    ///
    /// Every pooled connection to `:memory:` would see its own empty
    /// database, so the pool is pinned to a single connection that never
    /// expires.
    pub async fn in_memory() -> DbResult<Self> {
        let options =
            SqliteConnectOptions::from_str("sqlite::memory:").map_err(|e| DbError::Connection {
                message: e.to_string(),
            })?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| DbError::Connection {
                message: e.to_string(),
            })?;

        Ok(Self { pool })
    }

    /// Underlying pool, for callers that need their own statements or
    /// transactions.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl Database for SqliteDatabase {
    type Entries<'a> = SqliteEntryLookup<'a>;
    type Steps<'a> = SqliteStepLookup<'a>;
    type Questions<'a> =
        SqliteQuestionRepository<'a, SqliteEntryLookup<'a>, SqliteStepLookup<'a>>;

    async fn migrate(&self) -> DbResult<()> {
        sqlx::migrate!("data/sql/sqlite").run(&self.pool).await?;
        info!("database migrations complete");
        Ok(())
    }

    fn entries(&self) -> Self::Entries<'_> {
        SqliteEntryLookup::new(&self.pool)
    }

    fn steps(&self) -> Self::Steps<'_> {
        SqliteStepLookup::new(&self.pool)
    }

    fn questions(&self) -> Self::Questions<'_> {
        SqliteQuestionRepository::new(&self.pool, self.entries(), self.steps())
    }
}
