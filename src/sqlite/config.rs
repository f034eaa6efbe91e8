use std::sync::Arc;

use tokio::sync::Mutex;

use super::executor::SqliteEngine;
use crate::error::SqlTableError;
use crate::executor::EngineHandle;

/// Options for opening a rusqlite database.
#[derive(Debug, Clone)]
pub struct SqliteOptions {
    /// File path, or `:memory:` for a private in-memory database.
    pub db_path: String,
}

impl SqliteOptions {
    #[must_use]
    pub fn new(db_path: String) -> Self {
        Self { db_path }
    }
}

/// Fluent builder for `SQLite` options.
#[derive(Debug, Clone)]
pub struct SqliteOptionsBuilder {
    opts: SqliteOptions,
}

impl SqliteOptionsBuilder {
    #[must_use]
    pub fn new(db_path: String) -> Self {
        Self {
            opts: SqliteOptions::new(db_path),
        }
    }

    #[must_use]
    pub fn finish(self) -> SqliteOptions {
        self.opts
    }

    /// Open the database and wrap it in an [`EngineHandle`].
    ///
    /// # Errors
    /// Returns `SqlTableError::ConnectionError` if the database cannot be opened.
    pub async fn build(self) -> Result<EngineHandle, SqlTableError> {
        EngineHandle::new_sqlite(self.finish()).await
    }
}

impl EngineHandle {
    #[must_use]
    pub fn sqlite_builder(db_path: impl Into<String>) -> SqliteOptionsBuilder {
        SqliteOptionsBuilder::new(db_path.into())
    }

    /// Open a rusqlite connection on a blocking thread.
    ///
    /// # Errors
    /// Returns `SqlTableError::ConnectionError` if the database cannot be opened.
    pub async fn new_sqlite(opts: SqliteOptions) -> Result<Self, SqlTableError> {
        let db_path = opts.db_path;
        let path_for_open = db_path.clone();
        let conn = tokio::task::spawn_blocking(move || rusqlite::Connection::open(path_for_open))
            .await
            .map_err(|e| {
                SqlTableError::ConnectionError(format!("sqlite open join error: {e}"))
            })?
            .map_err(|e| {
                SqlTableError::ConnectionError(format!("Failed to open SQLite database: {e}"))
            })?;

        tracing::info!(db_path = %db_path, "opened sqlite engine");
        Ok(Self::from_rusqlite(conn))
    }

    /// Wrap an already-open rusqlite connection.
    #[must_use]
    pub fn from_rusqlite(conn: rusqlite::Connection) -> Self {
        EngineHandle::Sqlite(SqliteEngine::new(Arc::new(Mutex::new(conn))))
    }
}
