use std::fmt;

use async_trait::async_trait;

use super::{Backend, InsertOutcome};
use crate::error::SqlTableError;
use crate::query_builder::dml::InsertStatement;
use crate::results::ResultSet;
use crate::types::{BackendKind, RowValues};

#[cfg(feature = "sqlite")]
use crate::sqlite::SqliteEngine;
#[cfg(feature = "turso")]
use crate::turso::TursoEngine;

/// A shared handle to one embedded engine.
///
/// The variant is fixed when the handle is built; clones share the same underlying
/// connection, so several tables can sit on one database.
#[derive(Clone)]
pub enum EngineHandle {
    /// rusqlite connection, direct execution
    #[cfg(feature = "sqlite")]
    Sqlite(SqliteEngine),
    /// Turso connection, prepare/step execution
    #[cfg(feature = "turso")]
    Turso(TursoEngine),
}

impl fmt::Debug for EngineHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            #[cfg(feature = "sqlite")]
            Self::Sqlite(engine) => f.debug_tuple("Sqlite").field(engine).finish(),
            #[cfg(feature = "turso")]
            Self::Turso(engine) => f.debug_tuple("Turso").field(engine).finish(),
        }
    }
}

impl EngineHandle {
    /// Open `db_path` with the engine named by `kind`.
    ///
    /// # Errors
    /// Returns `SqlTableError::ConnectionError` if the engine cannot open the database.
    pub async fn open(kind: BackendKind, db_path: impl Into<String>) -> Result<Self, SqlTableError> {
        let db_path = db_path.into();
        match kind {
            #[cfg(feature = "sqlite")]
            BackendKind::Sqlite => Self::sqlite_builder(db_path).build().await,
            #[cfg(feature = "turso")]
            BackendKind::Turso => Self::turso_builder(db_path).build().await,
        }
    }

    fn backend(&self) -> &dyn Backend {
        match self {
            #[cfg(feature = "sqlite")]
            Self::Sqlite(engine) => engine,
            #[cfg(feature = "turso")]
            Self::Turso(engine) => engine,
        }
    }
}

#[async_trait]
impl Backend for EngineHandle {
    fn kind(&self) -> BackendKind {
        self.backend().kind()
    }

    async fn execute(&self, query: &str, params: &[RowValues]) -> Result<usize, SqlTableError> {
        tracing::debug!(backend = ?self.kind(), sql = query, params = params.len(), "execute");
        self.backend().execute(query, params).await
    }

    async fn query(&self, query: &str, params: &[RowValues]) -> Result<ResultSet, SqlTableError> {
        tracing::debug!(backend = ?self.kind(), sql = query, params = params.len(), "query");
        self.backend().query(query, params).await
    }

    async fn insert_returning_key(
        &self,
        insert: &InsertStatement,
    ) -> Result<InsertOutcome, SqlTableError> {
        tracing::debug!(
            backend = ?self.kind(),
            sql = %insert.query,
            params = insert.params.len(),
            "insert"
        );
        self.backend().insert_returning_key(insert).await
    }
}
