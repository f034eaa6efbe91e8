use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::params::Params;
use super::query::build_result_set;
use crate::error::SqlTableError;
use crate::executor::{Backend, InsertOutcome};
use crate::query_builder::dml::InsertStatement;
use crate::results::ResultSet;
use crate::types::{BackendKind, RowValues};

pub(crate) type SharedSqliteConnection = Arc<Mutex<rusqlite::Connection>>;

/// rusqlite engine: statements run directly on a blocking thread.
#[derive(Clone)]
pub struct SqliteEngine {
    conn: SharedSqliteConnection,
}

impl SqliteEngine {
    pub(crate) fn new(conn: SharedSqliteConnection) -> Self {
        Self { conn }
    }

    /// Run `func` against the raw connection on a blocking thread.
    ///
    /// # Errors
    /// Returns whatever `func` returns, or `ExecutionError` if the blocking task panicked.
    pub async fn with_connection<F, R>(&self, func: F) -> Result<R, SqlTableError>
    where
        F: FnOnce(&mut rusqlite::Connection) -> Result<R, SqlTableError> + Send + 'static,
        R: Send + 'static,
    {
        run_blocking(Arc::clone(&self.conn), func).await
    }
}

impl fmt::Debug for SqliteEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteEngine")
            .field("conn", &"<rusqlite::Connection>")
            .finish()
    }
}

pub(crate) async fn run_blocking<F, R>(
    conn: SharedSqliteConnection,
    func: F,
) -> Result<R, SqlTableError>
where
    F: FnOnce(&mut rusqlite::Connection) -> Result<R, SqlTableError> + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut guard = conn.blocking_lock();
        func(&mut guard)
    })
    .await
    .map_err(|e| SqlTableError::ExecutionError(format!("sqlite spawn_blocking join error: {e}")))?
}

#[async_trait]
impl Backend for SqliteEngine {
    fn kind(&self) -> BackendKind {
        BackendKind::Sqlite
    }

    async fn execute(&self, query: &str, params: &[RowValues]) -> Result<usize, SqlTableError> {
        let sql_owned = query.to_owned();
        let params_owned = Params::convert(params);
        self.with_connection(move |guard| {
            let mut stmt = guard.prepare_cached(&sql_owned)?;
            let affected = stmt.execute(&params_owned.as_refs()[..])?;
            Ok(affected)
        })
        .await
    }

    async fn query(&self, query: &str, params: &[RowValues]) -> Result<ResultSet, SqlTableError> {
        let sql_owned = query.to_owned();
        let params_owned = Params::convert(params);
        self.with_connection(move |guard| {
            let mut stmt = guard.prepare_cached(&sql_owned)?;
            build_result_set(&mut stmt, &params_owned)
        })
        .await
    }

    /// Executes the insert and reads `last_insert_rowid` under the same lock.
    async fn insert_returning_key(
        &self,
        insert: &InsertStatement,
    ) -> Result<InsertOutcome, SqlTableError> {
        let sql_owned = insert.query.clone();
        let params_owned = Params::convert(&insert.params);
        self.with_connection(move |guard| {
            {
                let mut stmt = guard.prepare_cached(&sql_owned)?;
                stmt.execute(&params_owned.as_refs()[..])?;
            }
            Ok(InsertOutcome::Key(guard.last_insert_rowid()))
        })
        .await
    }
}
