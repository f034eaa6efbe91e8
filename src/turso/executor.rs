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

/// Turso engine: statements are prepared, bound and stepped row by row.
#[derive(Clone)]
pub struct TursoEngine {
    _db: Arc<turso::Database>,
    conn: Arc<Mutex<turso::Connection>>,
}

impl TursoEngine {
    pub(crate) fn new(db: turso::Database, conn: turso::Connection) -> Self {
        Self {
            _db: Arc::new(db),
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    async fn prepare_and_collect(
        &self,
        query: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, SqlTableError> {
        let converted = Params::convert(params);
        let conn = self.conn.lock().await;

        let mut stmt = conn.prepare(query).await?;
        let columns: Vec<String> = stmt
            .columns()
            .iter()
            .map(|col| col.name().to_string())
            .collect();

        let rows = stmt.query(converted.0).await?;
        build_result_set(rows, Arc::new(columns)).await
    }
}

impl fmt::Debug for TursoEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TursoEngine")
            .field("conn", &"<turso::Connection>")
            .finish()
    }
}

#[async_trait]
impl Backend for TursoEngine {
    fn kind(&self) -> BackendKind {
        BackendKind::Turso
    }

    async fn execute(&self, query: &str, params: &[RowValues]) -> Result<usize, SqlTableError> {
        let converted = Params::convert(params);
        let affected = self.conn.lock().await.execute(query, converted.0).await?;
        usize::try_from(affected).map_err(|e| {
            SqlTableError::ExecutionError(format!("Turso affected rows conversion error: {e}"))
        })
    }

    async fn query(&self, query: &str, params: &[RowValues]) -> Result<ResultSet, SqlTableError> {
        self.prepare_and_collect(query, params).await
    }

    /// Appends `RETURNING` over the declared columns and takes the single row it yields.
    async fn insert_returning_key(
        &self,
        insert: &InsertStatement,
    ) -> Result<InsertOutcome, SqlTableError> {
        let returned = self
            .prepare_and_collect(&insert.returning_sql(), &insert.params)
            .await?;
        returned
            .into_iter()
            .next()
            .map(InsertOutcome::Row)
            .ok_or_else(|| {
                SqlTableError::ExecutionError("Turso insert returned no row".to_string())
            })
    }
}
