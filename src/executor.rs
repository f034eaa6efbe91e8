//! The contract every embedded engine implements, and the handle that picks one.
//!
//! The two engines bind and return rows differently: rusqlite runs a statement directly and
//! reports the last inserted rowid, while Turso steps a prepared statement and can hand the
//! inserted row back through `RETURNING`. [`Backend`] hides that behind three calls, and
//! [`InsertOutcome`] says which of the two answers an insert produced.

use async_trait::async_trait;

use crate::error::SqlTableError;
use crate::query_builder::dml::InsertStatement;
use crate::results::{ResultSet, Row};
use crate::types::{BackendKind, RowValues};

mod dispatch;

pub use dispatch::EngineHandle;

/// What an engine knows right after an insert.
#[derive(Debug, Clone)]
pub enum InsertOutcome {
    /// The inserted row itself, as stored.
    Row(Row),
    /// The rowid the engine assigned; the row has to be read back.
    Key(i64),
}

/// Statement execution shared by all engines.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Which engine this is.
    fn kind(&self) -> BackendKind;

    /// Run a statement for its side effect and return the affected row count.
    ///
    /// # Errors
    /// Returns the engine's error unchanged.
    async fn execute(&self, query: &str, params: &[RowValues]) -> Result<usize, SqlTableError>;

    /// Run a statement and collect every row it produces.
    ///
    /// # Errors
    /// Returns the engine's error unchanged.
    async fn query(&self, query: &str, params: &[RowValues]) -> Result<ResultSet, SqlTableError>;

    /// Run an insert and report either the stored row or its assigned key.
    ///
    /// # Errors
    /// Returns the engine's error unchanged, or `ExecutionError` when the engine produced
    /// neither a row nor a key.
    async fn insert_returning_key(
        &self,
        insert: &InsertStatement,
    ) -> Result<InsertOutcome, SqlTableError>;
}
