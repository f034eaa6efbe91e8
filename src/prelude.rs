//! Convenient imports for common functionality.
//!
//! This module re-exports the types needed to describe a table, open an engine and run
//! table operations.

pub use crate::error::SqlTableError;
pub use crate::executor::{Backend, EngineHandle, InsertOutcome};
pub use crate::query_builder::{
    Condition, ConditionValue, Direction, GetOptions, Operator, OrderBy, QueryAndParams,
};
pub use crate::record::{Fields, FromRow, Record};
pub use crate::results::{ResultSet, Row};
pub use crate::schema::{ColumnDefinition, DataType, Schema};
pub use crate::table::Table;
pub use crate::types::{BackendKind, RowValues};

#[cfg(feature = "sqlite")]
pub use crate::sqlite::{SqliteOptions, SqliteOptionsBuilder};
#[cfg(feature = "turso")]
pub use crate::turso::{TursoOptions, TursoOptionsBuilder};
