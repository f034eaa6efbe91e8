//! Typed single-table access over embedded SQLite engines.
//!
//! A [`Schema`](schema::Schema) describes one table. A [`Table`](table::Table) turns
//! structured conditions, ordering and limits into parameterized SQL, runs it on an
//! [`EngineHandle`](executor::EngineHandle) and maps the returned rows through a
//! [`FromRow`](record::FromRow) row factory.
//!
//! Two engines are supported behind the same [`Backend`](executor::Backend) contract:
//! - `sqlite`: rusqlite, executing statements directly and re-reading inserted rows by
//!   their assigned key;
//! - `turso`: Turso's in-process engine, stepping prepared statements and returning inserted
//!   rows through `RETURNING`.
//!
//! ```rust,no_run
//! use sql_table::prelude::*;
//!
//! # async fn demo() -> Result<(), SqlTableError> {
//! let schema = Schema::builder("people")
//!     .column("id", ColumnDefinition::integer_key())
//!     .column("name", ColumnDefinition::new(DataType::Text))
//!     .build()?;
//! let people: Table = Table::new(schema, EngineHandle::open(BackendKind::Sqlite, ":memory:").await?);
//! people.create().await?;
//! people.add(Fields::new().set("name", "John Smith")).await?;
//! let found = people
//!     .get(&GetOptions::new().filter(Condition::eq("name", "John Smith")))
//!     .await?;
//! assert_eq!(found.len(), 1);
//! # Ok(()) }
//! ```

pub mod error;
pub mod executor;
pub mod prelude;
pub mod query_builder;
pub mod record;
pub mod results;
pub mod schema;
pub mod table;
pub mod types;

#[cfg(feature = "sqlite")]
pub mod sqlite;
#[cfg(feature = "turso")]
pub mod turso;

pub use error::SqlTableError;
pub use executor::{Backend, EngineHandle, InsertOutcome};
pub use query_builder::{
    Condition, ConditionValue, Direction, GetOptions, Operator, OrderBy, QueryAndParams,
    build_clauses, build_where,
};
pub use record::{Fields, FromRow, Record};
pub use results::{ResultSet, Row};
pub use schema::{ColumnDefinition, DataType, Schema, SchemaBuilder};
pub use table::Table;
pub use types::{BackendKind, RowValues};
