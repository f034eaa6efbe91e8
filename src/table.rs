//! The table accessor.
//!
//! A [`Table`] pairs one [`Schema`] with one [`EngineHandle`]. Every operation builds its SQL
//! from the schema and the caller's input, sends it through the engine as a fresh round trip
//! and, for reads, turns the raw rows into `R` values. Nothing is cached between calls.
//!
//! Columns the schema does not declare are ignored everywhere: in inserted and updated
//! fields, in conditions and in ordering.

use std::fmt;
use std::marker::PhantomData;

use crate::error::SqlTableError;
use crate::executor::{Backend, EngineHandle, InsertOutcome};
use crate::query_builder::{Condition, GetOptions, dml, select};
use crate::record::{Fields, FromRow, Record};
use crate::results::{ResultSet, Row};
use crate::schema::Schema;
use crate::types::RowValues;

/// Typed access to one table.
///
/// ```rust,no_run
/// use sql_table::prelude::*;
///
/// # async fn demo() -> Result<(), SqlTableError> {
/// let schema = Schema::builder("people")
///     .column("id", ColumnDefinition::integer_key())
///     .column("name", ColumnDefinition::new(DataType::Text))
///     .build()?;
/// let engine = EngineHandle::sqlite_builder(":memory:").build().await?;
/// let people: Table = Table::new(schema, engine);
///
/// people.create().await?;
/// let ann = people.add(Fields::new().set("name", "Ann")).await?;
/// assert_eq!(ann.get("name"), Some(&RowValues::Text("Ann".into())));
/// assert_eq!(people.count(&[Condition::eq("name", "Ann")]).await?, 1);
/// # Ok(()) }
/// ```
pub struct Table<R = Record> {
    schema: Schema,
    engine: EngineHandle,
    _row: PhantomData<fn() -> R>,
}

impl<R> Clone for Table<R> {
    fn clone(&self) -> Self {
        Self {
            schema: self.schema.clone(),
            engine: self.engine.clone(),
            _row: PhantomData,
        }
    }
}

impl<R> fmt::Debug for Table<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("schema", &self.schema)
            .field("engine", &self.engine)
            .finish()
    }
}

impl<R: FromRow> Table<R> {
    #[must_use]
    pub fn new(schema: Schema, engine: EngineHandle) -> Self {
        Self {
            schema,
            engine,
            _row: PhantomData,
        }
    }

    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    #[must_use]
    pub fn engine(&self) -> &EngineHandle {
        &self.engine
    }

    /// `CREATE TABLE IF NOT EXISTS`; safe to call repeatedly.
    ///
    /// # Errors
    /// Returns the engine's error unchanged.
    pub async fn create(&self) -> Result<(), SqlTableError> {
        self.engine
            .execute(&self.schema.create_table_sql(), &[])
            .await?;
        Ok(())
    }

    /// Insert `fields` and return the stored row. Alias of [`Table::insert_and_fetch`].
    ///
    /// # Errors
    /// See [`Table::insert_and_fetch`].
    pub async fn add(&self, fields: Fields) -> Result<R, SqlTableError> {
        self.insert_and_fetch(&fields).await
    }

    /// Insert `fields` (caller's column order) and read the stored row back.
    ///
    /// The table must declare exactly one auto-increment integer primary key; that key is
    /// how the row is found again on engines that only report the assigned rowid.
    ///
    /// # Errors
    /// Returns `ConfigError` when no auto-increment key is declared, `InvalidArgument` when no
    /// declared column is supplied, `ExecutionError` when the inserted row cannot be read back,
    /// and the engine's error unchanged otherwise. A failed read-back does not undo the insert.
    pub async fn insert_and_fetch(&self, fields: &Fields) -> Result<R, SqlTableError> {
        let key = self.schema.auto_increment_key().ok_or_else(|| {
            SqlTableError::ConfigError(format!(
                "table {} has no auto-increment INTEGER primary key to fetch inserted rows by",
                self.schema.name()
            ))
        })?;
        let insert = dml::insert(&self.schema, fields)?;

        let row = match self.engine.insert_returning_key(&insert).await? {
            InsertOutcome::Row(row) => row,
            InsertOutcome::Key(rowid) => {
                let lookup = select::select_by(&self.schema, key, RowValues::Int(rowid));
                self.engine
                    .query(&lookup.query, &lookup.params)
                    .await?
                    .into_iter()
                    .next()
                    .ok_or_else(|| {
                        SqlTableError::ExecutionError(format!(
                            "inserted row {key} = {rowid} not found in {}",
                            self.schema.name()
                        ))
                    })?
            }
        };
        self.materialize(row)
    }

    /// Rows matching `options`, in engine order unless an ordering is given.
    ///
    /// # Errors
    /// Returns `InvalidArgument` for NULL with an ordering operator, `ConversionError` from
    /// the row factory, and the engine's error unchanged.
    pub async fn get(&self, options: &GetOptions) -> Result<Vec<R>, SqlTableError> {
        let built = select::select(&self.schema, options)?;
        let rows = self.engine.query(&built.query, &built.params).await?;
        self.materialize_all(rows)
    }

    /// Every row in the table.
    ///
    /// # Errors
    /// See [`Table::get`].
    pub async fn all(&self) -> Result<Vec<R>, SqlTableError> {
        self.get(&GetOptions::default()).await
    }

    /// The first row matching `options`, if any.
    ///
    /// # Errors
    /// See [`Table::get`].
    pub async fn first(&self, options: &GetOptions) -> Result<Option<R>, SqlTableError> {
        let mut limited = options.clone();
        limited.limit = Some(1);
        Ok(self.get(&limited).await?.into_iter().next())
    }

    /// Delete rows matching `options` and return how many were removed.
    ///
    /// With no conditions every row in the table is deleted.
    ///
    /// # Errors
    /// Returns `InvalidArgument` for NULL with an ordering operator, and the engine's error
    /// unchanged (including engines that reject `ORDER BY`/`LIMIT` on `DELETE`).
    pub async fn delete(&self, options: &GetOptions) -> Result<usize, SqlTableError> {
        let built = select::delete(&self.schema, options)?;
        self.engine.execute(&built.query, &built.params).await
    }

    /// Number of rows matching `conditions`; 0 if the engine returns no row.
    ///
    /// # Errors
    /// Returns `InvalidArgument` for NULL with an ordering operator, and the engine's error
    /// unchanged.
    pub async fn count(&self, conditions: &[Condition]) -> Result<i64, SqlTableError> {
        let built = select::count(&self.schema, conditions)?;
        let rows = self.engine.query(&built.query, &built.params).await?;
        Ok(rows
            .results
            .first()
            .and_then(|row| row.get("count"))
            .and_then(RowValues::as_int)
            .copied()
            .unwrap_or(0))
    }

    /// Set `fields` on rows matching the conditions in `options` and return how many changed.
    ///
    /// Only the where clause of `options` applies; ordering and limit are ignored.
    ///
    /// # Errors
    /// Returns `InvalidArgument` when no declared column is left to set (whatever `options`
    /// holds), and the engine's error unchanged.
    pub async fn update(&self, fields: &Fields, options: &GetOptions) -> Result<usize, SqlTableError> {
        let built = dml::update(&self.schema, fields, &options.conditions)?;
        self.engine.execute(&built.query, &built.params).await
    }

    fn materialize_all(&self, rows: ResultSet) -> Result<Vec<R>, SqlTableError> {
        rows.into_iter().map(|row| self.materialize(row)).collect()
    }

    fn materialize(&self, row: Row) -> Result<R, SqlTableError> {
        let coerced = row.map_values(|column, value| self.schema.coerce(column, value));
        R::from_row(&coerced)
    }
}
