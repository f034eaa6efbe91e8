//! Static table definitions.
//!
//! A [`Schema`] names a table and lists its columns in declaration order. It is validated
//! once when built and never mutated afterwards; the table accessor uses it to render DDL,
//! to decide which caller-supplied columns are kept, and to coerce raw engine values back
//! into the declared column types.

use std::fmt;

use crate::error::SqlTableError;
use crate::types::RowValues;

/// SQL storage type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Integer,
    Text,
    Real,
    Boolean,
}

impl DataType {
    #[must_use]
    pub fn as_sql(self) -> &'static str {
        match self {
            DataType::Integer => "INTEGER",
            DataType::Text => "TEXT",
            DataType::Real => "REAL",
            DataType::Boolean => "BOOLEAN",
        }
    }

    /// Bring a raw engine value back to this column's declared type.
    ///
    /// SQLite has no boolean storage class and stores integral REAL values compactly, so
    /// values coming back from either engine are normalised here. Anything that does not
    /// match a known widening is returned untouched.
    #[must_use]
    pub fn coerce(self, value: RowValues) -> RowValues {
        match (self, value) {
            (DataType::Boolean, RowValues::Int(i)) => RowValues::Bool(i != 0),
            #[allow(clippy::cast_precision_loss)]
            (DataType::Real, RowValues::Int(i)) => RowValues::Float(i as f64),
            #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
            (DataType::Integer, RowValues::Float(f))
                if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 =>
            {
                RowValues::Int(f as i64)
            }
            (_, other) => other,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Per-column metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDefinition {
    pub data_type: DataType,
    pub nullable: bool,
    pub primary_key: bool,
    pub auto_increment: bool,
}

impl ColumnDefinition {
    /// A NOT NULL column of the given type.
    #[must_use]
    pub fn new(data_type: DataType) -> Self {
        Self {
            data_type,
            nullable: false,
            primary_key: false,
            auto_increment: false,
        }
    }

    /// `INTEGER PRIMARY KEY AUTOINCREMENT`
    #[must_use]
    pub fn integer_key() -> Self {
        Self::new(DataType::Integer).primary_key().auto_increment()
    }

    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    #[must_use]
    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    fn render(&self, name: &str) -> String {
        let mut def = format!("{name} {}", self.data_type);
        if self.primary_key {
            def.push_str(" PRIMARY KEY");
            if self.auto_increment && self.data_type == DataType::Integer {
                def.push_str(" AUTOINCREMENT");
            }
        }
        if !self.nullable && !self.primary_key {
            def.push_str(" NOT NULL");
        }
        def
    }
}

/// Immutable description of one table.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    name: String,
    columns: Vec<(String, ColumnDefinition)>,
}

impl Schema {
    /// Start describing a table.
    ///
    /// ```rust
    /// use sql_table::prelude::*;
    ///
    /// let schema = Schema::builder("people")
    ///     .column("id", ColumnDefinition::integer_key())
    ///     .column("name", ColumnDefinition::new(DataType::Text))
    ///     .build()?;
    /// assert_eq!(
    ///     schema.create_table_sql(),
    ///     "CREATE TABLE IF NOT EXISTS people (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL)"
    /// );
    /// # Ok::<(), SqlTableError>(())
    /// ```
    #[must_use]
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns
            .iter()
            .find(|(col, _)| col == name)
            .map(|(_, def)| def)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &ColumnDefinition)> {
        self.columns.iter().map(|(name, def)| (name.as_str(), def))
    }

    #[must_use]
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|(name, _)| name.clone()).collect()
    }

    #[must_use]
    pub fn primary_key(&self) -> Option<&str> {
        self.columns
            .iter()
            .find(|(_, def)| def.primary_key)
            .map(|(name, _)| name.as_str())
    }

    /// The integer primary key the engine assigns on insert, if one is declared.
    #[must_use]
    pub fn auto_increment_key(&self) -> Option<&str> {
        self.columns
            .iter()
            .find(|(_, def)| {
                def.primary_key && def.auto_increment && def.data_type == DataType::Integer
            })
            .map(|(name, _)| name.as_str())
    }

    /// `CREATE TABLE IF NOT EXISTS` for this table, columns in declaration order.
    #[must_use]
    pub fn create_table_sql(&self) -> String {
        let defs = self
            .columns
            .iter()
            .map(|(name, def)| def.render(name))
            .collect::<Vec<_>>()
            .join(", ");
        format!("CREATE TABLE IF NOT EXISTS {} ({defs})", self.name)
    }

    /// Coerce a raw value read from `column`; unknown columns pass through.
    #[must_use]
    pub fn coerce(&self, column: &str, value: RowValues) -> RowValues {
        match self.column(column) {
            Some(def) => def.data_type.coerce(value),
            None => value,
        }
    }
}

/// Collects columns for a [`Schema`] and validates them on [`SchemaBuilder::build`].
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    name: String,
    columns: Vec<(String, ColumnDefinition)>,
}

impl SchemaBuilder {
    #[must_use]
    pub fn column(mut self, name: impl Into<String>, definition: ColumnDefinition) -> Self {
        self.columns.push((name.into(), definition));
        self
    }

    /// Finish the schema.
    ///
    /// # Errors
    /// Returns `SqlTableError::SchemaError` when a name is not a plain identifier, a column
    /// is declared twice, no columns are declared, more than one primary key is declared,
    /// or an auto-increment flag sits on anything but an integer primary key.
    pub fn build(self) -> Result<Schema, SqlTableError> {
        validate_identifier(&self.name, "table")?;
        if self.columns.is_empty() {
            return Err(SqlTableError::SchemaError(format!(
                "table {} declares no columns",
                self.name
            )));
        }

        let mut primary_keys = 0;
        for (idx, (name, def)) in self.columns.iter().enumerate() {
            validate_identifier(name, "column")?;
            if self.columns[..idx].iter().any(|(other, _)| other == name) {
                return Err(SqlTableError::SchemaError(format!(
                    "column {name} declared more than once in {}",
                    self.name
                )));
            }
            if def.auto_increment && !(def.primary_key && def.data_type == DataType::Integer) {
                return Err(SqlTableError::SchemaError(format!(
                    "column {name}: auto-increment requires an INTEGER primary key"
                )));
            }
            if def.primary_key {
                primary_keys += 1;
            }
        }
        if primary_keys > 1 {
            return Err(SqlTableError::SchemaError(format!(
                "table {} declares {primary_keys} primary keys; at most one is supported",
                self.name
            )));
        }

        Ok(Schema {
            name: self.name,
            columns: self.columns,
        })
    }
}

// Keywords SQLite recognizes; names are rendered unquoted, so none of these may be used.
const RESERVED_WORDS: &[&str] = &[
    "ABORT", "ACTION", "ADD", "AFTER", "ALL", "ALTER", "ALWAYS", "ANALYZE", "AND", "AS",
    "ASC", "ATTACH", "AUTOINCREMENT", "BEFORE", "BEGIN", "BETWEEN", "BY", "CASCADE", "CASE",
    "CAST", "CHECK", "COLLATE", "COLUMN", "COMMIT", "CONFLICT", "CONSTRAINT", "CREATE",
    "CROSS", "CURRENT", "CURRENT_DATE", "CURRENT_TIME", "CURRENT_TIMESTAMP", "DATABASE",
    "DEFAULT", "DEFERRABLE", "DEFERRED", "DELETE", "DESC", "DETACH", "DISTINCT", "DO", "DROP",
    "EACH", "ELSE", "END", "ESCAPE", "EXCEPT", "EXCLUDE", "EXCLUSIVE", "EXISTS", "EXPLAIN",
    "FAIL", "FILTER", "FIRST", "FOLLOWING", "FOR", "FOREIGN", "FROM", "FULL", "GENERATED",
    "GLOB", "GROUP", "GROUPS", "HAVING", "IF", "IGNORE", "IMMEDIATE", "IN", "INDEX",
    "INDEXED", "INITIALLY", "INNER", "INSERT", "INSTEAD", "INTERSECT", "INTO", "IS", "ISNULL",
    "JOIN", "KEY", "LAST", "LEFT", "LIKE", "LIMIT", "MATCH", "MATERIALIZED", "NATURAL", "NO",
    "NOT", "NOTHING", "NOTNULL", "NULL", "NULLS", "OF", "OFFSET", "ON", "OR", "ORDER",
    "OTHERS", "OUTER", "OVER", "PARTITION", "PLAN", "PRAGMA", "PRECEDING", "PRIMARY", "QUERY",
    "RAISE", "RANGE", "RECURSIVE", "REFERENCES", "REGEXP", "REINDEX", "RELEASE", "RENAME",
    "REPLACE", "RESTRICT", "RETURNING", "RIGHT", "ROLLBACK", "ROW", "ROWS", "SAVEPOINT",
    "SELECT", "SET", "TABLE", "TEMP", "TEMPORARY", "THEN", "TIES", "TO", "TRANSACTION",
    "TRIGGER", "UNBOUNDED", "UNION", "UNIQUE", "UPDATE", "USING", "VACUUM", "VALUES", "VIEW",
    "VIRTUAL", "WHEN", "WHERE", "WINDOW", "WITH", "WITHOUT",
];

fn validate_identifier(name: &str, what: &str) -> Result<(), SqlTableError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if !valid {
        return Err(SqlTableError::SchemaError(format!(
            "invalid {what} name {name:?}"
        )));
    }
    if RESERVED_WORDS
        .iter()
        .any(|word| word.eq_ignore_ascii_case(name))
    {
        return Err(SqlTableError::SchemaError(format!(
            "{what} name {name:?} is an SQL keyword"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> Schema {
        Schema::builder("people")
            .column("id", ColumnDefinition::integer_key())
            .column("name", ColumnDefinition::new(DataType::Text))
            .column("score", ColumnDefinition::new(DataType::Real).nullable())
            .column("active", ColumnDefinition::new(DataType::Boolean))
            .build()
            .unwrap()
    }

    #[test]
    fn renders_create_table() {
        assert_eq!(
            people().create_table_sql(),
            "CREATE TABLE IF NOT EXISTS people (id INTEGER PRIMARY KEY AUTOINCREMENT, \
             name TEXT NOT NULL, score REAL, active BOOLEAN NOT NULL)"
        );
    }

    #[test]
    fn text_primary_key_has_no_not_null_suffix() {
        let schema = Schema::builder("tags")
            .column("slug", ColumnDefinition::new(DataType::Text).primary_key())
            .build()
            .unwrap();
        assert_eq!(
            schema.create_table_sql(),
            "CREATE TABLE IF NOT EXISTS tags (slug TEXT PRIMARY KEY)"
        );
        assert_eq!(schema.primary_key(), Some("slug"));
        assert_eq!(schema.auto_increment_key(), None);
    }

    #[test]
    fn rejects_two_primary_keys() {
        let err = Schema::builder("t")
            .column("a", ColumnDefinition::new(DataType::Integer).primary_key())
            .column("b", ColumnDefinition::new(DataType::Integer).primary_key())
            .build()
            .unwrap_err();
        assert!(matches!(err, SqlTableError::SchemaError(_)));
    }

    #[test]
    fn rejects_auto_increment_on_text() {
        let err = Schema::builder("t")
            .column(
                "a",
                ColumnDefinition::new(DataType::Text).primary_key().auto_increment(),
            )
            .build()
            .unwrap_err();
        assert!(format!("{err}").contains("auto-increment"));
    }

    #[test]
    fn rejects_bad_identifiers_and_duplicates() {
        assert!(
            Schema::builder("bad name")
                .column("a", ColumnDefinition::new(DataType::Text))
                .build()
                .is_err()
        );
        assert!(
            Schema::builder("t")
                .column("a; DROP TABLE t", ColumnDefinition::new(DataType::Text))
                .build()
                .is_err()
        );
        assert!(
            Schema::builder("t")
                .column("a", ColumnDefinition::new(DataType::Text))
                .column("a", ColumnDefinition::new(DataType::Integer))
                .build()
                .is_err()
        );
        assert!(Schema::builder("t").build().is_err());
    }

    #[test]
    fn coerces_by_declared_type() {
        let schema = people();
        assert_eq!(schema.coerce("active", RowValues::Int(1)), RowValues::Bool(true));
        assert_eq!(schema.coerce("active", RowValues::Int(0)), RowValues::Bool(false));
        assert_eq!(schema.coerce("score", RowValues::Int(4)), RowValues::Float(4.0));
        assert_eq!(schema.coerce("id", RowValues::Float(3.0)), RowValues::Int(3));
        assert_eq!(schema.coerce("score", RowValues::Null), RowValues::Null);
        assert_eq!(schema.coerce("count", RowValues::Int(9)), RowValues::Int(9));
    }

    #[test]
    fn integral_floats_outside_i64_are_left_as_floats() {
        let schema = people();
        assert_eq!(schema.coerce("id", RowValues::Float(1e20)), RowValues::Float(1e20));
        assert_eq!(schema.coerce("id", RowValues::Float(-1e20)), RowValues::Float(-1e20));
        assert_eq!(
            schema.coerce("id", RowValues::Float(9_223_372_036_854_775_808.0)),
            RowValues::Float(9_223_372_036_854_775_808.0)
        );
        assert_eq!(
            schema.coerce("id", RowValues::Float(-9_223_372_036_854_775_808.0)),
            RowValues::Int(i64::MIN)
        );
        assert_eq!(
            schema.coerce("id", RowValues::Float(f64::INFINITY)),
            RowValues::Float(f64::INFINITY)
        );
    }

    #[test]
    fn rejects_keywords_as_names() {
        for (table, column) in [("t", "order"), ("t", "Select"), ("group", "a")] {
            let err = Schema::builder(table)
                .column(column, ColumnDefinition::new(DataType::Text))
                .build()
                .unwrap_err();
            assert!(matches!(err, SqlTableError::SchemaError(_)));
            assert!(format!("{err}").contains("keyword"));
        }
        // keyword-like but not reserved
        assert!(
            Schema::builder("orders")
                .column("count", ColumnDefinition::new(DataType::Integer))
                .column("name", ColumnDefinition::new(DataType::Text))
                .build()
                .is_ok()
        );
    }
}
