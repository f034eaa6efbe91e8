//! Row factories and the plain field mappings passed into and out of a table.

use crate::error::SqlTableError;
use crate::results::Row;
use crate::types::RowValues;

/// Builds an application row from one raw row.
///
/// Called once per returned row after values have been coerced to their declared column
/// types. Implement it for your own structs:
/// ```rust
/// use sql_table::prelude::*;
///
/// struct Person {
///     id: i64,
///     name: String,
/// }
///
/// impl FromRow for Person {
///     fn from_row(row: &Row) -> Result<Self, SqlTableError> {
///         Ok(Person {
///             id: row.get("id").and_then(RowValues::as_int).copied().ok_or_else(|| {
///                 SqlTableError::ConversionError("id is not an integer".into())
///             })?,
///             name: row.get("name").and_then(RowValues::as_text).unwrap_or_default().into(),
///         })
///     }
/// }
/// # let _ = |p: Person| (p.id, p.name);
/// ```
pub trait FromRow: Sized {
    /// # Errors
    /// Returns `SqlTableError::ConversionError` when the row cannot be turned into `Self`.
    fn from_row(row: &Row) -> Result<Self, SqlTableError>;
}

/// Default immutable row value: fields in engine column order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: Vec<(String, RowValues)>,
}

impl Record {
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&RowValues> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &RowValues)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    #[must_use]
    pub fn into_values(self) -> Vec<(String, RowValues)> {
        self.fields
    }
}

impl FromRow for Record {
    fn from_row(row: &Row) -> Result<Self, SqlTableError> {
        Ok(Record {
            fields: row
                .iter()
                .map(|(name, value)| (name.to_string(), value.clone()))
                .collect(),
        })
    }
}

/// Column → value mapping supplied to inserts and updates.
///
/// Order is the caller's; it becomes the column order of the generated statement.
/// Setting the same column twice replaces the earlier value in place.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Fields {
    entries: Vec<(String, RowValues)>,
}

impl Fields {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn set(mut self, column: impl Into<String>, value: impl Into<RowValues>) -> Self {
        self.insert(column, value);
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<RowValues>) {
        let column = column.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(name, _)| *name == column) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((column, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RowValues)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Fields
where
    K: Into<String>,
    V: Into<RowValues>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Fields::new();
        for (column, value) in iter {
            fields.insert(column, value);
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn record_copies_row_in_column_order() {
        let row = Row::new(
            Arc::new(vec!["id".into(), "name".into()]),
            vec![RowValues::Int(1), RowValues::Text("Ann".into())],
        );
        let record = Record::from_row(&row).unwrap();
        assert_eq!(record.len(), 2);
        assert_eq!(record.get("name"), Some(&RowValues::Text("Ann".into())));
        let names: Vec<&str> = record.fields().map(|(name, _)| name).collect();
        assert_eq!(names, ["id", "name"]);
    }

    #[test]
    fn fields_keep_first_position_on_overwrite() {
        let fields = Fields::new().set("b", 1).set("a", 2).set("b", 3);
        let collected: Vec<_> = fields.iter().collect();
        assert_eq!(
            collected,
            [("b", &RowValues::Int(3)), ("a", &RowValues::Int(2))]
        );
    }
}
