//! Write-side statements: `INSERT` and `UPDATE`.

use super::{Condition, QueryAndParams, build_where};
use crate::error::SqlTableError;
use crate::record::Fields;
use crate::schema::Schema;
use crate::types::RowValues;

/// A parameterized `INSERT` plus the columns a cursor-style backend should return.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
    pub query: String,
    pub params: Vec<RowValues>,
    /// Declared columns, in schema order, for `RETURNING`.
    pub returning: Vec<String>,
}

impl InsertStatement {
    /// The same insert with a `RETURNING` clause over the declared columns.
    #[must_use]
    pub fn returning_sql(&self) -> String {
        format!("{} RETURNING {}", self.query, self.returning.join(", "))
    }
}

/// Keep only the fields whose column the schema declares, in the caller's order.
#[must_use]
pub fn declared_fields<'a>(schema: &Schema, fields: &'a Fields) -> Vec<(&'a str, &'a RowValues)> {
    fields
        .iter()
        .filter(|(column, _)| {
            let keep = schema.contains(column);
            if !keep {
                tracing::trace!(table = schema.name(), column, "dropping undeclared field");
            }
            keep
        })
        .collect()
}

/// `INSERT INTO <table> (<cols>) VALUES (?, ...)` using the caller's field order.
///
/// # Errors
/// Returns `SqlTableError::InvalidArgument` when no declared column is left to insert.
pub fn insert(schema: &Schema, fields: &Fields) -> Result<InsertStatement, SqlTableError> {
    let kept = declared_fields(schema, fields);
    if kept.is_empty() {
        return Err(SqlTableError::InvalidArgument(format!(
            "insert into {} needs at least one declared column",
            schema.name()
        )));
    }

    let columns: Vec<&str> = kept.iter().map(|(column, _)| *column).collect();
    let placeholders = vec!["?"; kept.len()].join(", ");
    Ok(InsertStatement {
        query: format!(
            "INSERT INTO {} ({}) VALUES ({placeholders})",
            schema.name(),
            columns.join(", ")
        ),
        params: kept.into_iter().map(|(_, value)| value.clone()).collect(),
        returning: schema.column_names(),
    })
}

/// `UPDATE <table> SET <col> = ?, ...` with an optional where clause.
///
/// Parameters are the SET values first, then the where values.
///
/// # Errors
/// Returns `SqlTableError::InvalidArgument` when no declared column is left to set, and
/// propagates where-clause errors.
pub fn update(
    schema: &Schema,
    fields: &Fields,
    conditions: &[Condition],
) -> Result<QueryAndParams, SqlTableError> {
    let kept = declared_fields(schema, fields);
    if kept.is_empty() {
        return Err(SqlTableError::InvalidArgument(format!(
            "update of {} needs at least one declared column to set",
            schema.name()
        )));
    }

    let assignments: Vec<String> = kept.iter().map(|(column, _)| format!("{column} = ?")).collect();
    let mut out = QueryAndParams {
        query: format!("UPDATE {} SET {}", schema.name(), assignments.join(", ")),
        params: kept.into_iter().map(|(_, value)| value.clone()).collect(),
    };
    out.push_clause(build_where(schema, conditions)?);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnDefinition, DataType};

    fn schema() -> Schema {
        Schema::builder("people")
            .column("id", ColumnDefinition::integer_key())
            .column("name", ColumnDefinition::new(DataType::Text))
            .column("age", ColumnDefinition::new(DataType::Integer).nullable())
            .build()
            .unwrap()
    }

    #[test]
    fn insert_uses_field_order() {
        let fields = Fields::new().set("age", 30).set("name", "Ann").set("extra", 1);
        let stmt = insert(&schema(), &fields).unwrap();
        assert_eq!(stmt.query, "INSERT INTO people (age, name) VALUES (?, ?)");
        assert_eq!(
            stmt.params,
            vec![RowValues::Int(30), RowValues::Text("Ann".into())]
        );
        assert_eq!(
            stmt.returning_sql(),
            "INSERT INTO people (age, name) VALUES (?, ?) RETURNING id, name, age"
        );
    }

    #[test]
    fn insert_without_declared_fields_fails() {
        let err = insert(&schema(), &Fields::new().set("nope", 1)).unwrap_err();
        assert!(matches!(err, SqlTableError::InvalidArgument(_)));
    }

    #[test]
    fn update_binds_set_values_before_where_values() {
        let fields = Fields::new().set("name", "Tom").set("age", 41);
        let built = update(&schema(), &fields, &[Condition::eq("id", 7)]).unwrap();
        assert_eq!(built.query, "UPDATE people SET name = ?, age = ? WHERE id = ?");
        assert_eq!(
            built.params,
            vec![
                RowValues::Text("Tom".into()),
                RowValues::Int(41),
                RowValues::Int(7)
            ]
        );
    }

    #[test]
    fn empty_update_fails_regardless_of_conditions() {
        for conditions in [vec![], vec![Condition::eq("id", 1)]] {
            let err = update(&schema(), &Fields::new(), &conditions).unwrap_err();
            assert!(matches!(err, SqlTableError::InvalidArgument(_)));
        }
        let only_unknown = Fields::new().set("ghost", 1);
        assert!(update(&schema(), &only_unknown, &[]).is_err());
    }
}
