//! Read-side statements: `SELECT`, `SELECT COUNT(*)` and `DELETE`.

use super::{Condition, GetOptions, QueryAndParams, build_clauses, build_where};
use crate::error::SqlTableError;
use crate::schema::Schema;
use crate::types::RowValues;

/// `SELECT * FROM <table>` followed by the option clauses.
///
/// # Errors
/// Propagates clause-building errors (see [`build_clauses`]).
pub fn select(schema: &Schema, options: &GetOptions) -> Result<QueryAndParams, SqlTableError> {
    Ok(with_prefix(
        format!("SELECT * FROM {}", schema.name()),
        build_clauses(schema, options)?,
    ))
}

/// `SELECT * FROM <table> WHERE <column> = ?`, used to re-read an inserted row.
#[must_use]
pub fn select_by(schema: &Schema, column: &str, value: RowValues) -> QueryAndParams {
    QueryAndParams {
        query: format!("SELECT * FROM {} WHERE {column} = ?", schema.name()),
        params: vec![value],
    }
}

/// `SELECT COUNT(*) AS count FROM <table>` with only a where clause.
///
/// # Errors
/// Propagates clause-building errors (see [`build_where`]).
pub fn count(schema: &Schema, conditions: &[Condition]) -> Result<QueryAndParams, SqlTableError> {
    Ok(with_prefix(
        format!("SELECT COUNT(*) AS count FROM {}", schema.name()),
        build_where(schema, conditions)?,
    ))
}

/// `DELETE FROM <table>` followed by the option clauses.
///
/// Without conditions this removes every row.
///
/// # Errors
/// Propagates clause-building errors (see [`build_clauses`]).
pub fn delete(schema: &Schema, options: &GetOptions) -> Result<QueryAndParams, SqlTableError> {
    Ok(with_prefix(
        format!("DELETE FROM {}", schema.name()),
        build_clauses(schema, options)?,
    ))
}

fn with_prefix(prefix: String, clauses: QueryAndParams) -> QueryAndParams {
    let mut out = QueryAndParams {
        query: prefix,
        params: Vec::new(),
    };
    out.push_clause(clauses);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query_builder::{Direction, Operator};
    use crate::schema::{ColumnDefinition, DataType};

    fn schema() -> Schema {
        Schema::builder("people")
            .column("id", ColumnDefinition::integer_key())
            .column("name", ColumnDefinition::new(DataType::Text))
            .build()
            .unwrap()
    }

    #[test]
    fn select_without_options() {
        let built = select(&schema(), &GetOptions::new()).unwrap();
        assert_eq!(built.query, "SELECT * FROM people");
        assert!(built.params.is_empty());
    }

    #[test]
    fn select_with_all_clauses() {
        let opts = GetOptions::new()
            .filter(Condition::any("name", Operator::Eq, ["a", "b"]))
            .order_by("id", Direction::Desc)
            .limit(2);
        let built = select(&schema(), &opts).unwrap();
        assert_eq!(
            built.query,
            "SELECT * FROM people WHERE (name = ? OR name = ?) ORDER BY id DESC LIMIT 2"
        );
        assert_eq!(built.params.len(), 2);
    }

    #[test]
    fn count_ignores_order_and_limit() {
        let built = count(&schema(), &[Condition::eq("name", "John Smith")]).unwrap();
        assert_eq!(
            built.query,
            "SELECT COUNT(*) AS count FROM people WHERE name = ?"
        );
        assert_eq!(built.params, vec![RowValues::Text("John Smith".into())]);
    }

    #[test]
    fn delete_without_conditions_targets_whole_table() {
        let built = delete(&schema(), &GetOptions::new()).unwrap();
        assert_eq!(built.query, "DELETE FROM people");
    }

    #[test]
    fn select_by_key() {
        let built = select_by(&schema(), "id", RowValues::Int(4));
        assert_eq!(built.query, "SELECT * FROM people WHERE id = ?");
        assert_eq!(built.params, vec![RowValues::Int(4)]);
    }
}
