//! Turns structured filters into SQL clauses plus positional parameters.
//!
//! Everything here is pure: the same schema and options always produce the same SQL text
//! and the same parameter vector, and nothing is executed. Columns that the schema does not
//! declare are ignored rather than rejected, for conditions as well as ordering.

use std::fmt;

use crate::error::SqlTableError;
use crate::schema::Schema;
use crate::types::RowValues;

mod de;
pub mod dml;
pub mod select;

/// SQL text together with the values for its `?` placeholders, in placeholder order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryAndParams {
    pub query: String,
    pub params: Vec<RowValues>,
}

impl QueryAndParams {
    /// Append another fragment, separated by a single space.
    pub(crate) fn push_clause(&mut self, clause: QueryAndParams) {
        if clause.query.is_empty() {
            return;
        }
        if !self.query.is_empty() {
            self.query.push(' ');
        }
        self.query.push_str(&clause.query);
        self.params.extend(clause.params);
    }
}

/// Comparison operators allowed in a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
}

impl Operator {
    #[must_use]
    pub fn as_sql(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Ge => ">=",
            Operator::Le => "<=",
        }
    }

    /// Parse the textual form; `<>` is accepted for `!=`.
    #[must_use]
    pub fn parse(op: &str) -> Option<Self> {
        match op.trim() {
            "=" | "==" => Some(Operator::Eq),
            "!=" | "<>" => Some(Operator::Ne),
            ">" => Some(Operator::Gt),
            "<" => Some(Operator::Lt),
            ">=" => Some(Operator::Ge),
            "<=" => Some(Operator::Le),
            _ => None,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Right-hand side of a condition.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionValue {
    /// A single operand.
    One(RowValues),
    /// Matches when any member matches; rendered as an OR group.
    Any(Vec<RowValues>),
}

/// One filter predicate.
///
/// A condition without an operator is skipped when clauses are built.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub column: String,
    pub operator: Option<Operator>,
    pub value: ConditionValue,
}

impl Condition {
    #[must_use]
    pub fn new(column: impl Into<String>, operator: Operator, value: impl Into<RowValues>) -> Self {
        Self {
            column: column.into(),
            operator: Some(operator),
            value: ConditionValue::One(value.into()),
        }
    }

    /// `column op v1 OR column op v2 ...`
    #[must_use]
    pub fn any<I, V>(column: impl Into<String>, operator: Operator, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<RowValues>,
    {
        Self {
            column: column.into(),
            operator: Some(operator),
            value: ConditionValue::Any(values.into_iter().map(Into::into).collect()),
        }
    }

    #[must_use]
    pub fn eq(column: impl Into<String>, value: impl Into<RowValues>) -> Self {
        Self::new(column, Operator::Eq, value)
    }

    #[must_use]
    pub fn ne(column: impl Into<String>, value: impl Into<RowValues>) -> Self {
        Self::new(column, Operator::Ne, value)
    }

    #[must_use]
    pub fn gt(column: impl Into<String>, value: impl Into<RowValues>) -> Self {
        Self::new(column, Operator::Gt, value)
    }

    #[must_use]
    pub fn lt(column: impl Into<String>, value: impl Into<RowValues>) -> Self {
        Self::new(column, Operator::Lt, value)
    }

    #[must_use]
    pub fn ge(column: impl Into<String>, value: impl Into<RowValues>) -> Self {
        Self::new(column, Operator::Ge, value)
    }

    #[must_use]
    pub fn le(column: impl Into<String>, value: impl Into<RowValues>) -> Self {
        Self::new(column, Operator::Le, value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    #[must_use]
    pub fn as_sql(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// One `ORDER BY` entry; no direction means ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub direction: Option<Direction>,
}

/// Filtering, ordering and limit for reads and deletes.
///
/// ```rust
/// use sql_table::prelude::*;
///
/// let opts = GetOptions::new()
///     .filter(Condition::eq("name", "Ann"))
///     .order_by("id", Direction::Desc)
///     .limit(5);
/// # let _ = opts;
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GetOptions {
    pub conditions: Vec<Condition>,
    pub order: Vec<OrderBy>,
    pub limit: Option<i64>,
}

impl GetOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options that only filter.
    #[must_use]
    pub fn matching(conditions: Vec<Condition>) -> Self {
        Self {
            conditions,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn filter(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    #[must_use]
    pub fn order_by(mut self, column: impl Into<String>, direction: Direction) -> Self {
        self.order.push(OrderBy {
            column: column.into(),
            direction: Some(direction),
        });
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Render `WHERE`, `ORDER BY` and `LIMIT` for `options`, in that order.
///
/// Returns an empty query when no clause applies.
///
/// # Errors
/// Returns `SqlTableError::InvalidArgument` when a NULL operand is used with an ordering
/// operator.
pub fn build_clauses(schema: &Schema, options: &GetOptions) -> Result<QueryAndParams, SqlTableError> {
    let mut out = build_where(schema, &options.conditions)?;
    out.push_clause(build_order_by(schema, &options.order));
    out.push_clause(build_limit(options.limit));
    Ok(out)
}

/// Render only the `WHERE` clause; empty when no condition survives filtering.
///
/// NULL operands compare with `IS NULL` / `IS NOT NULL` and take no placeholder.
///
/// # Errors
/// Returns `SqlTableError::InvalidArgument` when a NULL operand is used with `>`, `<`,
/// `>=` or `<=`.
pub fn build_where(
    schema: &Schema,
    conditions: &[Condition],
) -> Result<QueryAndParams, SqlTableError> {
    let mut predicates = Vec::with_capacity(conditions.len());
    let mut params = Vec::new();

    for condition in conditions {
        if !schema.contains(&condition.column) {
            tracing::trace!(
                table = schema.name(),
                column = %condition.column,
                "dropping condition on undeclared column"
            );
            continue;
        }
        let Some(op) = condition.operator else {
            continue;
        };
        match &condition.value {
            ConditionValue::One(value) => {
                predicates.push(comparison(&condition.column, op, value, &mut params)?);
            }
            ConditionValue::Any(values) => {
                if values.is_empty() {
                    continue;
                }
                let members = values
                    .iter()
                    .map(|value| comparison(&condition.column, op, value, &mut params))
                    .collect::<Result<Vec<_>, _>>()?;
                predicates.push(format!("({})", members.join(" OR ")));
            }
        }
    }

    if predicates.is_empty() {
        return Ok(QueryAndParams::default());
    }
    Ok(QueryAndParams {
        query: format!("WHERE {}", predicates.join(" AND ")),
        params,
    })
}

fn comparison(
    column: &str,
    op: Operator,
    value: &RowValues,
    params: &mut Vec<RowValues>,
) -> Result<String, SqlTableError> {
    if value.is_null() {
        return match op {
            Operator::Eq => Ok(format!("{column} IS NULL")),
            Operator::Ne => Ok(format!("{column} IS NOT NULL")),
            _ => Err(SqlTableError::InvalidArgument(format!(
                "NULL cannot be compared with {op} on column {column}"
            ))),
        };
    }
    params.push(value.clone());
    Ok(format!("{column} {op} ?"))
}

fn build_order_by(schema: &Schema, order: &[OrderBy]) -> QueryAndParams {
    let terms: Vec<String> = order
        .iter()
        .filter(|entry| schema.contains(&entry.column))
        .map(|entry| {
            format!(
                "{} {}",
                entry.column,
                entry.direction.unwrap_or_default().as_sql()
            )
        })
        .collect();
    if terms.is_empty() {
        return QueryAndParams::default();
    }
    QueryAndParams {
        query: format!("ORDER BY {}", terms.join(", ")),
        params: Vec::new(),
    }
}

fn build_limit(limit: Option<i64>) -> QueryAndParams {
    match limit {
        Some(n) if n > 0 => QueryAndParams {
            query: format!("LIMIT {n}"),
            params: Vec::new(),
        },
        _ => QueryAndParams::default(),
    }
}
