use std::sync::Arc;

use crate::error::SqlTableError;
use crate::results::ResultSet;
use crate::types::RowValues;

/// Step through Turso rows and collect them.
///
/// # Errors
/// Returns `SqlTableError::TursoError` if stepping or reading a value fails.
pub async fn build_result_set(
    mut rows: turso::Rows,
    column_names: Arc<Vec<String>>,
) -> Result<ResultSet, SqlTableError> {
    let mut result_set = ResultSet::with_capacity(16);
    result_set.set_column_names(column_names);

    while let Some(row) = rows.next().await? {
        let mut values: Vec<RowValues> = Vec::with_capacity(row.column_count());
        for idx in 0..row.column_count() {
            let rv = match row.get_value(idx)? {
                turso::Value::Null => RowValues::Null,
                turso::Value::Integer(i) => RowValues::Int(i),
                turso::Value::Real(f) => RowValues::Float(f),
                turso::Value::Text(s) => RowValues::Text(s),
                turso::Value::Blob(b) => RowValues::Blob(b),
            };
            values.push(rv);
        }
        result_set.add_row_values(values);
    }

    Ok(result_set)
}
