use crate::types::RowValues;

/// Positional Turso parameters.
pub struct Params(pub turso::params::Params);

fn row_value_to_turso_value(value: &RowValues) -> turso::Value {
    match value {
        RowValues::Int(i) => turso::Value::Integer(*i),
        RowValues::Float(f) => turso::Value::Real(*f),
        RowValues::Text(s) => turso::Value::Text(s.clone()),
        RowValues::Bool(b) => turso::Value::Integer(i64::from(*b)),
        // Same TEXT layout as the rusqlite engine so rows read identically on both.
        RowValues::Timestamp(dt) => turso::Value::Text(RowValues::timestamp_text(dt)),
        RowValues::Null => turso::Value::Null,
        RowValues::JSON(j) => turso::Value::Text(j.to_string()),
        RowValues::Blob(bytes) => turso::Value::Blob(bytes.clone()),
    }
}

impl Params {
    #[must_use]
    pub fn convert(params: &[RowValues]) -> Self {
        let values: Vec<turso::Value> = params.iter().map(row_value_to_turso_value).collect();
        Params(turso::params::Params::Positional(values))
    }
}
