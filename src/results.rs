//! Raw rows as returned by an engine, before any row factory runs.

pub mod result_set;
pub mod row;

pub use result_set::ResultSet;
pub use row::Row;
