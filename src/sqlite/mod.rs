// SQLite module - rusqlite engine with direct statement execution
//
// - config: options, builder and handle construction
// - params: conversion from RowValues to rusqlite values
// - query: reading rusqlite rows into a ResultSet
// - executor: the Backend implementation

pub mod config;
pub mod executor;
pub mod params;
pub mod query;

pub use config::{SqliteOptions, SqliteOptionsBuilder};
pub use executor::SqliteEngine;
pub use params::Params;
pub use query::build_result_set;
