// Turso module - in-process SQLite-compatible engine driven through prepared statements
//
// Mirrors the sqlite module layout:
// - config: options, builder and handle construction
// - params: conversion from RowValues to turso values
// - query: stepping turso rows into a ResultSet
// - executor: the Backend implementation

pub mod config;
pub mod executor;
pub mod params;
pub mod query;

pub use config::{TursoOptions, TursoOptionsBuilder};
pub use executor::TursoEngine;
pub use params::Params;
pub use query::build_result_set;
