//! sw-db - Database abstraction layer for Sweep
//!
//! This crate provides the `Database` trait family (statement execution,
//! transaction control, catalog introspection) and its DuckDB implementation.

pub mod duckdb;
pub mod error;
pub mod traits;

pub use crate::duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use traits::{ColumnInfo, Database, DatabaseCore, DatabaseSchema, DatabaseTransaction};
