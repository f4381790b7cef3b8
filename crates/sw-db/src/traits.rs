//! Database trait definitions
//!
//! The traits are split by concern; [`Database`] is the umbrella the engine
//! consumes and is implemented automatically for any type implementing all
//! of them.

use crate::error::DbResult;
use async_trait::async_trait;

/// A column as reported by the live catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    /// Column name
    pub name: String,
    /// Catalog type name (e.g. `VARCHAR`, `INTEGER`)
    pub data_type: String,
    /// Whether the column accepts NULL
    pub nullable: bool,
}

/// Statement execution.
#[async_trait]
pub trait DatabaseCore: Send + Sync {
    /// Execute SQL that modifies data, returns affected rows
    async fn execute(&self, sql: &str) -> DbResult<usize>;

    /// Execute multiple SQL statements
    async fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Execute query returning row count
    async fn query_count(&self, sql: &str) -> DbResult<usize>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}

/// Explicit transaction control on the backend's single connection.
#[async_trait]
pub trait DatabaseTransaction: Send + Sync {
    /// Open a transaction
    async fn begin(&self) -> DbResult<()>;

    /// Commit the open transaction
    async fn commit(&self) -> DbResult<()>;

    /// Roll back the open transaction
    async fn rollback(&self) -> DbResult<()>;
}

/// Read-only catalog introspection.
///
/// Table names may be schema-qualified; unqualified names resolve to the
/// backend's default schema. Matching is case-insensitive.
#[async_trait]
pub trait DatabaseSchema: Send + Sync {
    /// Check if a base table exists
    async fn table_exists(&self, table: &str) -> DbResult<bool>;

    /// Columns of a table in ordinal order; empty if the table does not exist
    async fn table_columns(&self, table: &str) -> DbResult<Vec<ColumnInfo>>;

    /// Catalog type of a column, or `None` if the column does not exist
    async fn column_type(&self, table: &str, column: &str) -> DbResult<Option<String>>;

    /// Check if any row of `table` satisfies the SQL `predicate`
    async fn row_exists(&self, table: &str, predicate: &str) -> DbResult<bool>;
}

/// Full database interface used by the migration engine.
pub trait Database: DatabaseCore + DatabaseTransaction + DatabaseSchema {}

impl<T> Database for T where T: DatabaseCore + DatabaseTransaction + DatabaseSchema {}
