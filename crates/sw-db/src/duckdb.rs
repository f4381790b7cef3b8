//! DuckDB database backend implementation

use crate::error::{DbError, DbResult};
use crate::traits::{ColumnInfo, DatabaseCore, DatabaseSchema, DatabaseTransaction};
use async_trait::async_trait;
use duckdb::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use sw_core::sql_utils::{quote_qualified, split_qualified_name};

/// DuckDB database backend
///
/// Holds a single connection; a transaction opened with
/// [`DatabaseTransaction::begin`] spans every call until commit or rollback.
pub struct DuckDbBackend {
    conn: Mutex<Connection>,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    /// Execute SQL synchronously
    fn execute_sync(&self, sql: &str) -> DbResult<usize> {
        let conn = self.lock()?;
        conn.execute(sql, [])
            .map_err(|e| DbError::ExecutionError(format!("{}: {}", e, sql)))
    }

    /// Execute batch SQL synchronously
    fn execute_batch_sync(&self, sql: &str) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(sql)
            .map_err(|e| DbError::ExecutionError(e.to_string()))
    }

    /// Query count synchronously
    fn query_count_sync(&self, sql: &str) -> DbResult<usize> {
        let conn = self.lock()?;
        let count: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM ({})", sql), [], |row| {
                row.get(0)
            })
            .map_err(|e| DbError::ExecutionError(e.to_string()))?;
        Ok(count as usize)
    }

    /// Run a transaction-control statement
    fn transaction_sync(&self, statement: &str) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(statement)
            .map_err(|e| DbError::TransactionError(format!("{statement} failed: {e}")))
    }

    /// Check if a base table exists synchronously
    fn table_exists_sync(&self, name: &str) -> DbResult<bool> {
        let conn = self.lock()?;
        let (schema, table) = split_qualified_name(name);

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM information_schema.tables \
                 WHERE lower(table_schema) = lower(?) AND lower(table_name) = lower(?) \
                 AND table_type = 'BASE TABLE'",
                duckdb::params![schema, table],
                |row| row.get(0),
            )
            .map_err(|e| DbError::ExecutionError(e.to_string()))?;

        Ok(count > 0)
    }

    /// List columns of a table synchronously
    fn table_columns_sync(&self, name: &str) -> DbResult<Vec<ColumnInfo>> {
        let conn = self.lock()?;
        let (schema, table) = split_qualified_name(name);

        let mut stmt = conn
            .prepare(
                "SELECT column_name, data_type, is_nullable FROM information_schema.columns \
                 WHERE lower(table_schema) = lower(?) AND lower(table_name) = lower(?) \
                 ORDER BY ordinal_position",
            )
            .map_err(|e| DbError::ExecutionError(e.to_string()))?;

        let rows = stmt
            .query_map(duckdb::params![schema, table], |row| {
                let nullable: String = row.get(2)?;
                Ok(ColumnInfo {
                    name: row.get(0)?,
                    data_type: row.get(1)?,
                    nullable: nullable.eq_ignore_ascii_case("YES"),
                })
            })
            .map_err(|e| DbError::ExecutionError(e.to_string()))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| DbError::ExecutionError(e.to_string()))
    }

    /// Check for a matching row synchronously
    fn row_exists_sync(&self, table: &str, predicate: &str) -> DbResult<bool> {
        let conn = self.lock()?;
        let sql = format!(
            "SELECT COUNT(*) FROM {} WHERE {}",
            quote_qualified(table),
            predicate
        );
        let count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count > 0)
    }
}

#[async_trait]
impl DatabaseCore for DuckDbBackend {
    async fn execute(&self, sql: &str) -> DbResult<usize> {
        self.execute_sync(sql)
    }

    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.execute_batch_sync(sql)
    }

    async fn query_count(&self, sql: &str) -> DbResult<usize> {
        self.query_count_sync(sql)
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

#[async_trait]
impl DatabaseTransaction for DuckDbBackend {
    async fn begin(&self) -> DbResult<()> {
        log::debug!("BEGIN TRANSACTION");
        self.transaction_sync("BEGIN TRANSACTION")
    }

    async fn commit(&self) -> DbResult<()> {
        log::debug!("COMMIT");
        self.transaction_sync("COMMIT")
    }

    async fn rollback(&self) -> DbResult<()> {
        log::debug!("ROLLBACK");
        self.transaction_sync("ROLLBACK")
    }
}

#[async_trait]
impl DatabaseSchema for DuckDbBackend {
    async fn table_exists(&self, table: &str) -> DbResult<bool> {
        self.table_exists_sync(table)
    }

    async fn table_columns(&self, table: &str) -> DbResult<Vec<ColumnInfo>> {
        self.table_columns_sync(table)
    }

    async fn column_type(&self, table: &str, column: &str) -> DbResult<Option<String>> {
        let columns = self.table_columns_sync(table)?;
        Ok(columns
            .into_iter()
            .find(|c| c.name.eq_ignore_ascii_case(column))
            .map(|c| c.data_type))
    }

    async fn row_exists(&self, table: &str, predicate: &str) -> DbResult<bool> {
        self.row_exists_sync(table, predicate)
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
