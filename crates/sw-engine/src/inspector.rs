//! Live schema inspection
//!
//! Every guard question a step asks goes through [`SchemaInspector`]. Answers
//! are read from the catalog on each call and never cached, so a step sees
//! the effects of every step applied before it in the same transaction.

use crate::error::StepError;
use std::collections::BTreeMap;
use sw_core::TableName;
use sw_db::{ColumnInfo, Database, DbError};

/// Read-only view of the live catalog.
pub struct SchemaInspector<'a> {
    db: &'a dyn Database,
}

impl<'a> SchemaInspector<'a> {
    /// Inspect through the given connection.
    pub fn new(db: &'a dyn Database) -> Self {
        Self { db }
    }

    /// Whether a base table with this name exists.
    pub async fn table_exists(&self, table: &TableName) -> Result<bool, StepError> {
        self.db
            .table_exists(table.as_str())
            .await
            .map_err(|e| inspection_failure("table lookup", table, e))
    }

    /// Whether `table` has a column named `column`.
    ///
    /// A missing table answers `false`.
    pub async fn column_exists(&self, table: &TableName, column: &str) -> Result<bool, StepError> {
        Ok(self.column_type(table, column).await?.is_some())
    }

    /// The catalog type of a column, if the column exists.
    pub async fn column_type(
        &self,
        table: &TableName,
        column: &str,
    ) -> Result<Option<String>, StepError> {
        self.db
            .column_type(table.as_str(), column)
            .await
            .map_err(|e| inspection_failure("column lookup", table, e))
    }

    /// Whether any row of `table` satisfies `predicate`.
    pub async fn row_exists(&self, table: &TableName, predicate: &str) -> Result<bool, StepError> {
        self.db
            .row_exists(table.as_str(), predicate)
            .await
            .map_err(|e| inspection_failure("row lookup", table, e))
    }

    /// Number of rows currently in `table`.
    pub async fn row_count(&self, table: &TableName) -> Result<usize, StepError> {
        self.db
            .query_count(&format!("SELECT * FROM {}", table.quoted()))
            .await
            .map_err(|e| inspection_failure("row count", table, e))
    }

    /// Capture the current shape of the given tables.
    ///
    /// Tables that do not exist are left out of the snapshot.
    pub async fn snapshot(&self, tables: &[TableName]) -> Result<SchemaSnapshot, StepError> {
        let mut snapshot = SchemaSnapshot::default();
        for table in tables {
            if !self.table_exists(table).await? {
                continue;
            }
            let columns = self
                .db
                .table_columns(table.as_str())
                .await
                .map_err(|e| inspection_failure("column listing", table, e))?;
            snapshot.tables.insert(table.clone(), columns);
        }
        Ok(snapshot)
    }
}

fn inspection_failure(what: &str, table: &TableName, err: DbError) -> StepError {
    StepError::InspectionFailure(format!("{what} for {table} failed: {err}"))
}

/// Point-in-time shape of a set of tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaSnapshot {
    tables: BTreeMap<TableName, Vec<ColumnInfo>>,
}

impl SchemaSnapshot {
    /// Whether the table was present when the snapshot was taken.
    pub fn has_table(&self, table: &str) -> bool {
        self.columns(table).is_some()
    }

    /// Columns of a captured table, in ordinal order.
    pub fn columns(&self, table: &str) -> Option<&[ColumnInfo]> {
        let wanted = TableName::try_new(table)?;
        self.tables
            .iter()
            .find(|(name, _)| name.same_relation(&wanted))
            .map(|(_, columns)| columns.as_slice())
    }

    /// Catalog type of a captured column.
    pub fn column_type(&self, table: &str, column: &str) -> Option<&str> {
        self.columns(table)?
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(column))
            .map(|c| c.data_type.as_str())
    }

    /// Captured tables in name order.
    pub fn tables(&self) -> impl Iterator<Item = (&TableName, &[ColumnInfo])> {
        self.tables.iter().map(|(name, cols)| (name, cols.as_slice()))
    }

    /// Number of captured tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether no table was captured.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
#[path = "inspector_test.rs"]
mod tests;
