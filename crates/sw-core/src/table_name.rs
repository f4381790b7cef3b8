//! Strongly-typed table name wrapper.

use crate::newtype_string::define_newtype_string;
use crate::sql_utils::{quote_qualified, split_qualified_name};

define_newtype_string! {
    /// Strongly-typed wrapper for table names (potentially schema-qualified like "schema.table").
    ///
    /// Prevents accidental mixing of table names with step names or column names.
    pub struct TableName;
}

impl TableName {
    /// Split into `(schema, table)`, defaulting the schema to `main`.
    pub fn parts(&self) -> (&str, &str) {
        split_qualified_name(self.as_str())
    }

    /// The table name quoted for use in SQL text.
    pub fn quoted(&self) -> String {
        quote_qualified(self.as_str())
    }

    /// Whether the name is `table` or `schema.table` with no empty part.
    ///
    /// Catalog-qualified names are not accepted: the catalog lookups match on
    /// schema and table only.
    pub fn is_well_formed(&self) -> bool {
        let parts: Vec<&str> = self.as_str().split('.').collect();
        parts.len() <= 2 && parts.iter().all(|p| !p.trim().is_empty())
    }

    /// Whether two names refer to the same relation.
    ///
    /// Unqualified names live in `main`, and identifier resolution is
    /// case-insensitive.
    pub fn same_relation(&self, other: &TableName) -> bool {
        let (schema_a, table_a) = self.parts();
        let (schema_b, table_b) = other.parts();
        schema_a.eq_ignore_ascii_case(schema_b) && table_a.eq_ignore_ascii_case(table_b)
    }
}
