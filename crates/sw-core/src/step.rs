//! Declarative migration steps
//!
//! A [`MigrationStep`] describes one desired change to the schema together
//! with everything needed to check whether the change has already happened.
//! Steps are plain data: they render their own DDL/DML but never execute it.

use crate::error::{CoreError, CoreResult};
use crate::references::extract_references;
use crate::sql_utils::quote_ident;
use crate::step_name::StepName;
use crate::table_name::TableName;
use crate::value::SqlValue;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// One unit of desired schema change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationStep {
    /// Stable identifier, unique within a plan
    pub name: StepName,

    /// What the step changes
    #[serde(flatten)]
    pub kind: StepKind,

    /// Steps whose target objects must exist before this one runs
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<StepName>,

    /// Atomic group label; steps sharing a label commit or roll back together
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

/// The three built-in step kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepKind {
    /// Create a table if it does not exist
    CreateTable(CreateTable),
    /// Add a column to an existing table if it is missing
    AddColumn(AddColumn),
    /// Insert a row unless one with the same natural key exists
    SeedRow(SeedRow),
}

/// Create-table payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateTable {
    /// Table to create
    pub table: TableName,

    /// Column definitions, in table order
    pub columns: Vec<ColumnDef>,

    /// Table-level constraints, e.g. `PRIMARY KEY (id)` or
    /// `FOREIGN KEY (user_id) REFERENCES users (id)`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<String>,
}

/// A column inside a [`CreateTable`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnDef {
    /// Column name
    pub name: String,

    /// Declared SQL type
    #[serde(rename = "type")]
    pub data_type: String,

    /// Inline constraint text, e.g. `NOT NULL REFERENCES users (id)`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<String>,
}

impl ColumnDef {
    /// Create a column with no inline constraints.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            constraints: None,
        }
    }

    /// Attach inline constraint text.
    pub fn with_constraints(mut self, constraints: impl Into<String>) -> Self {
        self.constraints = Some(constraints.into());
        self
    }

    fn render(&self) -> String {
        match self.constraints.as_deref().map(str::trim) {
            Some(c) if !c.is_empty() => {
                format!("{} {} {}", quote_ident(&self.name), self.data_type, c)
            }
            _ => format!("{} {}", quote_ident(&self.name), self.data_type),
        }
    }
}

/// Add-column payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddColumn {
    /// Table that must already exist
    pub table: TableName,

    /// Column to add
    pub column: String,

    /// Declared SQL type
    #[serde(rename = "type")]
    pub data_type: String,

    /// Optional default for existing and future rows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<SqlValue>,
}

/// Seed-row payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedRow {
    /// Table that receives the row
    pub table: TableName,

    /// Column values of the row
    pub values: BTreeMap<String, SqlValue>,

    /// Natural-key columns; empty means every column in `values`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key: Vec<String>,
}

impl CreateTable {
    /// The `CREATE TABLE` statement.
    pub fn definition(&self) -> String {
        let mut lines: Vec<String> = self.columns.iter().map(ColumnDef::render).collect();
        lines.extend(
            self.constraints
                .iter()
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
        );
        format!(
            "CREATE TABLE {} (\n    {}\n)",
            self.table.quoted(),
            lines.join(",\n    ")
        )
    }

    /// Tables named in `REFERENCES` clauses, excluding the table itself.
    pub fn referenced_tables(&self) -> Result<Vec<TableName>, String> {
        let mut seen: Vec<TableName> = Vec::new();
        let fragments = self
            .columns
            .iter()
            .filter_map(|c| c.constraints.as_deref())
            .chain(self.constraints.iter().map(String::as_str));

        for fragment in fragments {
            for name in extract_references(fragment)? {
                let Some(table) = TableName::try_new(name) else {
                    continue;
                };
                if table.same_relation(&self.table) || seen.iter().any(|t| t.same_relation(&table))
                {
                    continue;
                }
                seen.push(table);
            }
        }
        Ok(seen)
    }
}

impl AddColumn {
    /// The `ALTER TABLE ... ADD COLUMN` statement.
    pub fn definition(&self) -> String {
        let mut sql = format!(
            "ALTER TABLE {} ADD COLUMN {} {}",
            self.table.quoted(),
            quote_ident(&self.column),
            self.data_type
        );
        if let Some(default) = &self.default {
            sql.push_str(" DEFAULT ");
            sql.push_str(&default.to_sql_literal());
        }
        sql
    }
}

impl SeedRow {
    /// The natural-key columns used for the existence guard.
    pub fn key_columns(&self) -> Vec<&str> {
        if self.key.is_empty() {
            self.values.keys().map(String::as_str).collect()
        } else {
            self.key.iter().map(String::as_str).collect()
        }
    }

    /// `WHERE` predicate matching rows with this row's natural key.
    ///
    /// `NULL` key values compare with `IS NULL` so a NULL key still matches.
    pub fn predicate(&self) -> String {
        self.key_columns()
            .into_iter()
            .map(|col| match self.values.get(col) {
                Some(value) if !value.is_null() => {
                    format!("{} = {}", quote_ident(col), value.to_sql_literal())
                }
                _ => format!("{} IS NULL", quote_ident(col)),
            })
            .collect::<Vec<_>>()
            .join(" AND ")
    }

    /// Conflict-avoiding insert: the row is written only if no row matches
    /// the natural-key predicate at statement time.
    pub fn definition(&self) -> String {
        let columns: Vec<String> = self.values.keys().map(|c| quote_ident(c)).collect();
        let literals: Vec<String> = self.values.values().map(SqlValue::to_sql_literal).collect();
        let table = self.table.quoted();
        format!(
            "INSERT INTO {table} ({}) SELECT {} WHERE NOT EXISTS (SELECT 1 FROM {table} WHERE {})",
            columns.join(", "),
            literals.join(", "),
            self.predicate()
        )
    }
}

impl StepKind {
    /// Short label used in logs and reports.
    pub fn label(&self) -> &'static str {
        match self {
            StepKind::CreateTable(_) => "create_table",
            StepKind::AddColumn(_) => "add_column",
            StepKind::SeedRow(_) => "seed_row",
        }
    }

    /// The table this step creates or changes.
    pub fn target_table(&self) -> &TableName {
        match self {
            StepKind::CreateTable(c) => &c.table,
            StepKind::AddColumn(a) => &a.table,
            StepKind::SeedRow(s) => &s.table,
        }
    }

    /// The DDL/DML that realises the step when its target is absent.
    pub fn definition(&self) -> String {
        match self {
            StepKind::CreateTable(c) => c.definition(),
            StepKind::AddColumn(a) => a.definition(),
            StepKind::SeedRow(s) => s.definition(),
        }
    }
}

impl MigrationStep {
    /// A step that creates `table` with `columns`.
    pub fn create_table(
        name: impl Into<String>,
        table: impl Into<String>,
        columns: Vec<ColumnDef>,
    ) -> Self {
        Self::from_kind(
            name,
            StepKind::CreateTable(CreateTable {
                table: TableName::new(table),
                columns,
                constraints: Vec::new(),
            }),
        )
    }

    /// A step that adds `column` of type `data_type` to `table`.
    pub fn add_column(
        name: impl Into<String>,
        table: impl Into<String>,
        column: impl Into<String>,
        data_type: impl Into<String>,
    ) -> Self {
        Self::from_kind(
            name,
            StepKind::AddColumn(AddColumn {
                table: TableName::new(table),
                column: column.into(),
                data_type: data_type.into(),
                default: None,
            }),
        )
    }

    /// A step that inserts `values` into `table` unless a row with the same
    /// `key` columns already exists.
    pub fn seed_row<K, V>(
        name: impl Into<String>,
        table: impl Into<String>,
        values: impl IntoIterator<Item = (K, V)>,
        key: &[&str],
    ) -> Self
    where
        K: Into<String>,
        V: Into<SqlValue>,
    {
        Self::from_kind(
            name,
            StepKind::SeedRow(SeedRow {
                table: TableName::new(table),
                values: values
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
                key: key.iter().map(|k| k.to_string()).collect(),
            }),
        )
    }

    fn from_kind(name: impl Into<String>, kind: StepKind) -> Self {
        Self {
            name: StepName::new(name),
            kind,
            depends_on: Vec::new(),
            group: None,
        }
    }

    /// Declare a dependency on another step.
    pub fn depends_on(mut self, step: impl Into<String>) -> Self {
        self.depends_on.push(StepName::new(step));
        self
    }

    /// Place the step in an atomic group.
    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Add a table-level constraint (create-table steps only; ignored otherwise).
    pub fn with_constraint(mut self, constraint: impl Into<String>) -> Self {
        if let StepKind::CreateTable(create) = &mut self.kind {
            create.constraints.push(constraint.into());
        }
        self
    }

    /// Set the column default (add-column steps only; ignored otherwise).
    pub fn with_default(mut self, default: impl Into<SqlValue>) -> Self {
        if let StepKind::AddColumn(add) = &mut self.kind {
            add.default = Some(default.into());
        }
        self
    }

    /// The table this step creates or changes.
    pub fn target_table(&self) -> &TableName {
        self.kind.target_table()
    }

    /// The DDL/DML that realises the step when its target is absent.
    pub fn definition(&self) -> String {
        self.kind.definition()
    }

    /// Tables this step needs to exist before its statement can succeed,
    /// other than its own target.
    pub fn referenced_tables(&self) -> CoreResult<Vec<TableName>> {
        match &self.kind {
            StepKind::CreateTable(c) => {
                c.referenced_tables()
                    .map_err(|message| CoreError::SqlTokenize {
                        name: self.name.to_string(),
                        message,
                    })
            }
            StepKind::AddColumn(_) | StepKind::SeedRow(_) => Ok(Vec::new()),
        }
    }

    /// Check structural rules that do not need a database.
    pub fn validate(&self) -> CoreResult<()> {
        let invalid = |reason: String| CoreError::InvalidStep {
            name: self.name.to_string(),
            reason,
        };

        if !self.target_table().is_well_formed() {
            return Err(invalid(format!(
                "table name '{}' must be 'table' or 'schema.table'",
                self.target_table()
            )));
        }

        match &self.kind {
            StepKind::CreateTable(c) => {
                if c.columns.is_empty() {
                    return Err(invalid("create_table needs at least one column".into()));
                }
                let mut seen = HashSet::new();
                for col in &c.columns {
                    if col.name.trim().is_empty() || col.data_type.trim().is_empty() {
                        return Err(invalid("column name and type must not be empty".into()));
                    }
                    if !seen.insert(col.name.to_ascii_lowercase()) {
                        return Err(invalid(format!("duplicate column '{}'", col.name)));
                    }
                }
            }
            StepKind::AddColumn(a) => {
                if a.column.trim().is_empty() || a.data_type.trim().is_empty() {
                    return Err(invalid("column name and type must not be empty".into()));
                }
            }
            StepKind::SeedRow(s) => {
                if s.values.is_empty() {
                    return Err(invalid("seed_row needs at least one value".into()));
                }
                if let Some(missing) = s.key.iter().find(|k| !s.values.contains_key(*k)) {
                    return Err(invalid(format!(
                        "key column '{missing}' has no value in the row"
                    )));
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for MigrationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} {})", self.name, self.kind.label(), self.target_table())
    }
}

#[cfg(test)]
#[path = "step_test.rs"]
mod tests;
