//! Guard-and-apply logic for each step kind
//!
//! Each kind asks the [`SchemaInspector`] whether its target already exists
//! and only then issues its statement. Nothing here opens or closes a
//! transaction; that belongs to the [`TransactionCoordinator`](crate::TransactionCoordinator).

use crate::error::StepError;
use crate::inspector::SchemaInspector;
use sw_core::sql_utils::normalize_type;
use sw_core::{AddColumn, CreateTable, MigrationStep, Outcome, SeedRow, StepKind, TableName};
use sw_db::Database;

/// A step that completed without error: it was either applied or skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepResult {
    /// [`Outcome::Applied`] or [`Outcome::Skipped`]
    pub outcome: Outcome,
    /// Human-readable detail for the report
    pub detail: String,
}

impl StepResult {
    /// The step made its change.
    pub fn applied(detail: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Applied,
            detail: detail.into(),
        }
    }

    /// The target was already present.
    pub fn skipped(detail: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Skipped,
            detail: detail.into(),
        }
    }
}

/// Run one step's guard and, if needed, its statement.
pub async fn apply_step(db: &dyn Database, step: &MigrationStep) -> Result<StepResult, StepError> {
    let inspector = SchemaInspector::new(db);
    let result = match &step.kind {
        StepKind::CreateTable(create) => create_table(db, &inspector, step, create).await,
        StepKind::AddColumn(add) => add_column(db, &inspector, add).await,
        StepKind::SeedRow(seed) => seed_row(db, &inspector, seed).await,
    };
    match &result {
        Ok(r) => log::debug!("Step '{}' {}: {}", step.name, r.outcome, r.detail),
        Err(e) => log::debug!("Step '{}' failed: {}", step.name, e),
    }
    result
}

async fn create_table(
    db: &dyn Database,
    inspector: &SchemaInspector<'_>,
    step: &MigrationStep,
    create: &CreateTable,
) -> Result<StepResult, StepError> {
    if inspector.table_exists(&create.table).await? {
        return Ok(StepResult::skipped(format!(
            "table {} already exists",
            create.table
        )));
    }

    let referenced = step
        .referenced_tables()
        .map_err(|e| StepError::ApplyFailure(e.to_string()))?;
    for table in &referenced {
        require_table(inspector, table, "referenced table").await?;
    }

    db.execute_batch(&create.definition())
        .await
        .map_err(|e| StepError::ApplyFailure(e.to_string()))?;
    Ok(StepResult::applied(format!("created table {}", create.table)))
}

async fn add_column(
    db: &dyn Database,
    inspector: &SchemaInspector<'_>,
    add: &AddColumn,
) -> Result<StepResult, StepError> {
    require_table(inspector, &add.table, "table").await?;

    if let Some(live) = inspector.column_type(&add.table, &add.column).await? {
        if normalize_type(&live) == normalize_type(&add.data_type) {
            return Ok(StepResult::skipped(format!(
                "column {}.{} already exists",
                add.table, add.column
            )));
        }
        log::warn!(
            "Column {}.{} exists as {} but is declared as {}; leaving it unchanged",
            add.table,
            add.column,
            live,
            add.data_type
        );
        return Ok(StepResult::skipped(format!(
            "column {}.{} already exists with type {} (declared {})",
            add.table, add.column, live, add.data_type
        )));
    }

    db.execute(&add.definition())
        .await
        .map_err(|e| StepError::ApplyFailure(e.to_string()))?;
    Ok(StepResult::applied(format!(
        "added column {}.{}",
        add.table, add.column
    )))
}

async fn seed_row(
    db: &dyn Database,
    inspector: &SchemaInspector<'_>,
    seed: &SeedRow,
) -> Result<StepResult, StepError> {
    require_table(inspector, &seed.table, "table").await?;

    let key = seed.key_columns().join(", ");
    if inspector.row_exists(&seed.table, &seed.predicate()).await? {
        return Ok(StepResult::skipped(format!(
            "row keyed by ({key}) already present in {}",
            seed.table
        )));
    }

    let inserted = db
        .execute(&seed.definition())
        .await
        .map_err(|e| StepError::ApplyFailure(e.to_string()))?;
    if inserted == 0 {
        return Ok(StepResult::skipped(format!(
            "row keyed by ({key}) already present in {}",
            seed.table
        )));
    }
    Ok(StepResult::applied(format!("inserted row into {}", seed.table)))
}

async fn require_table(
    inspector: &SchemaInspector<'_>,
    table: &TableName,
    role: &str,
) -> Result<(), StepError> {
    if inspector.table_exists(table).await? {
        Ok(())
    } else {
        Err(StepError::MissingPrerequisite(format!(
            "{role} {table} does not exist"
        )))
    }
}

#[cfg(test)]
#[path = "apply_test.rs"]
mod tests;
