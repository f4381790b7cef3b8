//! Inspect command implementation

use anyhow::{Context, Result};
use serde_json::json;
use std::collections::HashMap;
use sw_core::TableName;
use sw_engine::{SchemaInspector, SchemaSnapshot};

use crate::cli::{GlobalArgs, InspectArgs, OutputFormat};
use crate::commands::common::plural;
use crate::context::ProjectContext;

/// Execute the inspect command
pub(crate) async fn execute(args: &InspectArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::load(global)?;
    let tables = args
        .tables
        .iter()
        .map(|t| TableName::try_new(t.as_str()).context("Table name must not be empty"))
        .collect::<Result<Vec<_>>>()?;

    let db = ctx.open_database()?;
    let inspector = SchemaInspector::new(&db);
    let snapshot = inspector
        .snapshot(&tables)
        .await
        .context("Failed to inspect schema")?;

    let mut row_counts = HashMap::new();
    for table in tables.iter().filter(|t| snapshot.has_table(t.as_str())) {
        let count = inspector
            .row_count(table)
            .await
            .context("Failed to count rows")?;
        row_counts.insert(table.as_str(), count);
    }

    match args.output {
        OutputFormat::Text => print_snapshot(&tables, &snapshot, &row_counts),
        OutputFormat::Json => {
            let json = snapshot_json(&tables, &snapshot, &row_counts);
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }
    Ok(())
}

fn print_snapshot(
    tables: &[TableName],
    snapshot: &SchemaSnapshot,
    row_counts: &HashMap<&str, usize>,
) {
    for (i, table) in tables.iter().enumerate() {
        if i > 0 {
            println!();
        }
        let Some(columns) = snapshot.columns(table) else {
            println!("{table} (missing)");
            continue;
        };
        let rows = row_counts.get(table.as_str()).copied().unwrap_or(0);
        println!("{table} ({})", plural(rows, "row"));
        let width = columns.iter().map(|c| c.name.len()).max().unwrap_or(0);
        for column in columns {
            let null = if column.nullable { "" } else { "  NOT NULL" };
            println!(
                "  {:<width$}  {}{}",
                column.name,
                column.data_type,
                null,
                width = width
            );
        }
    }
}

fn snapshot_json(
    tables: &[TableName],
    snapshot: &SchemaSnapshot,
    row_counts: &HashMap<&str, usize>,
) -> serde_json::Value {
    let entries: Vec<serde_json::Value> = tables
        .iter()
        .map(|table| match snapshot.columns(table) {
            Some(columns) => json!({
                "table": table.as_str(),
                "exists": true,
                "rows": row_counts.get(table.as_str()).copied().unwrap_or(0),
                "columns": columns
                    .iter()
                    .map(|c| json!({
                        "name": c.name,
                        "type": c.data_type,
                        "nullable": c.nullable,
                    }))
                    .collect::<Vec<_>>(),
            }),
            None => json!({ "table": table.as_str(), "exists": false }),
        })
        .collect();
    json!({ "tables": entries })
}
