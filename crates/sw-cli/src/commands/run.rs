//! Run command implementation

use anyhow::{Context, Result};
use sw_core::{ExecutionReport, Outcome, ReportEntry};
use sw_engine::Engine;

use crate::cli::{GlobalArgs, OutputFormat, RunArgs};
use crate::commands::common::{load_plan, plural, ExitCode, EXIT_STEP_FAILED};
use crate::context::ProjectContext;

/// Execute the run command
pub(crate) async fn execute(args: &RunArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::load(global)?;
    let (steps, plan) = load_plan(&ctx, &args.plans)?;

    let db = ctx.open_database()?;
    if args.output == OutputFormat::Text {
        println!(
            "Running {} in {}\n",
            plural(plan.len(), "step"),
            plural(plan.scopes().len(), "scope")
        );
    }

    let report = Engine::new(&db).execute(&steps, &plan).await;
    drop(db);

    match args.output {
        OutputFormat::Text => print_report(&report),
        OutputFormat::Json => {
            let json = report.to_json().context("Failed to serialize report")?;
            println!("{json}");
        }
    }
    ctx.verbose(&format!("Run id {}", report.run_id));

    if !report.is_success() {
        return Err(ExitCode(EXIT_STEP_FAILED).into());
    }
    Ok(())
}

fn print_report(report: &ExecutionReport) {
    for entry in report.entries() {
        println!("{}", format_entry(entry));
    }
    println!();
    println!("Completed: {}", report.summary());
    if let Some(ms) = report.duration_ms() {
        println!("Total time: {ms}ms");
    }
}

/// One outcome line, e.g. `  ✓ applied  create_users - created table users`
fn format_entry(entry: &ReportEntry) -> String {
    let symbol = match entry.outcome {
        Outcome::Applied => "✓",
        Outcome::Skipped => "-",
        Outcome::Failed => "✗",
    };
    format!(
        "  {} {:<8} {} - {}",
        symbol,
        entry.outcome.to_string(),
        entry.step,
        entry.detail
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use sw_core::{FailureKind, StepName};

    fn entry(outcome: Outcome, detail: &str) -> ReportEntry {
        ReportEntry {
            step: StepName::new("create_users"),
            outcome,
            detail: detail.to_string(),
            failure: (outcome == Outcome::Failed).then_some(FailureKind::ApplyFailure),
        }
    }

    #[test]
    fn test_format_entry() {
        assert_eq!(
            format_entry(&entry(Outcome::Applied, "created table users")),
            "  ✓ applied  create_users - created table users"
        );
        assert_eq!(
            format_entry(&entry(Outcome::Skipped, "table users already exists")),
            "  - skipped  create_users - table users already exists"
        );
        assert_eq!(
            format_entry(&entry(Outcome::Failed, "boom")),
            "  ✗ failed   create_users - boom"
        );
    }
}
