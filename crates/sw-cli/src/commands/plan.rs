//! Plan command implementation

use anyhow::Result;

use crate::cli::{GlobalArgs, PlanArgs};
use crate::commands::common::{load_plan, plural};
use crate::context::ProjectContext;

/// Execute the plan command
pub(crate) async fn execute(args: &PlanArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::load(global)?;
    let (steps, plan) = load_plan(&ctx, &args.plans)?;

    if plan.is_empty() {
        println!("No steps found.");
        return Ok(());
    }

    println!(
        "Resolved {} in {}:\n",
        plural(plan.len(), "step"),
        plural(plan.scopes().len(), "scope")
    );
    print!("{}", plan.describe(&steps));

    if args.show_sql {
        for index in plan.order() {
            let step = &steps[index];
            println!("\n-- {}\n{};", step.name, step.definition());
        }
    }

    Ok(())
}
