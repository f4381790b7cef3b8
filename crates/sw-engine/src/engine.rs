//! Run loop: resolve a plan, execute its scopes, build the report

use crate::apply::StepResult;
use crate::error::{EngineError, StepError};
use crate::transaction::TransactionCoordinator;
use std::collections::HashSet;
use sw_core::{ExecutionPlan, ExecutionReport, MigrationStep, Outcome, Scope};
use sw_db::Database;

/// Schema evolution engine bound to one connection.
///
/// The engine holds no state between runs; everything it decides comes from
/// the plan and the live catalog.
pub struct Engine<'a> {
    db: &'a dyn Database,
}

impl<'a> Engine<'a> {
    /// Create an engine that runs against `db`.
    pub fn new(db: &'a dyn Database) -> Self {
        Self { db }
    }

    /// Resolve and run `steps`.
    ///
    /// Returns `Err` only when the plan is invalid, in which case nothing
    /// was executed. Step failures are recorded in the report.
    pub async fn run(&self, steps: &[MigrationStep]) -> Result<ExecutionReport, EngineError> {
        let plan = ExecutionPlan::resolve(steps)?;
        Ok(self.execute(steps, &plan).await)
    }

    /// Run an already resolved plan.
    ///
    /// `plan` must have been resolved from `steps`.
    pub async fn execute(&self, steps: &[MigrationStep], plan: &ExecutionPlan) -> ExecutionReport {
        log::info!(
            "Running {} steps in {} scopes on {}",
            plan.len(),
            plan.scopes().len(),
            self.db.db_type()
        );

        let coordinator = TransactionCoordinator::new(self.db);
        let mut report = ExecutionReport::new();
        let mut failed: HashSet<usize> = HashSet::new();

        for scope in plan.scopes() {
            if let Some(results) = blocked_results(scope, plan, steps, &failed) {
                for (i, err) in results {
                    failed.insert(i);
                    record(&mut report, &steps[i], Err(err));
                }
                continue;
            }

            let members: Vec<&MigrationStep> = scope.steps.iter().map(|&i| &steps[i]).collect();
            let outcomes = coordinator.run_scope(&members).await;
            for (&i, outcome) in scope.steps.iter().zip(outcomes) {
                if outcome.result.is_err() {
                    failed.insert(i);
                }
                record(&mut report, outcome.step, outcome.result);
            }
        }

        let report = report.finish();
        log::info!("Run {} finished: {}", report.run_id, report.summary());
        report
    }
}

/// Failures for a scope that cannot start because a dependency failed.
///
/// Returns `None` when every member's dependencies succeeded.
fn blocked_results(
    scope: &Scope,
    plan: &ExecutionPlan,
    steps: &[MigrationStep],
    failed: &HashSet<usize>,
) -> Option<Vec<(usize, StepError)>> {
    let blocked: Vec<(usize, usize)> = scope
        .steps
        .iter()
        .filter_map(|&i| {
            plan.dependencies(i)
                .iter()
                .find(|&&dep| failed.contains(&dep))
                .map(|&dep| (i, dep))
        })
        .collect();
    let &(first_blocked, _) = blocked.first()?;

    let results = scope
        .steps
        .iter()
        .map(|&i| {
            let err = match blocked.iter().find(|(step, _)| *step == i) {
                Some(&(_, dep)) => StepError::MissingPrerequisite(format!(
                    "dependency '{}' failed",
                    steps[dep].name
                )),
                None => StepError::RolledBack(format!(
                    "not attempted because step '{}' has a failed dependency",
                    steps[first_blocked].name
                )),
            };
            (i, err)
        })
        .collect();
    Some(results)
}

fn record(report: &mut ExecutionReport, step: &MigrationStep, result: Result<StepResult, StepError>) {
    match result {
        Ok(StepResult { outcome, detail }) => {
            match outcome {
                Outcome::Applied => log::debug!("Applied '{}': {}", step.name, detail),
                _ => log::debug!("Skipped '{}': {}", step.name, detail),
            }
            report.record(step.name.clone(), outcome, detail);
        }
        Err(err) => {
            log::warn!("Step '{}' failed: {}", step.name, err);
            report.record_failure(step.name.clone(), err.kind(), err.to_string());
        }
    }
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod tests;
