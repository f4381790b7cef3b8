//! Transaction coordination for execution scopes
//!
//! A scope is either a single step or every member of an atomic group. The
//! coordinator opens one transaction per scope, runs the members in order,
//! and commits only if none of them failed. For a group, the first failure
//! stops the scope and rolls back everything its members did.

use crate::apply::{apply_step, StepResult};
use crate::error::StepError;
use sw_core::{MigrationStep, Outcome};
use sw_db::Database;

/// Result of one step inside a scope.
#[derive(Debug, Clone)]
pub struct ScopeOutcome<'s> {
    /// The step
    pub step: &'s MigrationStep,
    /// Its result after the scope committed or rolled back
    pub result: Result<StepResult, StepError>,
}

/// Runs scopes inside transactions on a single connection.
pub struct TransactionCoordinator<'a> {
    db: &'a dyn Database,
}

impl<'a> TransactionCoordinator<'a> {
    /// Coordinate transactions on the given connection.
    pub fn new(db: &'a dyn Database) -> Self {
        Self { db }
    }

    /// Run `steps` as one atomic scope.
    ///
    /// Returns one outcome per step, in order. Members after a failing step
    /// are not attempted; members before it that applied a change are
    /// reported as rolled back.
    pub async fn run_scope<'s>(&self, steps: &[&'s MigrationStep]) -> Vec<ScopeOutcome<'s>> {
        if let Err(e) = self.db.begin().await {
            let detail = format!("could not open transaction: {e}");
            return steps
                .iter()
                .copied()
                .map(|step| ScopeOutcome {
                    step,
                    result: Err(StepError::ApplyFailure(detail.clone())),
                })
                .collect();
        }

        let mut results: Vec<Result<StepResult, StepError>> = Vec::with_capacity(steps.len());
        let mut failed_at = None;
        for (position, step) in steps.iter().enumerate() {
            let result = apply_step(self.db, step).await;
            let failed = result.is_err();
            results.push(result);
            if failed {
                failed_at = Some(position);
                break;
            }
        }

        let results = match failed_at {
            Some(position) => {
                self.rollback().await;
                Self::roll_back_results(steps, results, position)
            }
            None => match self.db.commit().await {
                Ok(()) => results,
                Err(e) => {
                    log::warn!("Commit failed, rolling back: {e}");
                    self.rollback().await;
                    Self::commit_failed_results(results, &e.to_string())
                }
            },
        };

        steps
            .iter()
            .copied()
            .zip(results)
            .map(|(step, result)| ScopeOutcome { step, result })
            .collect()
    }

    async fn rollback(&self) {
        if let Err(e) = self.db.rollback().await {
            log::error!("Rollback failed: {e}");
        }
    }

    /// Rewrite results after the step at `failed_at` forced a rollback.
    fn roll_back_results(
        steps: &[&MigrationStep],
        mut results: Vec<Result<StepResult, StepError>>,
        failed_at: usize,
    ) -> Vec<Result<StepResult, StepError>> {
        let failing = &steps[failed_at].name;
        for result in results.iter_mut().take(failed_at) {
            if matches!(result, Ok(r) if r.outcome == Outcome::Applied) {
                *result = Err(StepError::RolledBack(format!(
                    "undone because step '{failing}' failed"
                )));
            }
        }
        for _ in failed_at + 1..steps.len() {
            results.push(Err(StepError::RolledBack(format!(
                "not attempted because step '{failing}' failed"
            ))));
        }
        results
    }

    /// Applied changes were lost with the failed commit.
    fn commit_failed_results(
        results: Vec<Result<StepResult, StepError>>,
        message: &str,
    ) -> Vec<Result<StepResult, StepError>> {
        results
            .into_iter()
            .map(|result| match result {
                Ok(r) if r.outcome == Outcome::Applied => {
                    Err(StepError::ApplyFailure(format!("commit failed: {message}")))
                }
                other => other,
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "transaction_test.rs"]
mod tests;
