//! Shared utilities for CLI commands

use std::fmt;
use sw_core::{CoreError, ExecutionPlan, MigrationStep};

use crate::context::ProjectContext;

/// Exit code for a run where at least one step failed
pub(crate) const EXIT_STEP_FAILED: u8 = 1;

/// Exit code for a plan that could not be loaded or resolved
pub(crate) const EXIT_INVALID_PLAN: u8 = 2;

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that RAII destructors run and cleanup happens properly.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) u8);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Intentionally empty: ExitCode is a control-flow mechanism, not a
        // user-facing error.
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Load and resolve the selected plans.
///
/// Any plan error is printed and turned into [`EXIT_INVALID_PLAN`].
pub(crate) fn load_plan(
    ctx: &ProjectContext,
    overrides: &[String],
) -> anyhow::Result<(Vec<MigrationStep>, ExecutionPlan)> {
    let resolved = ctx
        .load_steps(overrides)
        .and_then(|steps| ExecutionPlan::resolve(&steps).map(|plan| (steps, plan)));
    match resolved {
        Ok(resolved) => Ok(resolved),
        Err(e) => {
            report_plan_error(&e);
            Err(ExitCode(EXIT_INVALID_PLAN).into())
        }
    }
}

fn report_plan_error(err: &CoreError) {
    eprintln!("Error: {err}");
    if let CoreError::DependencyCycle { .. } = err {
        eprintln!("No steps were executed.");
    }
}

/// Pluralize `noun` for `count`.
pub(crate) fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_display_is_silent() {
        assert_eq!(ExitCode(2).to_string(), "");
    }

    #[test]
    fn test_plural() {
        assert_eq!(plural(1, "step"), "1 step");
        assert_eq!(plural(3, "scope"), "3 scopes");
    }
}
