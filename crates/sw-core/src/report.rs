//! Execution report for a migration run
//!
//! The report is the only artifact a run hands back: one entry per step, in
//! the order steps resolved, plus run metadata. It is append-only while the
//! run is in progress and frozen by [`ExecutionReport::finish`].

use crate::step_name::StepName;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Outcome of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// The change was made
    Applied,
    /// The target already existed in the expected shape
    Skipped,
    /// The step did not take effect
    Failed,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Applied => write!(f, "applied"),
            Outcome::Skipped => write!(f, "skipped"),
            Outcome::Failed => write!(f, "failed"),
        }
    }
}

/// Why a step failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The existence check itself could not be answered
    InspectionFailure,
    /// Something the step needs does not exist
    MissingPrerequisite,
    /// The mutating statement (or its commit) failed
    ApplyFailure,
    /// The step's own work succeeded but its group rolled back
    RolledBack,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InspectionFailure => write!(f, "inspection_failure"),
            FailureKind::MissingPrerequisite => write!(f, "missing_prerequisite"),
            FailureKind::ApplyFailure => write!(f, "apply_failure"),
            FailureKind::RolledBack => write!(f, "rolled_back"),
        }
    }
}

/// One resolved step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEntry {
    /// Step name
    pub step: StepName,

    /// What happened
    pub outcome: Outcome,

    /// Human-readable detail ("already present", the underlying error, ...)
    pub detail: String,

    /// Failure category, set only for failed steps
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,
}

/// Counts per outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Steps applied
    pub applied: usize,
    /// Steps skipped because their target already existed
    pub skipped: usize,
    /// Steps that failed
    pub failed: usize,
}

impl ReportSummary {
    /// Total number of steps counted.
    pub fn total(&self) -> usize {
        self.applied + self.skipped + self.failed
    }
}

impl fmt::Display for ReportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} applied, {} skipped, {} failed",
            self.applied, self.skipped, self.failed
        )
    }
}

/// Ordered record of every step's outcome for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionReport {
    /// Unique identifier for this run
    pub run_id: String,

    /// When the run started
    pub started_at: DateTime<Utc>,

    /// When the run finished; `None` while in progress
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,

    entries: Vec<ReportEntry>,
}

impl ExecutionReport {
    /// Start an empty report.
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            started_at: Utc::now(),
            finished_at: None,
            entries: Vec::new(),
        }
    }

    /// Append a step outcome.
    ///
    /// Ignored once the report is finished.
    pub fn record(&mut self, step: StepName, outcome: Outcome, detail: impl Into<String>) {
        self.push(ReportEntry {
            step,
            outcome,
            detail: detail.into(),
            failure: None,
        });
    }

    /// Append a failed step with its failure category.
    pub fn record_failure(&mut self, step: StepName, failure: FailureKind, detail: impl Into<String>) {
        self.push(ReportEntry {
            step,
            outcome: Outcome::Failed,
            detail: detail.into(),
            failure: Some(failure),
        });
    }

    fn push(&mut self, entry: ReportEntry) {
        if self.finished_at.is_some() {
            log::warn!("Ignoring outcome for '{}' recorded after run finished", entry.step);
            return;
        }
        self.entries.push(entry);
    }

    /// Freeze the report.
    pub fn finish(mut self) -> Self {
        self.finished_at = Some(Utc::now());
        self
    }

    /// Whether the run has finished.
    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }

    /// Entries in resolution order.
    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    /// Look up the entry for a step.
    pub fn entry(&self, step: &str) -> Option<&ReportEntry> {
        self.entries.iter().find(|e| e.step == step)
    }

    /// Outcome of a step, if it was recorded.
    pub fn outcome(&self, step: &str) -> Option<Outcome> {
        self.entry(step).map(|e| e.outcome)
    }

    /// Counts per outcome.
    pub fn summary(&self) -> ReportSummary {
        let mut summary = ReportSummary::default();
        for entry in &self.entries {
            match entry.outcome {
                Outcome::Applied => summary.applied += 1,
                Outcome::Skipped => summary.skipped += 1,
                Outcome::Failed => summary.failed += 1,
            }
        }
        summary
    }

    /// A run succeeds when no step failed.
    pub fn is_success(&self) -> bool {
        self.entries.iter().all(|e| e.outcome != Outcome::Failed)
    }

    /// Wall-clock duration in milliseconds, once finished.
    pub fn duration_ms(&self) -> Option<i64> {
        self.finished_at
            .map(|end| (end - self.started_at).num_milliseconds())
    }

    /// Serialize as pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Default for ExecutionReport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
