//! Error types for the migration engine

use sw_core::{CoreError, FailureKind};
use thiserror::Error;

/// Run-level errors. A run that returns one of these applied nothing.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The plan itself is invalid (cycle, unknown dependency, duplicate name, ...) (X001)
    #[error("[X001] Invalid migration plan: {0}")]
    InvalidPlan(#[from] CoreError),
}

impl EngineError {
    /// Whether the plan was rejected because of a dependency cycle.
    pub fn is_dependency_cycle(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidPlan(CoreError::DependencyCycle { .. })
        )
    }
}

/// Step-level failures, recorded in the report rather than aborting the run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StepError {
    /// The existence check could not be answered (X002)
    #[error("[X002] Inspection failed: {0}")]
    InspectionFailure(String),

    /// Something the step needs does not exist (X003)
    #[error("[X003] Missing prerequisite: {0}")]
    MissingPrerequisite(String),

    /// The mutating statement or its commit failed (X004)
    #[error("[X004] Apply failed: {0}")]
    ApplyFailure(String),

    /// The step's scope rolled back because of another step (X005)
    #[error("[X005] Rolled back: {0}")]
    RolledBack(String),
}

impl StepError {
    /// Report category for this error.
    pub fn kind(&self) -> FailureKind {
        match self {
            StepError::InspectionFailure(_) => FailureKind::InspectionFailure,
            StepError::MissingPrerequisite(_) => FailureKind::MissingPrerequisite,
            StepError::ApplyFailure(_) => FailureKind::ApplyFailure,
            StepError::RolledBack(_) => FailureKind::RolledBack,
        }
    }
}
