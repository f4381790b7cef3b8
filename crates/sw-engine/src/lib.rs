//! sw-engine - Schema evolution engine for Sweep
//!
//! Runs a batch of [`MigrationStep`](sw_core::MigrationStep)s against a live
//! database. Every step re-derives from the catalog whether its change has
//! already happened, so a plan can be run any number of times, in any
//! state of partial migration, and converge on the same schema.
//!
//! The flow for one run:
//!
//! 1. [`ExecutionPlan::resolve`](sw_core::ExecutionPlan::resolve) orders the
//!    steps into scopes and rejects invalid plans before any connection work.
//! 2. [`TransactionCoordinator`] opens a transaction per scope.
//! 3. [`SchemaInspector`] answers each step's existence guard.
//! 4. The step applies its statement only if its target is absent.
//! 5. The scope commits or rolls back, and the [`ExecutionReport`](sw_core::ExecutionReport)
//!    records each step's outcome.

pub mod apply;
pub mod engine;
pub mod error;
pub mod inspector;
pub mod transaction;

pub use apply::StepResult;
pub use engine::Engine;
pub use error::{EngineError, StepError};
pub use inspector::{SchemaInspector, SchemaSnapshot};
pub use transaction::{ScopeOutcome, TransactionCoordinator};
