//! sw-core - Core library for Sweep
//!
//! This crate provides the declarative migration step model, plan and project
//! configuration parsing, the dependency resolver that turns a batch of steps
//! into ordered transactional scopes, and the execution report returned by a
//! run. Nothing here touches a database.

pub mod config;
pub mod dag;
pub mod error;
mod newtype_string;
pub mod plan;
pub mod references;
pub mod report;
pub mod sql_utils;
pub mod step;
pub mod step_name;
pub mod table_name;
pub mod value;

pub use config::{Config, DatabaseConfig, DbType};
pub use dag::{ExecutionPlan, Scope};
pub use error::{CoreError, CoreResult};
pub use plan::PlanFile;
pub use report::{ExecutionReport, FailureKind, Outcome, ReportEntry, ReportSummary};
pub use step::{AddColumn, ColumnDef, CreateTable, MigrationStep, SeedRow, StepKind};
pub use step_name::StepName;
pub use table_name::TableName;
pub use value::SqlValue;
