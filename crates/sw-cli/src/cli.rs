//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Sweep - idempotent, dependency-aware schema evolution
#[derive(Parser, Debug)]
#[command(name = "sweep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Use a named target from sweep.yml
    #[arg(short, long, global = true)]
    pub target: Option<String>,

    /// Override the database path (":memory:" for a scratch database)
    #[arg(long, global = true, env = "SWEEP_DATABASE")]
    pub database: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scaffold a new project with the platform baseline plan
    Init(InitArgs),

    /// Resolve plans and print the execution order without touching the database
    Plan(PlanArgs),

    /// Run plans against the database
    Run(RunArgs),

    /// Show the live shape of tables
    Inspect(InspectArgs),
}

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize
    #[arg(default_value = ".")]
    pub dir: String,

    /// Project name (default: the directory name)
    #[arg(long)]
    pub name: Option<String>,

    /// Database path written to sweep.yml
    #[arg(long, default_value = "platform.duckdb")]
    pub database_path: String,
}

/// Arguments for the plan command
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Plan files or directories (default: plan_paths from sweep.yml)
    #[arg(long = "plan")]
    pub plans: Vec<String>,

    /// Also print the SQL each step would issue
    #[arg(long)]
    pub show_sql: bool,
}

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Plan files or directories (default: plan_paths from sweep.yml)
    #[arg(long = "plan")]
    pub plans: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Tables to inspect
    #[arg(required = true)]
    pub tables: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable lines
    Text,
    /// JSON document
    Json,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
