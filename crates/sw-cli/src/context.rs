//! Runtime context for CLI commands

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use sw_core::{Config, CoreError, MigrationStep, PlanFile};
use sw_db::DuckDbBackend;

use crate::cli::GlobalArgs;

/// Plan directory used when there is no sweep.yml
const DEFAULT_PLAN_DIR: &str = "plans";

/// Project configuration and global overrides resolved for one command
pub(crate) struct ProjectContext {
    /// Project root (`--project-dir`)
    pub root: PathBuf,

    /// Parsed sweep.yml, if one was found
    pub config: Option<Config>,

    /// Verbose output enabled
    pub verbose: bool,

    database_override: Option<String>,
    target: Option<String>,
}

impl ProjectContext {
    /// Load the project described by the global arguments.
    ///
    /// An explicit `--config` must exist. Without it, a missing sweep.yml in
    /// the project directory is allowed and defaults apply.
    pub fn load(global: &GlobalArgs) -> Result<Self> {
        let root = PathBuf::from(&global.project_dir);

        let config = match &global.config {
            Some(path) => {
                Some(Config::load(Path::new(path)).context("Failed to load configuration file")?)
            }
            None => match Config::load_from_dir(&root) {
                Ok(config) => Some(config),
                Err(CoreError::ConfigNotFound { path }) => {
                    if global.verbose {
                        eprintln!("[verbose] No config at {path}, using defaults");
                    }
                    None
                }
                Err(e) => {
                    return Err(anyhow::Error::from(e).context("Failed to load project configuration"))
                }
            },
        };

        Ok(Self {
            root,
            config,
            verbose: global.verbose,
            database_override: global.database.clone(),
            target: global.target.clone(),
        })
    }

    /// Print verbose output if enabled
    pub fn verbose(&self, msg: &str) {
        if self.verbose {
            eprintln!("[verbose] {}", msg);
        }
    }

    /// Plan files or directories to load.
    ///
    /// Explicit `--plan` arguments win; otherwise the config's `plan_paths`
    /// (or `plans/`) under the project root.
    pub fn plan_paths(&self, overrides: &[String]) -> Vec<PathBuf> {
        if !overrides.is_empty() {
            return overrides.iter().map(PathBuf::from).collect();
        }
        match &self.config {
            Some(config) => config.plan_paths_absolute(&self.root),
            None => vec![self.root.join(DEFAULT_PLAN_DIR)],
        }
    }

    /// Load every step from the selected plans.
    pub fn load_steps(&self, overrides: &[String]) -> Result<Vec<MigrationStep>, CoreError> {
        let paths = self.plan_paths(overrides);
        for path in &paths {
            self.verbose(&format!("Loading plans from {}", path.display()));
        }
        PlanFile::load_all(&paths)
    }

    /// Database path after applying `--database` and `--target`.
    ///
    /// Relative paths from sweep.yml resolve against the project root.
    pub fn database_path(&self) -> Result<String> {
        if let Some(path) = &self.database_override {
            return Ok(path.clone());
        }

        let Some(config) = &self.config else {
            if let Some(target) = &self.target {
                anyhow::bail!("Target '{target}' requested but no sweep.yml was found");
            }
            anyhow::bail!("No database configured: pass --database or create sweep.yml");
        };

        let database = config.database_for(self.target.as_deref())?;
        if database.path == ":memory:" || Path::new(&database.path).is_absolute() {
            Ok(database.path)
        } else {
            Ok(self.root.join(&database.path).display().to_string())
        }
    }

    /// Open the configured database.
    pub fn open_database(&self) -> Result<DuckDbBackend> {
        let path = self.database_path()?;
        self.verbose(&format!("Connecting to {path}"));
        DuckDbBackend::new(&path).with_context(|| format!("Failed to connect to database: {path}"))
    }
}

#[cfg(test)]
#[path = "context_test.rs"]
mod tests;
