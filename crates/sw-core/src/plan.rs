//! Plan files
//!
//! A plan file is a YAML document holding an ordered list of migration steps:
//!
//! ```yaml
//! description: Autopilot settings
//! steps:
//!   - name: create_host_ai_autopilot_settings
//!     kind: create_table
//!     table: host_ai_autopilot_settings
//!     columns:
//!       - { name: user_id, type: INTEGER, constraints: "PRIMARY KEY REFERENCES users (id)" }
//!       - { name: enabled, type: BOOLEAN }
//! ```

use crate::error::{CoreError, CoreResult};
use crate::step::MigrationStep;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A parsed plan file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanFile {
    /// Free-form description shown by `sweep plan`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Steps in declaration order
    #[serde(default)]
    pub steps: Vec<MigrationStep>,
}

impl PlanFile {
    /// Parse a plan from YAML text.
    pub fn from_yaml(yaml: &str) -> CoreResult<Self> {
        let plan: PlanFile = serde_yaml::from_str(yaml)?;
        for step in &plan.steps {
            step.validate()?;
        }
        Ok(plan)
    }

    /// Load a single plan file.
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::PlanNotFound {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        log::debug!("Loaded plan file {}", path.display());
        Self::from_yaml(&content)
    }

    /// Load every plan reachable from `paths` and concatenate their steps.
    ///
    /// Each path is either a plan file or a directory; directories are
    /// searched recursively for `.yml` / `.yaml` files, which load in
    /// lexicographic path order so declaration order is stable.
    pub fn load_all(paths: &[PathBuf]) -> CoreResult<Vec<MigrationStep>> {
        let mut steps = Vec::new();
        for path in paths {
            if path.is_dir() {
                for file in discover_plan_files(path)? {
                    steps.extend(Self::load(&file)?.steps);
                }
            } else {
                steps.extend(Self::load(path)?.steps);
            }
        }
        Ok(steps)
    }
}

/// Recursively collect plan files under `dir`, sorted by path.
pub fn discover_plan_files(dir: &Path) -> CoreResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(CoreError::PlanNotFound {
            path: dir.display().to_string(),
        });
    }
    let mut files = Vec::new();
    discover_recursive(dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn discover_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> CoreResult<()> {
    let entries = std::fs::read_dir(dir).map_err(|e| CoreError::IoWithPath {
        path: dir.display().to_string(),
        source: e,
    })?;

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            discover_recursive(&path, files)?;
        } else if path
            .extension()
            .is_some_and(|e| e == "yml" || e == "yaml")
        {
            files.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "plan_test.rs"]
mod tests;
