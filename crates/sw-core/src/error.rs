//! Error types for sw-core

use thiserror::Error;

/// Core error type for Sweep
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Failed to parse configuration file
    #[error("[E002] Failed to parse config: {message}")]
    ConfigParseError { message: String },

    /// E003: Invalid configuration value
    #[error("[E003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E004: Plan file or directory not found
    #[error("[E004] Plan not found: {path}")]
    PlanNotFound { path: String },

    /// E005: Step definition is malformed
    #[error("[E005] Invalid step '{name}': {reason}")]
    InvalidStep { name: String, reason: String },

    /// E006: Two steps in one plan share a name
    #[error("[E006] Duplicate step name: {name}")]
    DuplicateStep { name: String },

    /// E007: Circular dependency between steps
    #[error("[E007] Dependency cycle between steps: {}", steps.join(", "))]
    DependencyCycle { steps: Vec<String> },

    /// E008: A step depends on a name that is not in the plan
    #[error("[E008] Step '{step}' depends on unknown step '{dependency}'")]
    UnknownDependency { step: String, dependency: String },

    /// E009: SQL text in a step could not be tokenized
    #[error("[E009] Failed to tokenize SQL in step '{name}': {message}")]
    SqlTokenize { name: String, message: String },

    /// E016: IO error with file path context
    #[error("[E016] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// E015: YAML parse error
    #[error("[E015] YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
