use super::*;
use std::fs;

#[test]
fn test_parse_minimal_config() {
    let config: Config = serde_yaml::from_str("name: platform").unwrap();
    assert_eq!(config.name, "platform");
    assert_eq!(config.database, DatabaseConfig::default());
    assert_eq!(config.database.path, "platform.duckdb");
    let root = PathBuf::from("/tmp/project");
    assert_eq!(config.plan_paths_absolute(&root), vec![root.join("plans")]);
}

#[test]
fn test_parse_full_config() {
    let yaml = r#"
name: cleaning_ops
database:
  type: duckdb
  path: ./ops.duckdb
plan_paths:
  - plans/core
  - plans/autopilot.yml
targets:
  staging:
    database:
      path: ./staging.duckdb
  local: {}
"#;
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(config.database.db_type, DbType::DuckDb);
    assert_eq!(config.plan_paths.len(), 2);
    assert_eq!(config.available_targets(), vec!["local", "staging"]);

    let staging = config.database_for(Some("staging")).unwrap();
    assert_eq!(staging.path, "./staging.duckdb");

    let local = config.database_for(Some("local")).unwrap();
    assert_eq!(local.path, "./ops.duckdb");

    assert_eq!(config.database_for(None).unwrap().path, "./ops.duckdb");
}

#[test]
fn test_unknown_target() {
    let config: Config = serde_yaml::from_str("name: platform").unwrap();
    let err = config.database_for(Some("prod")).unwrap_err();
    assert!(matches!(err, CoreError::ConfigInvalid { .. }));
    assert!(err.to_string().contains("unknown target 'prod'"));
}

#[test]
fn test_unknown_field_rejected() {
    let result: Result<Config, _> = serde_yaml::from_str("name: platform\nmigrations_table: log");
    assert!(result.is_err());
}

#[test]
fn test_load_from_dir() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("sweep.yaml"), "name: from_yaml_ext").unwrap();
    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.name, "from_yaml_ext");
}

#[test]
fn test_load_from_dir_missing() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::load_from_dir(dir.path()).unwrap_err();
    assert!(matches!(err, CoreError::ConfigNotFound { .. }));
}

#[test]
fn test_load_invalid_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sweep.yml");
    fs::write(&path, "name: [unterminated").unwrap();
    assert!(matches!(
        Config::load(&path),
        Err(CoreError::ConfigParseError { .. })
    ));
}

#[test]
fn test_load_rejects_empty_plan_paths() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sweep.yml");
    fs::write(&path, "name: platform\nplan_paths: []").unwrap();
    assert!(matches!(
        Config::load(&path),
        Err(CoreError::ConfigInvalid { .. })
    ));
}
