use super::*;
use std::fs;
use tempfile::TempDir;

fn global(dir: &Path) -> GlobalArgs {
    GlobalArgs {
        verbose: false,
        project_dir: dir.display().to_string(),
        config: None,
        target: None,
        database: None,
    }
}

fn project_with_config(yaml: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("sweep.yml"), yaml).unwrap();
    dir
}

#[test]
fn test_missing_config_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let ctx = ProjectContext::load(&global(dir.path())).unwrap();
    assert!(ctx.config.is_none());
    assert_eq!(ctx.plan_paths(&[]), vec![dir.path().join("plans")]);
    assert!(ctx.database_path().is_err());
}

#[test]
fn test_explicit_config_must_exist() {
    let dir = TempDir::new().unwrap();
    let mut args = global(dir.path());
    args.config = Some(dir.path().join("nope.yml").display().to_string());
    assert!(ProjectContext::load(&args).is_err());
}

#[test]
fn test_database_path_relative_to_root() {
    let dir = project_with_config("name: platform\ndatabase:\n  type: duckdb\n  path: data/platform.duckdb\n");
    let ctx = ProjectContext::load(&global(dir.path())).unwrap();
    assert_eq!(
        ctx.database_path().unwrap(),
        dir.path().join("data/platform.duckdb").display().to_string()
    );
}

#[test]
fn test_database_override_wins() {
    let dir = project_with_config("name: platform\n");
    let mut args = global(dir.path());
    args.database = Some(":memory:".to_string());
    let ctx = ProjectContext::load(&args).unwrap();
    assert_eq!(ctx.database_path().unwrap(), ":memory:");
}

#[test]
fn test_target_selects_database() {
    let dir = project_with_config(
        "name: platform\ntargets:\n  scratch:\n    database:\n      type: duckdb\n      path: \":memory:\"\n",
    );
    let mut args = global(dir.path());
    args.target = Some("scratch".to_string());
    let ctx = ProjectContext::load(&args).unwrap();
    assert_eq!(ctx.database_path().unwrap(), ":memory:");

    args.target = Some("prod".to_string());
    let ctx = ProjectContext::load(&args).unwrap();
    assert!(ctx.database_path().is_err());
}

#[test]
fn test_plan_overrides_replace_config_paths() {
    let dir = project_with_config("name: platform\nplan_paths: [\"migrations\"]\n");
    let ctx = ProjectContext::load(&global(dir.path())).unwrap();
    assert_eq!(ctx.plan_paths(&[]), vec![dir.path().join("migrations")]);
    assert_eq!(
        ctx.plan_paths(&["one.yml".to_string()]),
        vec![PathBuf::from("one.yml")]
    );
}
