use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    // Validates the entire command tree: short flag conflicts,
    // duplicate args, and other clap definition errors.
    Cli::command().debug_assert();
}

#[test]
fn test_run_defaults() {
    let cli = Cli::try_parse_from(["sweep", "run"]).unwrap();
    assert_eq!(cli.global.project_dir, ".");
    match cli.command {
        Commands::Run(args) => {
            assert!(args.plans.is_empty());
            assert_eq!(args.output, OutputFormat::Text);
        }
        other => panic!("expected run, got {other:?}"),
    }
}

#[test]
fn test_run_with_plans_and_json() {
    let cli = Cli::try_parse_from([
        "sweep",
        "run",
        "--plan",
        "plans/platform.yml",
        "--plan",
        "plans/extra",
        "--output",
        "json",
        "--database",
        ":memory:",
    ])
    .unwrap();
    assert_eq!(cli.global.database.as_deref(), Some(":memory:"));
    match cli.command {
        Commands::Run(args) => {
            assert_eq!(args.plans, vec!["plans/platform.yml", "plans/extra"]);
            assert_eq!(args.output, OutputFormat::Json);
        }
        other => panic!("expected run, got {other:?}"),
    }
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from(["sweep", "plan", "-v", "-t", "staging"]).unwrap();
    assert!(cli.global.verbose);
    assert_eq!(cli.global.target.as_deref(), Some("staging"));
}

#[test]
fn test_inspect_requires_a_table() {
    assert!(Cli::try_parse_from(["sweep", "inspect"]).is_err());
    let cli = Cli::try_parse_from(["sweep", "inspect", "users", "tasks"]).unwrap();
    match cli.command {
        Commands::Inspect(args) => assert_eq!(args.tables, vec!["users", "tasks"]),
        other => panic!("expected inspect, got {other:?}"),
    }
}

#[test]
fn test_init_defaults() {
    let cli = Cli::try_parse_from(["sweep", "init"]).unwrap();
    match cli.command {
        Commands::Init(args) => {
            assert_eq!(args.dir, ".");
            assert_eq!(args.database_path, "platform.duckdb");
            assert!(args.name.is_none());
        }
        other => panic!("expected init, got {other:?}"),
    }
}
