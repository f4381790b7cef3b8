//! Init command implementation - scaffolds a new Sweep project

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::cli::InitArgs;

/// Baseline schema for the property operations platform
const PLATFORM_PLAN: &str = include_str!("../templates/platform.yml");

/// Execute the init command
pub(crate) async fn execute(args: &InitArgs) -> Result<()> {
    let project_dir = Path::new(&args.dir);
    let config_path = project_dir.join("sweep.yml");
    if config_path.exists() {
        anyhow::bail!(
            "'{}' already exists. Remove it or choose another directory.",
            config_path.display()
        );
    }

    let name = match &args.name {
        Some(name) => name.clone(),
        None => project_name(project_dir)?,
    };
    if name.trim().is_empty() {
        anyhow::bail!("Project name must not be empty");
    }

    println!("Creating new Sweep project: {}\n", name);

    let plans_dir = project_dir.join("plans");
    fs::create_dir_all(&plans_dir)
        .with_context(|| format!("Failed to create directory: {}", plans_dir.display()))?;

    let config_content = format!(
        r#"name: "{name}"

database:
  type: duckdb
  path: "{db_path}"

plan_paths: ["plans"]

# targets:
#   scratch:
#     database:
#       type: duckdb
#       path: ":memory:"
"#,
        name = yaml_quote_escape(&name),
        db_path = yaml_quote_escape(&args.database_path),
    );
    fs::write(&config_path, config_content).context("Failed to write sweep.yml")?;

    let plan_path = plans_dir.join("platform.yml");
    if plan_path.exists() {
        println!("  Kept existing {}", plan_path.display());
    } else {
        fs::write(&plan_path, PLATFORM_PLAN).context("Failed to write plans/platform.yml")?;
    }

    println!("Created:");
    println!("  {}", config_path.display());
    println!("  {}", plan_path.display());
    println!("\nNext steps:");
    println!("  sweep plan -p {}", project_dir.display());
    println!("  sweep run -p {}", project_dir.display());

    Ok(())
}

/// Project name from the directory's last component.
fn project_name(dir: &Path) -> Result<String> {
    let absolute = if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        std::env::current_dir()
            .context("Failed to read current directory")?
            .join(dir)
    };
    Ok(absolute
        .components()
        .rev()
        .find_map(|c| match c {
            std::path::Component::Normal(name) => name.to_str().map(String::from),
            _ => None,
        })
        .unwrap_or_else(|| "platform".to_string()))
}

/// Escape text for a double-quoted YAML scalar
fn yaml_quote_escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
