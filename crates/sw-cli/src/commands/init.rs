//! Init command implementation - scaffolds a new Stepwise project

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::cli::InitArgs;

/// Execute the init command
pub(crate) async fn execute(args: &InitArgs) -> Result<()> {
    scaffold(Path::new("."), args)?;

    println!("Project '{}' initialized successfully!", args.name);
    println!();
    println!("Next steps:");
    println!("  cd {}", args.name);
    println!("  sw validate    # Render every migration for the configured dialect");
    println!("  sw up          # Apply pending migrations");
    Ok(())
}

/// Create the project directory under `parent`.
fn scaffold(parent: &Path, args: &InitArgs) -> Result<()> {
    // Reject names that could cause path traversal or confusing directory names
    if args.name.contains('/')
        || args.name.contains('\\')
        || args.name.contains("..")
        || args.name.starts_with('.')
        || args.name.starts_with('-')
    {
        anyhow::bail!(
            "Invalid project name '{}': must not contain '/', '\\', '..', or start with '.' or '-'",
            args.name
        );
    }

    let project_dir = parent.join(&args.name);
    if project_dir.exists() {
        anyhow::bail!(
            "Directory '{}' already exists. Choose a different project name.",
            args.name
        );
    }

    println!("Creating new Stepwise project: {}\n", args.name);

    for dir in ["", "migrations", "migrations/maintenance"] {
        let path = project_dir.join(dir);
        fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
    }

    // Escape YAML special characters in interpolated values
    let safe_name = args.name.replace('"', "\\\"");
    let safe_db_path = args.database_path.replace('"', "\\\"");
    let config_content = format!(
        r#"name: "{name}"
dialect: duckdb
migration_paths: ["migrations"]

database:
  path: "{db_path}"

version_table:
  table_name: version_info

vars:
  app_role: app

# targets:
#   prod:
#     database:
#       path: /var/lib/{name}/{name}.duckdb
"#,
        name = safe_name,
        db_path = safe_db_path,
    );
    write(&project_dir, "stepwise.yml", &config_content)?;

    let first_migration = r#"version: 1
description: create customers
tags: [core]
up:
  - create_table:
      name: customers
      columns:
        - { name: id, type: int64, primary_key: true }
        - { name: email, type: "string(255)", unique: true }
        - { name: created_at, type: datetime, default: { function: current_utc_datetime } }
down:
  - delete_table: { name: customers }
"#;
    write(&project_dir, "migrations/0001_create_customers.yml", first_migration)?;

    let check = r#"stage: after_all
description: check customers
up:
  - sql: SELECT count(*) FROM customers
"#;
    write(&project_dir, "migrations/maintenance/check_customers.yml", check)?;

    write(&project_dir, ".gitignore", "*.duckdb\n*.duckdb.wal\n")?;

    println!("  Created stepwise.yml");
    println!("  Created migrations/0001_create_customers.yml");
    println!("  Created migrations/maintenance/check_customers.yml");
    println!("  Created .gitignore");
    println!();
    Ok(())
}

fn write(project_dir: &Path, relative: &str, content: &str) -> Result<()> {
    fs::write(project_dir.join(relative), content)
        .with_context(|| format!("Failed to write {}", relative))
}

#[cfg(test)]
#[path = "init_test.rs"]
mod tests;
