use super::*;
use sw_core::{Dialect, Project};
use tempfile::TempDir;

fn args(name: &str) -> InitArgs {
    InitArgs {
        name: name.to_string(),
        database_path: "dev.duckdb".to_string(),
    }
}

#[test]
fn test_scaffold_loads_as_project() {
    let dir = TempDir::new().unwrap();
    scaffold(dir.path(), &args("shop")).unwrap();

    let project = Project::load(&dir.path().join("shop")).unwrap();
    assert_eq!(project.config.name, "shop");
    assert_eq!(project.dialect(), Dialect::DuckDb);
    assert_eq!(project.migrations.len(), 1);
    assert_eq!(project.migrations.maintenance().len(), 1);
    assert_eq!(project.config.database.path, "dev.duckdb");
}

#[test]
fn test_scaffold_rejects_bad_names() {
    let dir = TempDir::new().unwrap();
    for name in ["../escape", ".hidden", "-flag", "a/b"] {
        let err = scaffold(dir.path(), &args(name)).unwrap_err();
        assert!(err.to_string().contains("Invalid project name"), "{name}");
    }
}

#[test]
fn test_scaffold_refuses_existing_directory() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join("shop")).unwrap();
    let err = scaffold(dir.path(), &args("shop")).unwrap_err();
    assert!(err.to_string().contains("already exists"));
}
