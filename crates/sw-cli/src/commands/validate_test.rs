use super::*;
use std::fs;
use tempfile::TempDir;

const CONFIG: &str = "name: shop\ndialect: sqlite\n";

const WITH_SCHEMA: &str = r#"
version: 1
description: reporting schema
up:
  - create_schema: { name: reporting }
  - create_table:
      name: events
      columns:
        - { name: id, type: int64, primary_key: true }
"#;

fn project() -> (TempDir, Project) {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("stepwise.yml"), CONFIG).unwrap();
    fs::create_dir_all(dir.path().join("migrations")).unwrap();
    fs::write(dir.path().join("migrations/001_reporting.yml"), WITH_SCHEMA).unwrap();
    let project = Project::load(dir.path()).unwrap();
    (dir, project)
}

#[test]
fn test_rendering_errors_name_unit_and_file() {
    let (_dir, project) = project();
    let mut issues = ValidationContext::default();

    check_rendering(
        &project,
        DialectProfile::for_dialect(Dialect::Sqlite),
        &mut issues,
    );
    assert_eq!(issues.count(Severity::Error), 1);
    let rendered = issues.issues[0].to_string();
    assert!(rendered.starts_with("[ERROR] V002: 1 reporting schema up expression #0"));
    assert!(rendered.ends_with("(migrations/001_reporting.yml)"));

    let mut issues = ValidationContext::default();
    check_rendering(
        &project,
        DialectProfile::for_dialect(Dialect::Postgres),
        &mut issues,
    );
    assert!(issues.issues.is_empty());
}

#[test]
fn test_irreversible_units_warn() {
    let (_dir, project) = project();
    let mut issues = ValidationContext::default();
    check_reversibility(&project, &mut issues);
    assert_eq!(issues.count(Severity::Warning), 1);
    assert_eq!(issues.count(Severity::Error), 0);
    assert!(print_issues_and_summary(&issues).is_ok());
}

#[test]
fn test_version_table_schema_on_sqlite() {
    let config = VersionTableConfig {
        table_name: "version_info".to_string(),
        schema: Some("ops".to_string()),
    };
    let mut issues = ValidationContext::default();
    check_version_table(&config, DialectProfile::for_dialect(Dialect::Sqlite), &mut issues);
    assert_eq!(issues.issues[0].code, "V003");

    let err = print_issues_and_summary(&issues).unwrap_err();
    assert_eq!(err.downcast_ref::<ExitCode>().map(|c| c.0), Some(1));
}
