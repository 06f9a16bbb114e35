use super::*;
use crate::column::Literal;
use crate::error::ValidationRule;
use crate::expression::{ExpressionKind, SchemaExpression};
use crate::migration::{MaintenanceStage, TransactionBehavior};
use crate::types::LogicalType;
use std::fs;
use tempfile::TempDir;

const CONFIG: &str = r#"
name: shop
dialect: duckdb
vars:
  app_user: shop_app
targets:
  prod:
    dialect: postgres
    vars:
      app_user: shop_prod
"#;

const CREATE_ORDERS: &str = r#"
version: 3
description: create orders
tags: [core]
up:
  - create_table:
      name: orders
      columns:
        - { name: id, type: int64, primary_key: true }
        - { name: total, type: "decimal(10,2)", default: 0 }
        - { name: note, type: "string(max)", nullable: true }
  - create_index:
      table: orders
      name: ix_orders_total
      columns:
        - total
        - { name: id, direction: descending }
  - sql_file: grant_orders.sql
down:
  - delete_table: { name: orders }
"#;

const SEED_USERS: &str = r#"
version: 1
description: users
transaction: none
up:
  - create_table:
      schema: app
      name: users
      columns:
        - { name: id, type: int32 }
        - { name: name, type: "string(100)" }
      primary_key: { columns: [id] }
  - insert_data:
      schema: app
      table: users
      rows:
        - { id: 1, name: alice }
        - { id: 2, name: { raw: "upper('bob')" } }
"#;

const AFTER_ALL: &str = r#"
stage: after_all
description: refresh statistics
up:
  - sql: ANALYZE
"#;

fn write(dir: &Path, relative: &str, content: &str) {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn sample_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "stepwise.yml", CONFIG);
    write(dir.path(), "migrations/003_orders.yml", CREATE_ORDERS);
    write(
        dir.path(),
        "migrations/grant_orders.sql",
        "GRANT SELECT ON orders TO {{ app_user }}",
    );
    write(dir.path(), "migrations/core/001_users.yaml", SEED_USERS);
    write(dir.path(), "migrations/maintenance/stats.yml", AFTER_ALL);
    dir
}

#[test]
fn test_load_project() {
    let dir = sample_project();
    let project = Project::load(dir.path()).unwrap();

    assert_eq!(project.config.name, "shop");
    assert_eq!(project.dialect(), Dialect::DuckDb);
    assert_eq!(project.migrations.len(), 2);
    assert_eq!(project.migrations.maintenance().len(), 1);

    let orders = project.migrations.get(MigrationVersion::new(3)).unwrap();
    assert_eq!(orders.description(), "create orders");
    assert!(orders.tags().contains("core"));
    assert!(orders.is_reversible());
    let kinds: Vec<ExpressionKind> = orders.up().iter().map(|e| e.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            ExpressionKind::CreateTable,
            ExpressionKind::CreateIndex,
            ExpressionKind::RawSql
        ]
    );
    let SchemaExpression::RawSql(grant) = &orders.up()[2] else {
        panic!("expected rendered sql_file");
    };
    assert_eq!(grant.sql, "GRANT SELECT ON orders TO shop_app");

    let SchemaExpression::CreateTable(table) = &orders.up()[0] else {
        panic!("expected CreateTable");
    };
    assert_eq!(table.columns[1].ty, LogicalType::decimal(10, 2));
    assert_eq!(table.columns[1].default, Some(Literal::Integer(0)));
    assert!(table.columns[2].nullable);

    let users = project.migrations.get(MigrationVersion::new(1)).unwrap();
    assert_eq!(users.transaction(), TransactionBehavior::None);
    assert!(!users.is_reversible());
    let SchemaExpression::InsertData(insert) = &users.up()[1] else {
        panic!("expected InsertData");
    };
    assert_eq!(insert.rows.len(), 2);
    assert_eq!(
        insert.rows[1][1],
        ("name".to_string(), Literal::raw("upper('bob')"))
    );

    let maintenance = &project.migrations.maintenance()[0];
    assert_eq!(maintenance.stage(), MaintenanceStage::AfterAll);
    assert_eq!(maintenance.version(), None);

    assert!(project
        .source_of(MigrationVersion::new(3))
        .unwrap()
        .ends_with("003_orders.yml"));
}

#[test]
fn test_load_for_target_uses_target_vars_and_dialect() {
    let dir = sample_project();
    let project = Project::load_for_target(dir.path(), Some("prod")).unwrap();
    assert_eq!(project.dialect(), Dialect::Postgres);

    let orders = project.migrations.get(MigrationVersion::new(3)).unwrap();
    let SchemaExpression::RawSql(grant) = &orders.up()[2] else {
        panic!("expected rendered sql_file");
    };
    assert_eq!(grant.sql, "GRANT SELECT ON orders TO shop_prod");
}

#[test]
fn test_unknown_target_fails() {
    let dir = sample_project();
    let err = Project::load_for_target(dir.path(), Some("qa")).unwrap_err();
    assert!(matches!(err, CoreError::ConfigInvalid { .. }));
}

#[test]
fn test_missing_project_dir() {
    let err = Project::load(Path::new("/definitely/not/here")).unwrap_err();
    assert!(matches!(err, CoreError::ProjectNotFound { .. }));
}

#[test]
fn test_duplicate_versions_are_kept_for_planning() {
    let dir = sample_project();
    write(
        dir.path(),
        "migrations/003_again.yml",
        "version: 3\nup:\n  - sql: SELECT 1\n",
    );
    let project = Project::load(dir.path()).unwrap();
    assert_eq!(
        project.migrations.duplicate_versions(),
        vec![MigrationVersion::new(3)]
    );
}

#[test]
fn test_invalid_expression_names_file_and_rule() {
    let dir = sample_project();
    write(
        dir.path(),
        "migrations/004_bad.yml",
        r#"
version: 4
up:
  - create_table:
      name: widgets
      columns:
        - { name: id, type: int64 }
"#,
    );
    let err = Project::load(dir.path()).unwrap_err();
    assert!(err.to_string().contains("004_bad.yml"), "{err}");
    assert_eq!(err.validation_rule(), Some(ValidationRule::SinglePrimaryKey));
}

#[test]
fn test_missing_version_rejected() {
    let dir = sample_project();
    write(dir.path(), "migrations/005.yml", "up:\n  - sql: SELECT 1\n");
    let err = Project::load(dir.path()).unwrap_err();
    let CoreError::MigrationFile { source, .. } = err else {
        panic!("expected MigrationFile error");
    };
    assert!(matches!(*source, CoreError::MigrationDefinition { .. }));
}

#[test]
fn test_unknown_expression_rejected() {
    let dir = sample_project();
    write(
        dir.path(),
        "migrations/006.yml",
        "version: 6\nup:\n  - truncate_table: { name: orders }\n",
    );
    let err = Project::load(dir.path()).unwrap_err();
    let CoreError::MigrationFile { source, .. } = err else {
        panic!("expected MigrationFile error");
    };
    assert!(matches!(*source, CoreError::YamlParse(_)));
}

#[test]
fn test_undefined_template_variable_fails() {
    let dir = sample_project();
    write(
        dir.path(),
        "migrations/grant_orders.sql",
        "GRANT SELECT ON orders TO {{ missing_user }}",
    );
    let err = Project::load(dir.path()).unwrap_err();
    let CoreError::MigrationFile { source, .. } = err else {
        panic!("expected MigrationFile error");
    };
    assert!(matches!(*source, CoreError::ScriptRender { .. }));
}

#[test]
fn test_maintenance_cannot_declare_down() {
    let dir = sample_project();
    write(
        dir.path(),
        "migrations/maintenance/bad.yml",
        "stage: before_all\nup:\n  - sql: SELECT 1\ndown:\n  - sql: SELECT 2\n",
    );
    assert!(Project::load(dir.path()).is_err());
}

#[test]
fn test_load_with_external_config() {
    let dir = sample_project();
    let config: Config = serde_yaml::from_str(
        "name: shop\ndialect: postgres\nvars:\n  app_user: ops\n",
    )
    .unwrap();
    let project = Project::load_with_config(dir.path(), config, None).unwrap();

    assert_eq!(project.dialect(), Dialect::Postgres);
    let orders = project.migrations.get(MigrationVersion::new(3)).unwrap();
    let SchemaExpression::RawSql(grant) = &orders.up()[2] else {
        panic!("expected rendered sql_file");
    };
    assert_eq!(grant.sql, "GRANT SELECT ON orders TO ops");
}
