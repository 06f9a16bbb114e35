//! End-to-end engine runs against in-memory DuckDB and a scripted processor

mod common;

use common::{create_table, create_table_unit, insert_row, tagged_unit, ScriptedProcessor};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use sw_core::{
    MaintenanceStage, MaintenanceUnit, MigrationSet, MigrationUnit, MigrationVersion,
    SchemaExpression, Tag, TableRef,
};
use sw_db::{DuckDbProcessor, Processor};
use sw_runner::{
    Direction, PlannedStep, RunObserver, RunOutcome, RunReport, RunRequest, RunStatus, Runner,
    RunnerError,
};

fn duckdb() -> Arc<DuckDbProcessor> {
    Arc::new(DuckDbProcessor::in_memory().unwrap())
}

fn applied(outcome: RunOutcome) -> RunReport {
    match outcome {
        RunOutcome::Applied(report) => report,
        RunOutcome::Preview(_) => panic!("expected an applied run"),
    }
}

async fn applied_versions(runner: &Runner<'_>) -> Vec<i64> {
    runner
        .records()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.version.get())
        .collect()
}

fn versions(report: &RunReport) -> Vec<i64> {
    report.versions().into_iter().map(|v| v.get()).collect()
}

#[tokio::test]
async fn test_up_runs_in_version_order() {
    let set: MigrationSet = vec![
        create_table_unit(1, "t1"),
        create_table_unit(3, "t3"),
        create_table_unit(2, "t2"),
    ]
    .into_iter()
    .collect();
    let db = duckdb();
    let runner = Runner::new(db.clone(), &set).unwrap();

    let report = applied(runner.run(&RunRequest::up()).await.unwrap());
    assert_eq!(report.status, RunStatus::Success);
    assert_eq!(report.direction, Direction::Up);
    assert_eq!(versions(&report), vec![1, 2, 3]);
    assert_eq!(applied_versions(&runner).await, vec![1, 2, 3]);
    for table in ["t1", "t2", "t3"] {
        assert!(db.relation_exists(None, table).await.unwrap());
    }
}

#[tokio::test]
async fn test_rerun_is_noop() {
    let set = MigrationSet::new()
        .with(create_table_unit(1, "t1"))
        .with(create_table_unit(2, "t2"));
    let runner = Runner::new(duckdb(), &set).unwrap();

    runner.run(&RunRequest::up()).await.unwrap();
    let report = applied(runner.run(&RunRequest::up()).await.unwrap());
    assert_eq!(report.status, RunStatus::NoOp);
    assert!(report.units_applied.is_empty());
    assert!(report.is_success());
}

#[tokio::test]
async fn test_up_then_down_restores_state() {
    let set = MigrationSet::new()
        .with(create_table_unit(1, "t1"))
        .with(create_table_unit(2, "t2"))
        .with(create_table_unit(3, "t3"));
    let db = duckdb();
    let runner = Runner::new(db.clone(), &set).unwrap();

    runner.run(&RunRequest::up().to(1)).await.unwrap();
    assert_eq!(applied_versions(&runner).await, vec![1]);

    runner.run(&RunRequest::up()).await.unwrap();
    let report = applied(runner.run(&RunRequest::down().to(1)).await.unwrap());
    assert_eq!(report.direction, Direction::Down);
    assert_eq!(versions(&report), vec![3, 2]);

    assert_eq!(applied_versions(&runner).await, vec![1]);
    assert!(db.relation_exists(None, "t1").await.unwrap());
    assert!(!db.relation_exists(None, "t2").await.unwrap());
    assert!(!db.relation_exists(None, "t3").await.unwrap());
}

#[tokio::test]
async fn test_irreversible_down_fails_before_execution() {
    let irreversible = MigrationUnit::builder(2)
        .description("seed")
        .up(insert_row("t1", 1))
        .build()
        .unwrap();
    let set = MigrationSet::new()
        .with(create_table_unit(1, "t1"))
        .with(irreversible);
    let db = duckdb();
    let runner = Runner::new(db.clone(), &set).unwrap();
    runner.run(&RunRequest::up()).await.unwrap();

    let err = runner.run(&RunRequest::down().to(0)).await.unwrap_err();
    assert!(matches!(err, RunnerError::Plan(_)));
    assert!(err.to_string().contains("2 seed"));

    assert_eq!(applied_versions(&runner).await, vec![1, 2]);
    let rows = db.query("SELECT count(*) FROM t1").await.unwrap();
    assert_eq!(rows[0][0].as_i64(), Some(1));
}

#[tokio::test]
async fn test_failed_unit_rolls_back_everything() {
    let failing = MigrationUnit::builder(2)
        .description("half done")
        .up(SchemaExpression::create_schema("reporting").unwrap())
        .up(SchemaExpression::raw_sql("INSERT INTO no_such_table VALUES (1)").unwrap())
        .up(SchemaExpression::raw_sql("SELECT 1").unwrap())
        .build()
        .unwrap();
    let set = MigrationSet::new()
        .with(create_table_unit(1, "t1"))
        .with(failing)
        .with(create_table_unit(3, "t3"));
    let db = duckdb();
    let runner = Runner::new(db.clone(), &set).unwrap();

    let report = applied(runner.run(&RunRequest::up()).await.unwrap());
    assert_eq!(report.status, RunStatus::Failed);
    assert!(!report.is_success());
    assert_eq!(versions(&report), vec![1]);

    let failure = report.failure.unwrap();
    assert_eq!(failure.unit, "2 half done");
    assert_eq!(failure.version, Some(MigrationVersion::new(2)));
    assert_eq!(failure.statement_index, 1);
    assert!(failure.rolled_back);
    assert!(failure.message.contains("no_such_table"));

    // Unit 1 stays, unit 2 left no trace, unit 3 never ran
    assert_eq!(applied_versions(&runner).await, vec![1]);
    let schemas = db
        .query("SELECT schema_name FROM information_schema.schemata WHERE schema_name = 'reporting'")
        .await
        .unwrap();
    assert!(schemas.is_empty());
    assert!(!db.relation_exists(None, "t3").await.unwrap());
}

#[tokio::test]
async fn test_tag_filter_selects_matching_units() {
    let set = MigrationSet::new()
        .with(tagged_unit(1, "t1", &["a"]))
        .with(tagged_unit(2, "t2", &["b"]))
        .with(tagged_unit(3, "t3", &["a", "b"]));
    let runner = Runner::new(duckdb(), &set).unwrap();

    let request = RunRequest::up().with_tags([Tag::new("a").unwrap()]);
    let report = applied(runner.run(&request).await.unwrap());
    assert_eq!(versions(&report), vec![1, 3]);
    assert_eq!(applied_versions(&runner).await, vec![1, 3]);
}

#[tokio::test]
async fn test_dry_run_changes_nothing() {
    let set = MigrationSet::new()
        .with(create_table_unit(1, "t1"))
        .with(create_table_unit(2, "t2"));
    let db = duckdb();
    let runner = Runner::new(db.clone(), &set).unwrap();

    let outcome = runner.run(&RunRequest::up().dry_run()).await.unwrap();
    let RunOutcome::Preview(preview) = outcome else {
        panic!("expected a preview");
    };
    assert_eq!(preview.steps.len(), 2);
    let script = preview.script(runner.profile());
    assert!(script.contains("-- 1 create t1 (up)"));
    assert!(script.contains("CREATE TABLE \"t2\""));

    assert!(!db.relation_exists(None, "version_info").await.unwrap());
    assert!(!db.relation_exists(None, "t1").await.unwrap());
}

#[tokio::test]
async fn test_cancel_stops_before_next_unit() {
    let set = MigrationSet::new()
        .with(create_table_unit(1, "t1"))
        .with(create_table_unit(2, "t2"));
    let db = duckdb();
    let runner = Runner::new(db.clone(), &set).unwrap();
    runner.cancel_flag().store(true, Ordering::SeqCst);

    let report = applied(runner.run(&RunRequest::up()).await.unwrap());
    assert_eq!(report.status, RunStatus::Cancelled);
    assert!(report.units_applied.is_empty());
    assert!(!db.relation_exists(None, "t1").await.unwrap());
}

/// Raises the cancel flag while the first statement of the run executes.
struct CancelOnFirstStatement {
    flag: Arc<AtomicBool>,
}

impl RunObserver for CancelOnFirstStatement {
    fn on_statement(&self, _step: &PlannedStep, _index: usize, _sql: &str) {
        self.flag.store(true, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn test_cancel_lets_running_unit_commit() {
    let set = MigrationSet::new()
        .with(create_table_unit(1, "t1"))
        .with(create_table_unit(2, "t2"));
    let db = duckdb();
    let flag = Arc::new(AtomicBool::new(false));
    let runner = Runner::new(db.clone(), &set)
        .unwrap()
        .with_cancel_flag(flag.clone())
        .with_observer(Arc::new(CancelOnFirstStatement { flag }));

    let report = applied(runner.run(&RunRequest::up()).await.unwrap());
    assert_eq!(report.status, RunStatus::Cancelled);
    assert_eq!(versions(&report), vec![1]);
    assert!(report.failure.is_none());
    assert_eq!(applied_versions(&runner).await, vec![1]);
    assert!(db.relation_exists(None, "t1").await.unwrap());
    assert!(!db.relation_exists(None, "t2").await.unwrap());
}

#[tokio::test]
async fn test_down_to_zero_forgets_versioned_maintenance() {
    let seed = MaintenanceUnit::builder(MaintenanceStage::AfterAll)
        .description("seed t1")
        .expression(insert_row("t1", 1))
        .version(100)
        .build()
        .unwrap();
    let set = MigrationSet::new()
        .with(create_table_unit(1, "t1"))
        .with_maintenance(seed);
    let db = duckdb();
    let runner = Runner::new(db.clone(), &set).unwrap();
    let before = applied_versions(&runner).await;

    runner.run(&RunRequest::up()).await.unwrap();
    assert_eq!(applied_versions(&runner).await, vec![1, 100]);

    let report = applied(runner.run(&RunRequest::down().to(0)).await.unwrap());
    assert_eq!(report.status, RunStatus::Success);
    assert_eq!(versions(&report), vec![100, 1]);
    assert_eq!(applied_versions(&runner).await, before);
    assert!(!db.relation_exists(None, "t1").await.unwrap());

    // The seed runs again on the next up
    let report = applied(runner.run(&RunRequest::up()).await.unwrap());
    assert_eq!(versions(&report), vec![1, 100]);
    let rows = db.query("SELECT count(*) FROM t1").await.unwrap();
    assert_eq!(rows[0][0].as_i64(), Some(1));
}

#[tokio::test]
async fn test_non_transactional_failure_is_not_rolled_back() {
    let set = MigrationSet::new()
        .with(create_table_unit(1, "t1"))
        .with(
            MigrationUnit::builder(2)
                .description("broken")
                .up(create_table("t2"))
                .up(SchemaExpression::raw_sql("BOOM").unwrap())
                .build()
                .unwrap(),
        );
    let processor = Arc::new(ScriptedProcessor::failing_on("BOOM"));
    let runner = Runner::new(processor.clone(), &set).unwrap();

    let report = applied(runner.run(&RunRequest::up()).await.unwrap());
    assert_eq!(report.status, RunStatus::Failed);
    let failure = report.failure.unwrap();
    assert_eq!(failure.statement_index, 1);
    assert!(!failure.rolled_back);

    assert_eq!(processor.begin_calls(), 0);
    let executed = processor.executed();
    assert!(executed[0].starts_with("CREATE TABLE `version_info`"));
    assert!(executed.iter().any(|s| s.starts_with("CREATE TABLE `t2`")));
    // The partial unit is never recorded
    assert!(!executed
        .iter()
        .any(|s| s.starts_with("INSERT INTO `version_info`") && s.contains("VALUES (2,")));
}

#[tokio::test]
async fn test_report_serializes_to_json() {
    let set = MigrationSet::new().with(create_table_unit(1, "t1"));
    let runner = Runner::new(duckdb(), &set).unwrap();

    let outcome = runner.run(&RunRequest::up()).await.unwrap();
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["kind"], "applied");
    assert_eq!(json["status"], "success");
    assert_eq!(json["direction"], "up");
    assert_eq!(json["units_applied"][0]["version"], 1);
    assert_eq!(json["units_applied"][0]["label"], "1 create t1");
}

#[tokio::test]
async fn test_delete_table_on_missing_table_reports_failure() {
    let set = MigrationSet::new().with(
        MigrationUnit::builder(1)
            .up(SchemaExpression::delete_table(TableRef::new("ghost")).unwrap())
            .build()
            .unwrap(),
    );
    let runner = Runner::new(duckdb(), &set).unwrap();
    let report = applied(runner.run(&RunRequest::up()).await.unwrap());
    assert_eq!(report.status, RunStatus::Failed);
    assert!(applied_versions(&runner).await.is_empty());
}
