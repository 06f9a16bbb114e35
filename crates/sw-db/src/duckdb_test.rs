use super::*;

#[tokio::test]
async fn test_in_memory() {
    let db = DuckDbProcessor::in_memory().unwrap();
    assert_eq!(db.dialect(), Dialect::DuckDb);
}

#[tokio::test]
async fn test_execute_and_query() {
    let db = DuckDbProcessor::in_memory().unwrap();
    db.execute("CREATE TABLE t (id BIGINT, name VARCHAR, ok BOOLEAN, score DOUBLE)")
        .await
        .unwrap();
    db.execute("INSERT INTO t VALUES (1, 'a', TRUE, 1.5), (2, NULL, FALSE, 2.0)")
        .await
        .unwrap();

    let rows = db.query("SELECT * FROM t ORDER BY id").await.unwrap();
    assert_eq!(
        rows,
        vec![
            vec![
                SqlValue::Integer(1),
                SqlValue::Text("a".to_string()),
                SqlValue::Bool(true),
                SqlValue::Real(1.5),
            ],
            vec![
                SqlValue::Integer(2),
                SqlValue::Null,
                SqlValue::Bool(false),
                SqlValue::Real(2.0),
            ],
        ]
    );
}

#[tokio::test]
async fn test_query_timestamp() {
    let db = DuckDbProcessor::in_memory().unwrap();
    let rows = db
        .query("SELECT TIMESTAMP '2024-03-01 12:30:00'")
        .await
        .unwrap();
    match &rows[0][0] {
        SqlValue::Timestamp(ts) => assert_eq!(ts.to_rfc3339(), "2024-03-01T12:30:00+00:00"),
        other => panic!("expected timestamp, got {:?}", other),
    }
}

#[tokio::test]
async fn test_execution_error_names_statement() {
    let db = DuckDbProcessor::in_memory().unwrap();
    let err = db.execute("SELEC nonsense").await.unwrap_err();
    assert!(matches!(err, DbError::ExecutionError(_)));
    assert!(err.to_string().contains("SELEC nonsense"));
}

#[tokio::test]
async fn test_relation_exists() {
    let db = DuckDbProcessor::in_memory().unwrap();
    assert!(!db.relation_exists(None, "nonexistent").await.unwrap());

    db.execute("CREATE TABLE present (id INT)").await.unwrap();
    assert!(db.relation_exists(None, "present").await.unwrap());

    db.execute("CREATE SCHEMA staging").await.unwrap();
    db.execute("CREATE TABLE staging.other (id INT)").await.unwrap();
    assert!(db.relation_exists(Some("staging"), "other").await.unwrap());
    assert!(!db.relation_exists(None, "other").await.unwrap());
}

#[tokio::test]
async fn test_rollback_discards_ddl() {
    let db = DuckDbProcessor::in_memory().unwrap();
    db.begin_transaction().await.unwrap();
    db.execute("CREATE TABLE temp_t (id INT)").await.unwrap();
    db.rollback().await.unwrap();
    assert!(!db.relation_exists(None, "temp_t").await.unwrap());

    db.begin_transaction().await.unwrap();
    db.execute("CREATE TABLE kept (id INT)").await.unwrap();
    db.commit().await.unwrap();
    assert!(db.relation_exists(None, "kept").await.unwrap());
}

#[tokio::test]
async fn test_commit_without_transaction_fails() {
    let db = DuckDbProcessor::in_memory().unwrap();
    let err = db.commit().await.unwrap_err();
    assert!(matches!(err, DbError::TransactionError { .. }));
}

#[tokio::test]
async fn test_file_database_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.duckdb");

    {
        let db = DuckDbProcessor::from_path(&path).unwrap();
        db.execute("CREATE TABLE persisted (id INT)").await.unwrap();
    }

    let db = DuckDbProcessor::new(path.to_str().unwrap()).unwrap();
    assert!(db.relation_exists(None, "persisted").await.unwrap());
}
