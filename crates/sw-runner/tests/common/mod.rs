//! Shared helpers for engine integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use sw_core::{
    ColumnDef, CreateTable, Dialect, InsertData, Literal, LogicalType, MigrationUnit,
    SchemaExpression, TableRef, Tag,
};
use sw_db::{DbError, DbResult, Processor, SqlValue};

/// A unit that creates `table` with an `id` key and drops it on the way down.
pub fn create_table_unit(version: i64, table: &str) -> MigrationUnit {
    MigrationUnit::builder(version)
        .description(format!("create {table}"))
        .up(create_table(table))
        .down(SchemaExpression::delete_table(TableRef::new(table)).unwrap())
        .build()
        .unwrap()
}

pub fn tagged_unit(version: i64, table: &str, tags: &[&str]) -> MigrationUnit {
    let mut builder = MigrationUnit::builder(version)
        .description(format!("create {table}"))
        .up(create_table(table))
        .down(SchemaExpression::delete_table(TableRef::new(table)).unwrap());
    for tag in tags {
        builder = builder.tag(Tag::new(*tag).unwrap());
    }
    builder.build().unwrap()
}

pub fn create_table(table: &str) -> SchemaExpression {
    CreateTable::builder(TableRef::new(table))
        .column(ColumnDef::new("id", LogicalType::Int64).primary_key())
        .column(ColumnDef::new("name", LogicalType::string(50)).nullable())
        .build()
        .unwrap()
}

pub fn insert_row(table: &str, id: i64) -> SchemaExpression {
    InsertData::builder(TableRef::new(table))
        .row([("id", Literal::Integer(id)), ("name", Literal::text("row"))])
        .build()
        .unwrap()
}

/// Processor for a dialect without transactional DDL. Records every
/// statement and fails any statement containing the configured marker.
pub struct ScriptedProcessor {
    fail_on: Option<String>,
    executed: Mutex<Vec<String>>,
    tables: Mutex<Vec<String>>,
    begins: AtomicUsize,
}

impl ScriptedProcessor {
    pub fn new() -> Self {
        Self {
            fail_on: None,
            executed: Mutex::new(Vec::new()),
            tables: Mutex::new(Vec::new()),
            begins: AtomicUsize::new(0),
        }
    }

    pub fn failing_on(marker: &str) -> Self {
        Self {
            fail_on: Some(marker.to_string()),
            ..Self::new()
        }
    }

    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }

    pub fn begin_calls(&self) -> usize {
        self.begins.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Processor for ScriptedProcessor {
    fn dialect(&self) -> Dialect {
        Dialect::MySql
    }

    async fn begin_transaction(&self) -> DbResult<()> {
        self.begins.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn execute(&self, sql: &str) -> DbResult<usize> {
        if let Some(marker) = &self.fail_on {
            if sql.contains(marker.as_str()) {
                return Err(DbError::ExecutionError(format!("scripted failure: {sql}")));
            }
        }
        if let Some(rest) = sql.strip_prefix("CREATE TABLE `") {
            if let Some(end) = rest.find('`') {
                self.tables.lock().unwrap().push(rest[..end].to_string());
            }
        }
        self.executed.lock().unwrap().push(sql.to_string());
        Ok(0)
    }

    async fn query(&self, _sql: &str) -> DbResult<Vec<Vec<SqlValue>>> {
        Ok(Vec::new())
    }

    async fn relation_exists(&self, _schema: Option<&str>, name: &str) -> DbResult<bool> {
        Ok(self.tables.lock().unwrap().iter().any(|t| t == name))
    }

    async fn commit(&self) -> DbResult<()> {
        Ok(())
    }

    async fn rollback(&self) -> DbResult<()> {
        Ok(())
    }
}
