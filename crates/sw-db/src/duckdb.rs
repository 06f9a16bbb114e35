//! DuckDB processor implementation

use crate::error::{DbError, DbResult};
use crate::traits::{Processor, SqlValue};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use duckdb::types::{TimeUnit, Value};
use duckdb::{params, Connection};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use sw_core::Dialect;

/// DuckDB processor over a single connection
pub struct DuckDbProcessor {
    conn: Mutex<Connection>,
}

impl DuckDbProcessor {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path).map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    fn execute_sync(&self, sql: &str) -> DbResult<usize> {
        let conn = self.lock()?;
        conn.execute(sql, [])
            .map_err(|e| DbError::ExecutionError(format!("{}: {}", e, sql)))
    }

    fn transaction_sync(&self, action: &str, sql: &str) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(sql)
            .map_err(|e| DbError::TransactionError {
                action: action.to_string(),
                message: e.to_string(),
            })
    }

    fn query_sync(&self, sql: &str) -> DbResult<Vec<Vec<SqlValue>>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| DbError::ExecutionError(format!("{}: {}", e, sql)))?;
        let mut rows = stmt.query([])?;

        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let width = row.as_ref().column_count();
            let mut values = Vec::with_capacity(width);
            for idx in 0..width {
                values.push(to_sql_value(row.get::<_, Value>(idx)?));
            }
            out.push(values);
        }
        Ok(out)
    }

    fn relation_exists_sync(&self, schema: Option<&str>, name: &str) -> DbResult<bool> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = ? AND table_name = ?",
            params![schema.unwrap_or("main"), name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}

fn timestamp_from(unit: TimeUnit, value: i64) -> Option<DateTime<Utc>> {
    match unit {
        TimeUnit::Second => DateTime::from_timestamp(value, 0),
        TimeUnit::Millisecond => DateTime::from_timestamp_millis(value),
        TimeUnit::Microsecond => DateTime::from_timestamp_micros(value),
        TimeUnit::Nanosecond => Some(DateTime::from_timestamp_nanos(value)),
    }
}

fn to_sql_value(value: Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Boolean(b) => SqlValue::Bool(b),
        Value::TinyInt(i) => SqlValue::Integer(i64::from(i)),
        Value::SmallInt(i) => SqlValue::Integer(i64::from(i)),
        Value::Int(i) => SqlValue::Integer(i64::from(i)),
        Value::BigInt(i) => SqlValue::Integer(i),
        Value::UTinyInt(i) => SqlValue::Integer(i64::from(i)),
        Value::USmallInt(i) => SqlValue::Integer(i64::from(i)),
        Value::UInt(i) => SqlValue::Integer(i64::from(i)),
        Value::Float(f) => SqlValue::Real(f64::from(f)),
        Value::Double(f) => SqlValue::Real(f),
        Value::Text(s) => SqlValue::Text(s),
        Value::Timestamp(unit, v) => match timestamp_from(unit, v) {
            Some(ts) => SqlValue::Timestamp(ts),
            None => SqlValue::Text(v.to_string()),
        },
        other => SqlValue::Text(format!("{:?}", other)),
    }
}

#[async_trait]
impl Processor for DuckDbProcessor {
    fn dialect(&self) -> Dialect {
        Dialect::DuckDb
    }

    async fn begin_transaction(&self) -> DbResult<()> {
        self.transaction_sync("begin", "BEGIN TRANSACTION")
    }

    async fn execute(&self, sql: &str) -> DbResult<usize> {
        self.execute_sync(sql)
    }

    async fn query(&self, sql: &str) -> DbResult<Vec<Vec<SqlValue>>> {
        self.query_sync(sql)
    }

    async fn relation_exists(&self, schema: Option<&str>, name: &str) -> DbResult<bool> {
        self.relation_exists_sync(schema, name)
    }

    async fn commit(&self) -> DbResult<()> {
        self.transaction_sync("commit", "COMMIT")
    }

    async fn rollback(&self) -> DbResult<()> {
        self.transaction_sync("rollback", "ROLLBACK")
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
