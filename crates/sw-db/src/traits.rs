//! Processor trait definition

use crate::error::DbResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sw_core::Dialect;

/// A scalar read back from a query.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Integer(i64),
    Real(f64),
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl SqlValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SqlValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SqlValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Opaque statement executor the engine drives.
///
/// Implementations must be Send + Sync for async operation. Transaction
/// calls bracket whatever `execute` calls happen between them on the same
/// connection.
#[async_trait]
pub trait Processor: Send + Sync {
    /// Dialect this processor speaks
    fn dialect(&self) -> Dialect;

    async fn begin_transaction(&self) -> DbResult<()>;

    /// Execute one statement, returning affected rows where the driver reports them
    async fn execute(&self, sql: &str) -> DbResult<usize>;

    /// Run a query and return every row as scalars
    async fn query(&self, sql: &str) -> DbResult<Vec<Vec<SqlValue>>>;

    /// Check whether a table exists; `schema` defaults to the connection's default schema
    async fn relation_exists(&self, schema: Option<&str>, name: &str) -> DbResult<bool>;

    async fn commit(&self) -> DbResult<()>;

    async fn rollback(&self) -> DbResult<()>;
}
