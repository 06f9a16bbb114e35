//! Processor construction from project settings.

use crate::duckdb::DuckDbProcessor;
use crate::error::{DbError, DbResult};
use crate::traits::Processor;
use std::sync::Arc;
use sw_core::{DatabaseConfig, Dialect};

/// Open a processor for `dialect` using the resolved database settings.
///
/// Only DuckDB ships a processor; other dialects can still render scripts
/// through a dry run.
pub fn connect(dialect: Dialect, database: &DatabaseConfig) -> DbResult<Arc<dyn Processor>> {
    match dialect {
        Dialect::DuckDb => {
            log::debug!("Opening DuckDB database at {}", database.path);
            Ok(Arc::new(DuckDbProcessor::new(&database.path)?))
        }
        other => Err(DbError::NotImplemented {
            dialect: other.to_string(),
            feature: "statement execution (use --dry-run to render SQL)".to_string(),
        }),
    }
}
