//! Applied-version bookkeeping inside the target database.
//!
//! The table DDL and the insert/delete statements are built as ordinary
//! schema expressions and rendered by the dialect generator, so the store
//! speaks whatever dialect the run does.

use crate::error::{RunnerError, RunnerResult};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;
use sw_core::{
    ColumnDef, CreateTable, InsertData, Literal, LogicalType, MigrationVersion, SchemaExpression,
    TableRef, VersionTableConfig,
};
use sw_db::{Processor, SqlValue};
use sw_sql::{generate, DialectProfile, SqlResult};

const VERSION_COLUMN: &str = "version";
const APPLIED_AT_COLUMN: &str = "applied_at_utc";
const DESCRIPTION_COLUMN: &str = "description";
const DESCRIPTION_LENGTH: u32 = 1024;

/// One row of the version table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VersionRecord {
    pub version: MigrationVersion,
    pub applied_at_utc: Option<DateTime<Utc>>,
    pub description: Option<String>,
}

/// Reads and writes the version table through a caller-supplied processor.
///
/// Writes happen inside whatever transaction the caller has open.
#[derive(Debug, Clone)]
pub struct VersionStore {
    profile: &'static DialectProfile,
    table: TableRef,
}

impl VersionStore {
    pub fn new(profile: &'static DialectProfile, config: &VersionTableConfig) -> Self {
        let table = match &config.schema {
            Some(schema) => TableRef::in_schema(schema.clone(), config.table_name.clone()),
            None => TableRef::new(config.table_name.clone()),
        };
        Self { profile, table }
    }

    pub fn table(&self) -> &TableRef {
        &self.table
    }

    fn table_definition(&self) -> RunnerResult<SchemaExpression> {
        let expr = CreateTable::builder(self.table.clone())
            .column(ColumnDef::new(VERSION_COLUMN, LogicalType::Int64).primary_key())
            .column(ColumnDef::new(APPLIED_AT_COLUMN, LogicalType::DateTime))
            .column(
                ColumnDef::new(DESCRIPTION_COLUMN, LogicalType::string(DESCRIPTION_LENGTH))
                    .nullable(),
            )
            .build()?;
        Ok(expr)
    }

    /// Statements that create the version table.
    pub fn create_statements(&self) -> RunnerResult<Vec<String>> {
        Ok(generate(&self.table_definition()?, self.profile)?)
    }

    /// Statements that record `version` as applied at `applied_at`.
    pub fn record_applied_statements(
        &self,
        version: MigrationVersion,
        description: &str,
        applied_at: DateTime<Utc>,
    ) -> RunnerResult<Vec<String>> {
        let description = if description.is_empty() {
            Literal::Null
        } else {
            Literal::text(description)
        };
        let expr = InsertData::builder(self.table.clone())
            .row([
                (VERSION_COLUMN, Literal::Integer(version.get())),
                (APPLIED_AT_COLUMN, Literal::DateTime(applied_at)),
                (DESCRIPTION_COLUMN, description),
            ])
            .build()?;
        Ok(generate(&expr, self.profile)?)
    }

    /// Statements that forget `version`.
    pub fn record_reverted_statements(
        &self,
        version: MigrationVersion,
    ) -> RunnerResult<Vec<String>> {
        let expr = SchemaExpression::delete_data(
            self.table.clone(),
            [(VERSION_COLUMN, Literal::Integer(version.get()))],
        )?;
        Ok(generate(&expr, self.profile)?)
    }

    fn select_sql(&self) -> SqlResult<String> {
        Ok(format!(
            "SELECT {}, {}, {} FROM {} ORDER BY {}",
            self.profile.quote_ident(VERSION_COLUMN)?,
            self.profile.quote_ident(APPLIED_AT_COLUMN)?,
            self.profile.quote_ident(DESCRIPTION_COLUMN)?,
            self.profile
                .qualify(self.table.schema.as_deref(), &self.table.name)?,
            self.profile.quote_ident(VERSION_COLUMN)?,
        ))
    }

    /// Render every statement the store can issue, so an unusable dialect
    /// fails during planning rather than mid-run.
    pub fn check_generation(&self) -> RunnerResult<()> {
        self.create_statements()?;
        self.record_applied_statements(MigrationVersion::new(1), "check", Utc::now())?;
        self.record_reverted_statements(MigrationVersion::new(1))?;
        self.select_sql()?;
        Ok(())
    }

    pub async fn exists(&self, processor: &dyn Processor) -> RunnerResult<bool> {
        Ok(processor
            .relation_exists(self.table.schema.as_deref(), &self.table.name)
            .await?)
    }

    /// Create the table if it is missing. Returns true when it was created.
    pub async fn ensure_initialized(&self, processor: &dyn Processor) -> RunnerResult<bool> {
        if self.exists(processor).await? {
            return Ok(false);
        }
        log::info!("Creating version table {}", self.table);
        for statement in self.create_statements()? {
            processor.execute(&statement).await?;
        }
        Ok(true)
    }

    /// Every recorded row, ascending by version. A missing table reads as empty.
    pub async fn records(&self, processor: &dyn Processor) -> RunnerResult<Vec<VersionRecord>> {
        if !self.exists(processor).await? {
            return Ok(Vec::new());
        }
        let rows = processor.query(&self.select_sql()?).await?;
        rows.into_iter().map(parse_record).collect()
    }

    /// Applied versions, read fresh on every call.
    pub async fn applied_versions(
        &self,
        processor: &dyn Processor,
    ) -> RunnerResult<BTreeSet<MigrationVersion>> {
        Ok(self
            .records(processor)
            .await?
            .into_iter()
            .map(|r| r.version)
            .collect())
    }

    pub async fn record_applied(
        &self,
        processor: &dyn Processor,
        version: MigrationVersion,
        description: &str,
    ) -> RunnerResult<()> {
        for statement in self.record_applied_statements(version, description, Utc::now())? {
            processor.execute(&statement).await?;
        }
        Ok(())
    }

    pub async fn record_reverted(
        &self,
        processor: &dyn Processor,
        version: MigrationVersion,
    ) -> RunnerResult<()> {
        for statement in self.record_reverted_statements(version)? {
            processor.execute(&statement).await?;
        }
        Ok(())
    }
}

fn parse_record(row: Vec<SqlValue>) -> RunnerResult<VersionRecord> {
    let mut values = row.into_iter();
    let version = match values.next() {
        Some(SqlValue::Integer(v)) => MigrationVersion::new(v),
        Some(SqlValue::Text(t)) => t
            .trim()
            .parse::<i64>()
            .map(MigrationVersion::new)
            .map_err(|_| RunnerError::CorruptVersionRow(format!("version '{t}'")))?,
        other => {
            return Err(RunnerError::CorruptVersionRow(format!(
                "version column holds {:?}",
                other
            )))
        }
    };
    let applied_at_utc = match values.next() {
        Some(SqlValue::Timestamp(ts)) => Some(ts),
        _ => None,
    };
    let description = match values.next() {
        Some(SqlValue::Text(t)) => Some(t),
        _ => None,
    };
    Ok(VersionRecord {
        version,
        applied_at_utc,
        description,
    })
}

#[cfg(test)]
#[path = "version_store_test.rs"]
mod tests;
