//! Error types for sw-runner

use sw_core::{CoreError, MigrationVersion};
use sw_db::DbError;
use sw_sql::SqlError;
use thiserror::Error;

/// Reasons a plan cannot be built. Nothing has executed when one of these
/// is returned.
#[derive(Error, Debug)]
pub enum PlanError {
    /// Two units share a version (P001)
    #[error("[P001] Version {version} is defined more than once")]
    DuplicateVersion { version: MigrationVersion },

    /// Requested target is neither 0 nor a discovered version (P002)
    #[error("[P002] Target version {target} does not match any migration")]
    TargetNotFound { target: MigrationVersion },

    /// A unit selected for rollback has no down expressions (P003)
    #[error("[P003] Migration {unit} cannot be reverted: it has no down expressions")]
    IrreversibleMigration {
        unit: String,
        version: MigrationVersion,
    },

    /// The dialect cannot render one of the unit's expressions (P004)
    #[error("[P004] Cannot render expression #{index} of {unit}: {source}")]
    Generation {
        unit: String,
        index: usize,
        #[source]
        source: SqlError,
    },
}

/// Engine errors returned before or around execution
#[derive(Error, Debug)]
pub enum RunnerError {
    /// Planning failed (R001)
    #[error("[R001] Planning failed: {0}")]
    Plan(#[from] PlanError),

    /// Dialect profile is unusable (R002)
    #[error("[R002] Dialect profile error: {0}")]
    Sql(#[from] SqlError),

    /// Version store could not be read or created (R003)
    #[error("[R003] Version store error: {0}")]
    Database(#[from] DbError),

    /// Version store table definition failed validation (R004)
    #[error("[R004] Invalid version table definition: {0}")]
    Core(#[from] CoreError),

    /// Version store returned a row it could not interpret (R005)
    #[error("[R005] Unexpected version store row: {0}")]
    CorruptVersionRow(String),
}

/// Result type alias for RunnerError
pub type RunnerResult<T> = Result<T, RunnerError>;
