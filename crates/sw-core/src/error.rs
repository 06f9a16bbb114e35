//! Error types for sw-core

use std::fmt;
use thiserror::Error;

/// Structural rule checked when an expression or unit is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationRule {
    NonEmptyName,
    TableHasColumns,
    UniqueColumnNames,
    SinglePrimaryKey,
    PrimaryKeyColumns,
    IdentityType,
    DecimalPrecision,
    PositiveLength,
    IndexHasColumns,
    ForeignKeyColumns,
    AlterColumnChange,
    DeleteColumnList,
    InsertRows,
    DeleteDataFilter,
    RawSqlNotEmpty,
    PositiveVersion,
    UnitHasUp,
    MaintenanceStage,
}

impl ValidationRule {
    /// Stable kebab-case name used in error output.
    pub fn name(&self) -> &'static str {
        match self {
            ValidationRule::NonEmptyName => "non-empty-name",
            ValidationRule::TableHasColumns => "table-has-columns",
            ValidationRule::UniqueColumnNames => "unique-column-names",
            ValidationRule::SinglePrimaryKey => "single-primary-key",
            ValidationRule::PrimaryKeyColumns => "primary-key-columns",
            ValidationRule::IdentityType => "identity-type",
            ValidationRule::DecimalPrecision => "decimal-precision",
            ValidationRule::PositiveLength => "positive-length",
            ValidationRule::IndexHasColumns => "index-has-columns",
            ValidationRule::ForeignKeyColumns => "foreign-key-columns",
            ValidationRule::AlterColumnChange => "alter-column-change",
            ValidationRule::DeleteColumnList => "delete-column-list",
            ValidationRule::InsertRows => "insert-rows",
            ValidationRule::DeleteDataFilter => "delete-data-filter",
            ValidationRule::RawSqlNotEmpty => "raw-sql-not-empty",
            ValidationRule::PositiveVersion => "positive-version",
            ValidationRule::UnitHasUp => "unit-has-up",
            ValidationRule::MaintenanceStage => "maintenance-stage",
        }
    }
}

impl fmt::Display for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Core error type for Stepwise
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Invalid configuration value
    #[error("[E002] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E003: Project directory not found
    #[error("[E003] Project directory not found: {path}")]
    ProjectNotFound { path: String },

    /// E004: Migration file could not be turned into a unit
    #[error("[E004] Invalid migration file {path}: {source}")]
    MigrationFile {
        path: String,
        #[source]
        source: Box<CoreError>,
    },

    /// E005: Migration file is structurally wrong (missing version, bad literal, ...)
    #[error("[E005] {message}")]
    MigrationDefinition { message: String },

    /// E006: Unknown logical type text
    #[error("[E006] Unknown logical type '{text}'")]
    UnknownType { text: String },

    /// E007: sql_file template failed to render
    #[error("[E007] Failed to render '{path}': {message}")]
    ScriptRender { path: String, message: String },

    /// V001: An expression or unit broke a structural rule
    #[error("[V001] {rule} violated by {object}: {message}")]
    Validation {
        rule: ValidationRule,
        object: String,
        message: String,
    },

    /// E008: IO error
    #[error("[E008] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// E009: IO error with file path context
    #[error("[E009] IO error at {path}: {source}")]
    IoWithPath {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// E010: YAML parse error
    #[error("[E010] YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    pub(crate) fn validation(
        rule: ValidationRule,
        object: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        CoreError::Validation {
            rule,
            object: object.into(),
            message: message.into(),
        }
    }

    /// The broken rule, looking through file context.
    pub fn validation_rule(&self) -> Option<ValidationRule> {
        match self {
            CoreError::Validation { rule, .. } => Some(*rule),
            CoreError::MigrationFile { source, .. } => source.validation_rule(),
            _ => None,
        }
    }
}
