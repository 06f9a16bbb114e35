//! sw-core - Core library for Stepwise
//!
//! Schema expressions, logical types, migration units and the registry the
//! runner consumes, plus project configuration and the YAML migration loader.

pub mod column;
pub mod config;
pub mod error;
pub mod expression;
pub mod migration;
mod newtype_string;
pub mod project;
pub mod types;

pub use column::{ColumnDef, Literal};
pub use config::{Config, DatabaseConfig, Dialect, TargetConfig, VersionTableConfig};
pub use error::{CoreError, CoreResult, ValidationRule};
pub use expression::{
    AlterColumn, CreateForeignKey, CreateIndex, CreateTable, DefaultChange, ExpressionKind,
    ForeignKeyRule, IndexColumn, InsertData, Row, SchemaExpression, SortDirection, TableRef,
};
pub use migration::{
    MaintenanceStage, MaintenanceUnit, MigrationSet, MigrationUnit, MigrationVersion, Tag,
    TransactionBehavior,
};
pub use project::Project;
pub use types::{Length, LogicalType, TypeKind};
