//! Error types for sw-sql

use sw_core::Dialect;
use thiserror::Error;

/// SQL generation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SqlError {
    /// Type table has no rule for the requested logical type (S001)
    #[error("[S001] {dialect} has no native type for {ty}")]
    UnsupportedType { dialect: Dialect, ty: String },

    /// Dialect cannot express the operation (S002)
    #[error("[S002] {dialect} does not support {operation}")]
    UnsupportedOperation { dialect: Dialect, operation: String },

    /// Identifier exceeds the dialect length limit (S003)
    #[error("[S003] Identifier '{identifier}' is {length} characters; {dialect} allows at most {limit}")]
    IdentifierTooLong {
        dialect: Dialect,
        identifier: String,
        length: usize,
        limit: usize,
    },

    /// Profile leaves a type or expression kind unaccounted for (S004)
    #[error("[S004] Incomplete {dialect} profile: {missing}")]
    IncompleteProfile { dialect: Dialect, missing: String },
}

/// Result type alias for SqlError
pub type SqlResult<T> = Result<T, SqlError>;
