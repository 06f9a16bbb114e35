//! Column definitions and literal values.

use crate::error::{CoreError, CoreResult, ValidationRule};
use crate::types::LogicalType;
use chrono::{DateTime, Utc};
use std::fmt;

/// A value written into generated SQL, either as a default or as row data.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    Integer(i64),
    /// Decimal kept as text so no precision is lost before rendering.
    Decimal(String),
    Text(String),
    DateTime(DateTime<Utc>),
    CurrentUtcDateTime,
    NewGuid,
    /// Emitted verbatim.
    Raw(String),
}

impl Literal {
    pub fn text(value: impl Into<String>) -> Self {
        Literal::Text(value.into())
    }

    pub fn raw(sql: impl Into<String>) -> Self {
        Literal::Raw(sql.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Literal::Null)
    }

    pub(crate) fn validate(&self, object: &str) -> CoreResult<()> {
        match self {
            Literal::Decimal(text) if !is_decimal_text(text) => {
                Err(CoreError::MigrationDefinition {
                    message: format!("{object}: '{text}' is not a decimal literal"),
                })
            }
            Literal::Raw(sql) if sql.trim().is_empty() => Err(CoreError::validation(
                ValidationRule::RawSqlNotEmpty,
                object,
                "raw literal must not be blank",
            )),
            _ => Ok(()),
        }
    }
}

fn is_decimal_text(text: &str) -> bool {
    let digits = text.strip_prefix(&['-', '+'][..]).unwrap_or(text);
    let mut parts = digits.splitn(2, '.');
    let whole = parts.next().unwrap_or_default();
    let frac = parts.next();
    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    match frac {
        None => !whole.is_empty() && all_digits(whole),
        Some(frac) => {
            !(whole.is_empty() && frac.is_empty()) && all_digits(whole) && all_digits(frac)
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => f.write_str("null"),
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::Integer(i) => write!(f, "{i}"),
            Literal::Decimal(d) => f.write_str(d),
            Literal::Text(t) => write!(f, "'{t}'"),
            Literal::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
            Literal::CurrentUtcDateTime => f.write_str("current_utc_datetime()"),
            Literal::NewGuid => f.write_str("new_guid()"),
            Literal::Raw(sql) => f.write_str(sql),
        }
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Bool(value)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Integer(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::Text(value.to_string())
    }
}

impl From<DateTime<Utc>> for Literal {
    fn from(value: DateTime<Utc>) -> Self {
        Literal::DateTime(value)
    }
}

/// A column as declared in a create-table or add-column expression.
///
/// Columns are `NOT NULL` unless marked [`nullable`](Self::nullable).
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    pub ty: LogicalType,
    pub nullable: bool,
    pub default: Option<Literal>,
    pub primary_key: bool,
    pub unique: bool,
    pub identity: bool,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, ty: LogicalType) -> Self {
        Self {
            name: name.into(),
            ty,
            nullable: false,
            default: None,
            primary_key: false,
            unique: false,
            identity: false,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<Literal>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn identity(mut self) -> Self {
        self.identity = true;
        self
    }

    /// Rules that hold for a column regardless of its table.
    pub(crate) fn validate(&self, table: &str) -> CoreResult<()> {
        let object = format!("{table}.{}", self.name);
        if self.name.trim().is_empty() {
            return Err(CoreError::validation(
                ValidationRule::NonEmptyName,
                table,
                "column name must not be empty",
            ));
        }
        self.ty.validate(&object)?;
        if self.identity && !self.ty.is_integer() {
            return Err(CoreError::validation(
                ValidationRule::IdentityType,
                object,
                format!("identity column must be an integer type, found {}", self.ty),
            ));
        }
        if self.primary_key && self.nullable {
            return Err(CoreError::validation(
                ValidationRule::PrimaryKeyColumns,
                object,
                "primary key column cannot be nullable",
            ));
        }
        if let Some(default) = &self.default {
            default.validate(&object)?;
        }
        Ok(())
    }
}
