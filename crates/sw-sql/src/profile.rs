//! Per-engine dialect descriptors.
//!
//! A [`DialectProfile`] is plain data: quoting, the logical-to-native type
//! table, capability switches and literal spellings. Generation is a set of
//! pure functions over `(expression, profile)`.

use crate::error::{SqlError, SqlResult};
use crate::profiles;
use sw_core::{Dialect, ExpressionKind, ForeignKeyRule, Length, LogicalType, TypeKind};

/// When identifiers are wrapped in quote characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotePolicy {
    Always,
    /// Only identifiers that are reserved or not plain `[A-Za-z][A-Za-z0-9_$#]*`.
    WhenNeeded,
}

/// Which requested sizes a type rule accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeRule {
    /// Any request of the kind, sized or not.
    Any,
    /// Sized requests up to and including the limit (length, or precision for decimals).
    UpTo(u32),
}

/// One row of a dialect type table. `template` may use `$size`,
/// `$precision` and `$scale`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeRule {
    pub kind: TypeKind,
    pub size: SizeRule,
    pub template: &'static str,
}

impl TypeRule {
    pub const fn any(kind: TypeKind, template: &'static str) -> Self {
        Self {
            kind,
            size: SizeRule::Any,
            template,
        }
    }

    pub const fn up_to(kind: TypeKind, limit: u32, template: &'static str) -> Self {
        Self {
            kind,
            size: SizeRule::UpTo(limit),
            template,
        }
    }
}

/// Order and shape of statements produced for an alter-column request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlterColumnPolicy {
    /// One `ALTER TABLE` carrying every action: retype, default, nullability.
    CombinedActions,
    /// One statement per change, same order.
    SeparateStatements,
    /// Drop the named default constraint, alter the column, add the new default.
    DefaultConstraintSwap,
    /// `MODIFY COLUMN` for type/nullability, `ALTER COLUMN` for default-only changes.
    ModifyColumn,
    /// A single `MODIFY (..)` with whichever parts changed.
    ModifyPartial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityStyle {
    /// `GENERATED BY DEFAULT AS IDENTITY`
    GeneratedByDefault,
    /// `IDENTITY(1,1)`
    IdentityFunction,
    /// `AUTO_INCREMENT`
    AutoIncrement,
    /// `INTEGER PRIMARY KEY AUTOINCREMENT`, only on a single-column key
    InlineAutoincrementKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameStyle {
    /// `ALTER TABLE t RENAME TO n` / `ALTER TABLE t RENAME COLUMN c TO n`
    AlterTable,
    /// `RENAME TABLE t TO n`
    RenameStatement,
    /// `EXEC sp_rename ...`
    StoredProcedure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropIndexStyle {
    /// `DROP INDEX schema.ix`
    Standalone,
    /// `DROP INDEX ix ON table`
    OnTable,
}

/// How literal values are spelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiteralStyle {
    pub true_literal: &'static str,
    pub false_literal: &'static str,
    /// Prefix for string literals (`N` on SQL Server)
    pub string_prefix: &'static str,
    /// Backslash is an escape character inside string literals
    pub escape_backslash: bool,
    pub datetime_prefix: &'static str,
    /// chrono format string for the quoted datetime body
    pub datetime_format: &'static str,
    pub current_utc_datetime: &'static str,
    pub new_guid: Option<&'static str>,
}

/// Everything generation needs to know about one engine.
#[derive(Debug, Clone)]
pub struct DialectProfile {
    pub dialect: Dialect,
    pub quote_open: char,
    pub quote_close: char,
    pub quote_policy: QuotePolicy,
    pub reserved_words: &'static [&'static str],
    pub max_identifier_length: Option<usize>,
    pub type_rules: &'static [TypeRule],
    pub unsupported_types: &'static [TypeKind],
    pub unsupported_expressions: &'static [ExpressionKind],
    /// DDL can be rolled back inside a transaction
    pub transactional_ddl: bool,
    /// Object names may carry a schema qualifier
    pub supports_schemas: bool,
    pub alter_column: Option<AlterColumnPolicy>,
    pub identity: Option<IdentityStyle>,
    pub rename_table: Option<RenameStyle>,
    pub rename_column: Option<RenameStyle>,
    pub drop_index: DropIndexStyle,
    /// `ADD COLUMN` or bare `ADD`
    pub add_column_keyword: &'static str,
    /// `CONSTRAINT` or `FOREIGN KEY`
    pub drop_foreign_key_keyword: &'static str,
    /// Column defaults are named constraints (`DF_<table>_<column>`)
    pub named_default_constraints: bool,
    pub on_delete_rules: &'static [ForeignKeyRule],
    pub supports_on_update: bool,
    pub literals: LiteralStyle,
    /// Appended after each statement in a rendered script
    pub statement_terminator: &'static str,
}

impl DialectProfile {
    /// Static profile for a dialect, unchecked.
    pub fn for_dialect(dialect: Dialect) -> &'static DialectProfile {
        match dialect {
            Dialect::Postgres => &profiles::POSTGRES,
            Dialect::SqlServer => &profiles::SQL_SERVER,
            Dialect::MySql => &profiles::MYSQL,
            Dialect::Sqlite => &profiles::SQLITE,
            Dialect::DuckDb => &profiles::DUCKDB,
            Dialect::Oracle => &profiles::ORACLE,
        }
    }

    /// Profile for a dialect after [`check_complete`](Self::check_complete).
    pub fn load(dialect: Dialect) -> SqlResult<&'static DialectProfile> {
        let profile = Self::for_dialect(dialect);
        profile.check_complete()?;
        Ok(profile)
    }

    /// Verify every type kind and expression kind is either handled or
    /// declared unsupported, and that declared support has the capability
    /// settings generation needs.
    pub fn check_complete(&self) -> SqlResult<()> {
        for kind in TypeKind::ALL {
            let mapped = self.type_rules.iter().any(|r| r.kind == kind);
            let declared = self.unsupported_types.contains(&kind);
            if mapped == declared {
                return Err(self.incomplete(format!(
                    "type {kind} must be either mapped or declared unsupported (mapped: {mapped})"
                )));
            }
        }

        for kind in ExpressionKind::ALL {
            if !self.supports(kind) {
                continue;
            }
            let capable = match kind {
                ExpressionKind::AlterColumn => self.alter_column.is_some(),
                ExpressionKind::RenameTable => self.rename_table.is_some(),
                ExpressionKind::RenameColumn => self.rename_column.is_some(),
                ExpressionKind::CreateSchema | ExpressionKind::DeleteSchema => {
                    self.supports_schemas
                }
                ExpressionKind::CreateForeignKey => !self.on_delete_rules.is_empty(),
                _ => true,
            };
            if !capable {
                return Err(self.incomplete(format!(
                    "{kind} is supported but its capability is not configured"
                )));
            }
        }
        Ok(())
    }

    fn incomplete(&self, missing: String) -> SqlError {
        SqlError::IncompleteProfile {
            dialect: self.dialect,
            missing,
        }
    }

    pub fn supports(&self, kind: ExpressionKind) -> bool {
        !self.unsupported_expressions.contains(&kind)
    }

    pub(crate) fn unsupported(&self, operation: impl Into<String>) -> SqlError {
        SqlError::UnsupportedOperation {
            dialect: self.dialect,
            operation: operation.into(),
        }
    }

    fn is_reserved(&self, ident: &str) -> bool {
        self.reserved_words
            .iter()
            .any(|w| w.eq_ignore_ascii_case(ident))
    }

    fn is_plain(ident: &str) -> bool {
        let mut chars = ident.chars();
        chars.next().is_some_and(|c| c.is_ascii_alphabetic())
            && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '#'))
    }

    /// Quote one identifier, doubling embedded closing quote characters.
    pub fn quote_ident(&self, ident: &str) -> SqlResult<String> {
        let length = ident.chars().count();
        if let Some(limit) = self.max_identifier_length {
            if length > limit {
                return Err(SqlError::IdentifierTooLong {
                    dialect: self.dialect,
                    identifier: ident.to_string(),
                    length,
                    limit,
                });
            }
        }

        if self.quote_policy == QuotePolicy::WhenNeeded
            && Self::is_plain(ident)
            && !self.is_reserved(ident)
        {
            return Ok(ident.to_string());
        }

        let close = self.quote_close.to_string();
        let escaped = ident.replace(self.quote_close, &close.repeat(2));
        Ok(format!("{}{}{}", self.quote_open, escaped, self.quote_close))
    }

    /// Quote and join `schema.name`.
    pub fn qualify(&self, schema: Option<&str>, name: &str) -> SqlResult<String> {
        match schema {
            Some(schema) => {
                if !self.supports_schemas {
                    return Err(self.unsupported(format!("schema-qualified name {schema}.{name}")));
                }
                Ok(format!(
                    "{}.{}",
                    self.quote_ident(schema)?,
                    self.quote_ident(name)?
                ))
            }
            None => self.quote_ident(name),
        }
    }

    /// Native spelling of a logical type; the first matching rule wins.
    pub fn native_type(&self, ty: &LogicalType) -> SqlResult<String> {
        let (size, scale) = match *ty {
            LogicalType::Decimal { precision, scale } => (Some(u32::from(precision)), Some(scale)),
            LogicalType::String(Length::Fixed(n))
            | LogicalType::Binary(Length::Fixed(n))
            | LogicalType::FixedString(n) => (Some(n), None),
            _ => (None, None),
        };

        let kind = ty.kind();
        let rule = self
            .type_rules
            .iter()
            .filter(|r| r.kind == kind)
            .find(|r| match r.size {
                SizeRule::Any => true,
                SizeRule::UpTo(limit) => size.is_some_and(|s| s <= limit),
            })
            .ok_or_else(|| SqlError::UnsupportedType {
                dialect: self.dialect,
                ty: ty.to_string(),
            })?;

        let mut native = rule.template.to_string();
        if let Some(size) = size {
            native = native
                .replace("$size", &size.to_string())
                .replace("$precision", &size.to_string());
        }
        if let Some(scale) = scale {
            native = native.replace("$scale", &scale.to_string());
        }
        Ok(native)
    }
}

#[cfg(test)]
#[path = "profile_test.rs"]
mod tests;
