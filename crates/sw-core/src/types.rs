//! Logical column types shared by every dialect.

use crate::error::{CoreError, CoreResult, ValidationRule};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Highest decimal precision accepted by the type vocabulary.
pub const MAX_DECIMAL_PRECISION: u8 = 38;

/// Length of a variable-size type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Length {
    Fixed(u32),
    Max,
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Length::Fixed(n) => write!(f, "{n}"),
            Length::Max => f.write_str("max"),
        }
    }
}

/// Column type independent of any database engine.
///
/// Parsed from text such as `int64`, `decimal(10,2)`, `string(255)` or
/// `string(max)`; serialized back to the same canonical spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LogicalType {
    Boolean,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    Decimal { precision: u8, scale: u8 },
    String(Length),
    FixedString(u32),
    Date,
    Time,
    DateTime,
    DateTimeOffset,
    Binary(Length),
    Guid,
}

/// Type tag without parameters, used to key dialect type tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Boolean,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    Decimal,
    String,
    FixedString,
    Date,
    Time,
    DateTime,
    DateTimeOffset,
    Binary,
    Guid,
}

impl TypeKind {
    pub const ALL: [TypeKind; 15] = [
        TypeKind::Boolean,
        TypeKind::Int16,
        TypeKind::Int32,
        TypeKind::Int64,
        TypeKind::Float32,
        TypeKind::Float64,
        TypeKind::Decimal,
        TypeKind::String,
        TypeKind::FixedString,
        TypeKind::Date,
        TypeKind::Time,
        TypeKind::DateTime,
        TypeKind::DateTimeOffset,
        TypeKind::Binary,
        TypeKind::Guid,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TypeKind::Boolean => "boolean",
            TypeKind::Int16 => "int16",
            TypeKind::Int32 => "int32",
            TypeKind::Int64 => "int64",
            TypeKind::Float32 => "float32",
            TypeKind::Float64 => "float64",
            TypeKind::Decimal => "decimal",
            TypeKind::String => "string",
            TypeKind::FixedString => "fixed_string",
            TypeKind::Date => "date",
            TypeKind::Time => "time",
            TypeKind::DateTime => "datetime",
            TypeKind::DateTimeOffset => "datetimeoffset",
            TypeKind::Binary => "binary",
            TypeKind::Guid => "guid",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl LogicalType {
    pub fn decimal(precision: u8, scale: u8) -> Self {
        LogicalType::Decimal { precision, scale }
    }

    pub fn string(length: u32) -> Self {
        LogicalType::String(Length::Fixed(length))
    }

    pub fn string_max() -> Self {
        LogicalType::String(Length::Max)
    }

    pub fn binary(length: u32) -> Self {
        LogicalType::Binary(Length::Fixed(length))
    }

    pub fn kind(&self) -> TypeKind {
        match self {
            LogicalType::Boolean => TypeKind::Boolean,
            LogicalType::Int16 => TypeKind::Int16,
            LogicalType::Int32 => TypeKind::Int32,
            LogicalType::Int64 => TypeKind::Int64,
            LogicalType::Float32 => TypeKind::Float32,
            LogicalType::Float64 => TypeKind::Float64,
            LogicalType::Decimal { .. } => TypeKind::Decimal,
            LogicalType::String(_) => TypeKind::String,
            LogicalType::FixedString(_) => TypeKind::FixedString,
            LogicalType::Date => TypeKind::Date,
            LogicalType::Time => TypeKind::Time,
            LogicalType::DateTime => TypeKind::DateTime,
            LogicalType::DateTimeOffset => TypeKind::DateTimeOffset,
            LogicalType::Binary(_) => TypeKind::Binary,
            LogicalType::Guid => TypeKind::Guid,
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            LogicalType::Int16 | LogicalType::Int32 | LogicalType::Int64
        )
    }

    /// Check precision and length bounds; `object` names the owning column.
    pub fn validate(&self, object: &str) -> CoreResult<()> {
        match *self {
            LogicalType::Decimal { precision, scale } => {
                if precision == 0 || precision > MAX_DECIMAL_PRECISION {
                    return Err(CoreError::validation(
                        ValidationRule::DecimalPrecision,
                        object,
                        format!("precision {precision} must be between 1 and {MAX_DECIMAL_PRECISION}"),
                    ));
                }
                if scale > precision {
                    return Err(CoreError::validation(
                        ValidationRule::DecimalPrecision,
                        object,
                        format!("scale {scale} exceeds precision {precision}"),
                    ));
                }
                Ok(())
            }
            LogicalType::String(Length::Fixed(0))
            | LogicalType::Binary(Length::Fixed(0))
            | LogicalType::FixedString(0) => Err(CoreError::validation(
                ValidationRule::PositiveLength,
                object,
                "length must be greater than zero",
            )),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalType::Decimal { precision, scale } => {
                write!(f, "decimal({precision},{scale})")
            }
            LogicalType::String(len) => write!(f, "string({len})"),
            LogicalType::FixedString(len) => write!(f, "fixed_string({len})"),
            LogicalType::Binary(len) => write!(f, "binary({len})"),
            other => f.write_str(other.kind().name()),
        }
    }
}

impl From<LogicalType> for String {
    fn from(ty: LogicalType) -> Self {
        ty.to_string()
    }
}

impl TryFrom<String> for LogicalType {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Split `name(args)` into the lowercased name and its comma-separated arguments.
fn split_type_text(text: &str) -> Option<(String, Vec<String>)> {
    let text = text.trim();
    match text.find('(') {
        None => Some((text.to_lowercase(), Vec::new())),
        Some(open) => {
            let inner = text[open + 1..].strip_suffix(')')?;
            let args = inner
                .split(',')
                .map(|a| a.trim().to_lowercase())
                .collect();
            Some((text[..open].trim().to_lowercase(), args))
        }
    }
}

fn parse_length(arg: &str) -> Option<Length> {
    if arg == "max" {
        Some(Length::Max)
    } else {
        arg.parse().ok().map(Length::Fixed)
    }
}

impl FromStr for LogicalType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || CoreError::UnknownType {
            text: s.to_string(),
        };
        let (name, args) = split_type_text(s).ok_or_else(unknown)?;
        let args: Vec<&str> = args.iter().map(String::as_str).collect();

        let ty = match (name.as_str(), args.as_slice()) {
            ("boolean" | "bool", []) => LogicalType::Boolean,
            ("int16" | "smallint", []) => LogicalType::Int16,
            ("int32" | "int" | "integer", []) => LogicalType::Int32,
            ("int64" | "bigint", []) => LogicalType::Int64,
            ("float32" | "real", []) => LogicalType::Float32,
            ("float64" | "double", []) => LogicalType::Float64,
            ("decimal", [p]) => LogicalType::Decimal {
                precision: p.parse().map_err(|_| unknown())?,
                scale: 0,
            },
            ("decimal", [p, sc]) => LogicalType::Decimal {
                precision: p.parse().map_err(|_| unknown())?,
                scale: sc.parse().map_err(|_| unknown())?,
            },
            ("string" | "text", []) => LogicalType::String(Length::Max),
            ("string", [len]) => LogicalType::String(parse_length(len).ok_or_else(unknown)?),
            ("fixed_string" | "char", [len]) => {
                LogicalType::FixedString(len.parse().map_err(|_| unknown())?)
            }
            ("date", []) => LogicalType::Date,
            ("time", []) => LogicalType::Time,
            ("datetime" | "timestamp", []) => LogicalType::DateTime,
            ("datetimeoffset" | "timestamptz", []) => LogicalType::DateTimeOffset,
            ("binary" | "blob", []) => LogicalType::Binary(Length::Max),
            ("binary", [len]) => LogicalType::Binary(parse_length(len).ok_or_else(unknown)?),
            ("guid" | "uuid", []) => LogicalType::Guid,
            _ => return Err(unknown()),
        };
        Ok(ty)
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
