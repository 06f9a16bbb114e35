//! Literal spelling per dialect.

use crate::error::SqlResult;
use crate::profile::DialectProfile;
use chrono::SubsecRound;
use sw_core::Literal;

/// Fractional-second digits kept in timestamp literals; the narrowest
/// supported engine types (MySQL, PostgreSQL, DuckDB) stop at microseconds.
const DATETIME_FRACTION_DIGITS: u16 = 6;

/// Quote a string literal, doubling single quotes (and backslashes where
/// the dialect treats them as escapes).
pub fn quote_text(profile: &DialectProfile, text: &str) -> String {
    let style = &profile.literals;
    let mut escaped = if style.escape_backslash {
        text.replace('\\', "\\\\")
    } else {
        text.to_string()
    };
    escaped = escaped.replace('\'', "''");
    format!("{}'{}'", style.string_prefix, escaped)
}

/// Render a literal value as SQL text.
pub fn render_literal(profile: &DialectProfile, value: &Literal) -> SqlResult<String> {
    let style = &profile.literals;
    let sql = match value {
        Literal::Null => "NULL".to_string(),
        Literal::Bool(true) => style.true_literal.to_string(),
        Literal::Bool(false) => style.false_literal.to_string(),
        Literal::Integer(i) => i.to_string(),
        Literal::Decimal(d) => d.clone(),
        Literal::Text(t) => quote_text(profile, t),
        Literal::DateTime(dt) => format!(
            "{}'{}'",
            style.datetime_prefix,
            dt.trunc_subsecs(DATETIME_FRACTION_DIGITS)
                .format(style.datetime_format)
        ),
        Literal::CurrentUtcDateTime => style.current_utc_datetime.to_string(),
        Literal::NewGuid => style
            .new_guid
            .ok_or_else(|| profile.unsupported("generated guid literals"))?
            .to_string(),
        Literal::Raw(sql) => sql.clone(),
    };
    Ok(sql)
}
