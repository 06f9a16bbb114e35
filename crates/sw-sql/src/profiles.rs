//! Profile data for each supported engine.

use crate::profile::{
    AlterColumnPolicy, DialectProfile, DropIndexStyle, IdentityStyle, LiteralStyle, QuotePolicy,
    RenameStyle, TypeRule,
};
use sw_core::{Dialect, ExpressionKind, ForeignKeyRule, TypeKind};

const ALL_FK_RULES: &[ForeignKeyRule] = &[
    ForeignKeyRule::NoAction,
    ForeignKeyRule::Cascade,
    ForeignKeyRule::SetNull,
    ForeignKeyRule::SetDefault,
    ForeignKeyRule::Restrict,
];

const COMMON_RESERVED: &[&str] = &[
    "ALL", "ALTER", "AND", "AS", "ASC", "BETWEEN", "BY", "CHECK", "COLUMN", "CONSTRAINT",
    "CREATE", "DEFAULT", "DELETE", "DESC", "DISTINCT", "DROP", "FOREIGN", "FROM", "GRANT",
    "GROUP", "HAVING", "IN", "INDEX", "INSERT", "INTO", "IS", "JOIN", "KEY", "LIKE", "NOT",
    "NULL", "ON", "OR", "ORDER", "PRIMARY", "REFERENCES", "SELECT", "SET", "TABLE", "TO",
    "UNION", "UNIQUE", "UPDATE", "USER", "VALUES", "WHERE", "WITH",
];

pub(crate) static POSTGRES: DialectProfile = DialectProfile {
    dialect: Dialect::Postgres,
    quote_open: '"',
    quote_close: '"',
    quote_policy: QuotePolicy::Always,
    reserved_words: COMMON_RESERVED,
    max_identifier_length: Some(63),
    type_rules: &[
        TypeRule::any(TypeKind::Boolean, "BOOLEAN"),
        TypeRule::any(TypeKind::Int16, "SMALLINT"),
        TypeRule::any(TypeKind::Int32, "INTEGER"),
        TypeRule::any(TypeKind::Int64, "BIGINT"),
        TypeRule::any(TypeKind::Float32, "REAL"),
        TypeRule::any(TypeKind::Float64, "DOUBLE PRECISION"),
        TypeRule::up_to(TypeKind::Decimal, 1000, "DECIMAL($precision,$scale)"),
        TypeRule::up_to(TypeKind::String, 10_485_760, "VARCHAR($size)"),
        TypeRule::any(TypeKind::String, "TEXT"),
        TypeRule::up_to(TypeKind::FixedString, 10_485_760, "CHAR($size)"),
        TypeRule::any(TypeKind::Date, "DATE"),
        TypeRule::any(TypeKind::Time, "TIME"),
        TypeRule::any(TypeKind::DateTime, "TIMESTAMP"),
        TypeRule::any(TypeKind::DateTimeOffset, "TIMESTAMPTZ"),
        TypeRule::any(TypeKind::Binary, "BYTEA"),
        TypeRule::any(TypeKind::Guid, "UUID"),
    ],
    unsupported_types: &[],
    unsupported_expressions: &[],
    transactional_ddl: true,
    supports_schemas: true,
    alter_column: Some(AlterColumnPolicy::CombinedActions),
    identity: Some(IdentityStyle::GeneratedByDefault),
    rename_table: Some(RenameStyle::AlterTable),
    rename_column: Some(RenameStyle::AlterTable),
    drop_index: DropIndexStyle::Standalone,
    add_column_keyword: "ADD COLUMN",
    drop_foreign_key_keyword: "CONSTRAINT",
    named_default_constraints: false,
    on_delete_rules: ALL_FK_RULES,
    supports_on_update: true,
    literals: LiteralStyle {
        true_literal: "TRUE",
        false_literal: "FALSE",
        string_prefix: "",
        escape_backslash: false,
        datetime_prefix: "TIMESTAMP ",
        datetime_format: "%Y-%m-%d %H:%M:%S%.f",
        current_utc_datetime: "(NOW() AT TIME ZONE 'UTC')",
        new_guid: Some("gen_random_uuid()"),
    },
    statement_terminator: ";",
};

pub(crate) static SQL_SERVER: DialectProfile = DialectProfile {
    dialect: Dialect::SqlServer,
    quote_open: '[',
    quote_close: ']',
    quote_policy: QuotePolicy::Always,
    reserved_words: COMMON_RESERVED,
    max_identifier_length: Some(128),
    type_rules: &[
        TypeRule::any(TypeKind::Boolean, "BIT"),
        TypeRule::any(TypeKind::Int16, "SMALLINT"),
        TypeRule::any(TypeKind::Int32, "INT"),
        TypeRule::any(TypeKind::Int64, "BIGINT"),
        TypeRule::any(TypeKind::Float32, "REAL"),
        TypeRule::any(TypeKind::Float64, "FLOAT"),
        TypeRule::up_to(TypeKind::Decimal, 38, "DECIMAL($precision,$scale)"),
        TypeRule::up_to(TypeKind::String, 4000, "NVARCHAR($size)"),
        TypeRule::any(TypeKind::String, "NVARCHAR(MAX)"),
        TypeRule::up_to(TypeKind::FixedString, 4000, "NCHAR($size)"),
        TypeRule::any(TypeKind::Date, "DATE"),
        TypeRule::any(TypeKind::Time, "TIME"),
        TypeRule::any(TypeKind::DateTime, "DATETIME2"),
        TypeRule::any(TypeKind::DateTimeOffset, "DATETIMEOFFSET"),
        TypeRule::up_to(TypeKind::Binary, 8000, "VARBINARY($size)"),
        TypeRule::any(TypeKind::Binary, "VARBINARY(MAX)"),
        TypeRule::any(TypeKind::Guid, "UNIQUEIDENTIFIER"),
    ],
    unsupported_types: &[],
    unsupported_expressions: &[],
    transactional_ddl: true,
    supports_schemas: true,
    alter_column: Some(AlterColumnPolicy::DefaultConstraintSwap),
    identity: Some(IdentityStyle::IdentityFunction),
    rename_table: Some(RenameStyle::StoredProcedure),
    rename_column: Some(RenameStyle::StoredProcedure),
    drop_index: DropIndexStyle::OnTable,
    add_column_keyword: "ADD",
    drop_foreign_key_keyword: "CONSTRAINT",
    named_default_constraints: true,
    on_delete_rules: &[
        ForeignKeyRule::NoAction,
        ForeignKeyRule::Cascade,
        ForeignKeyRule::SetNull,
        ForeignKeyRule::SetDefault,
    ],
    supports_on_update: true,
    literals: LiteralStyle {
        true_literal: "1",
        false_literal: "0",
        string_prefix: "N",
        escape_backslash: false,
        datetime_prefix: "",
        datetime_format: "%Y-%m-%dT%H:%M:%S%.f",
        current_utc_datetime: "GETUTCDATE()",
        new_guid: Some("NEWID()"),
    },
    statement_terminator: ";\nGO",
};

pub(crate) static MYSQL: DialectProfile = DialectProfile {
    dialect: Dialect::MySql,
    quote_open: '`',
    quote_close: '`',
    quote_policy: QuotePolicy::Always,
    reserved_words: COMMON_RESERVED,
    max_identifier_length: Some(64),
    type_rules: &[
        TypeRule::any(TypeKind::Boolean, "TINYINT(1)"),
        TypeRule::any(TypeKind::Int16, "SMALLINT"),
        TypeRule::any(TypeKind::Int32, "INTEGER"),
        TypeRule::any(TypeKind::Int64, "BIGINT"),
        TypeRule::any(TypeKind::Float32, "FLOAT"),
        TypeRule::any(TypeKind::Float64, "DOUBLE"),
        TypeRule::up_to(TypeKind::Decimal, 65, "DECIMAL($precision,$scale)"),
        TypeRule::up_to(TypeKind::String, 16_383, "VARCHAR($size)"),
        TypeRule::up_to(TypeKind::String, 65_535, "TEXT"),
        TypeRule::up_to(TypeKind::String, 16_777_215, "MEDIUMTEXT"),
        TypeRule::any(TypeKind::String, "LONGTEXT"),
        TypeRule::up_to(TypeKind::FixedString, 255, "CHAR($size)"),
        TypeRule::any(TypeKind::Date, "DATE"),
        TypeRule::any(TypeKind::Time, "TIME"),
        TypeRule::any(TypeKind::DateTime, "DATETIME"),
        TypeRule::up_to(TypeKind::Binary, 8000, "VARBINARY($size)"),
        TypeRule::up_to(TypeKind::Binary, 16_777_215, "MEDIUMBLOB"),
        TypeRule::any(TypeKind::Binary, "LONGBLOB"),
        TypeRule::any(TypeKind::Guid, "CHAR(36)"),
    ],
    unsupported_types: &[TypeKind::DateTimeOffset],
    unsupported_expressions: &[],
    transactional_ddl: false,
    supports_schemas: true,
    alter_column: Some(AlterColumnPolicy::ModifyColumn),
    identity: Some(IdentityStyle::AutoIncrement),
    rename_table: Some(RenameStyle::RenameStatement),
    rename_column: Some(RenameStyle::AlterTable),
    drop_index: DropIndexStyle::OnTable,
    add_column_keyword: "ADD COLUMN",
    drop_foreign_key_keyword: "FOREIGN KEY",
    named_default_constraints: false,
    on_delete_rules: ALL_FK_RULES,
    supports_on_update: true,
    literals: LiteralStyle {
        true_literal: "TRUE",
        false_literal: "FALSE",
        string_prefix: "",
        escape_backslash: true,
        datetime_prefix: "",
        datetime_format: "%Y-%m-%d %H:%M:%S%.f",
        current_utc_datetime: "UTC_TIMESTAMP()",
        new_guid: Some("UUID()"),
    },
    statement_terminator: ";",
};

pub(crate) static SQLITE: DialectProfile = DialectProfile {
    dialect: Dialect::Sqlite,
    quote_open: '"',
    quote_close: '"',
    quote_policy: QuotePolicy::Always,
    reserved_words: COMMON_RESERVED,
    max_identifier_length: None,
    type_rules: &[
        TypeRule::any(TypeKind::Boolean, "INTEGER"),
        TypeRule::any(TypeKind::Int16, "INTEGER"),
        TypeRule::any(TypeKind::Int32, "INTEGER"),
        TypeRule::any(TypeKind::Int64, "INTEGER"),
        TypeRule::any(TypeKind::Float32, "REAL"),
        TypeRule::any(TypeKind::Float64, "DOUBLE"),
        TypeRule::any(TypeKind::Decimal, "NUMERIC"),
        TypeRule::any(TypeKind::String, "TEXT"),
        TypeRule::any(TypeKind::FixedString, "TEXT"),
        TypeRule::any(TypeKind::Date, "DATE"),
        TypeRule::any(TypeKind::Time, "TIME"),
        TypeRule::any(TypeKind::DateTime, "DATETIME"),
        TypeRule::any(TypeKind::DateTimeOffset, "DATETIME"),
        TypeRule::any(TypeKind::Binary, "BLOB"),
        TypeRule::any(TypeKind::Guid, "UNIQUEIDENTIFIER"),
    ],
    unsupported_types: &[],
    unsupported_expressions: &[
        ExpressionKind::CreateSchema,
        ExpressionKind::DeleteSchema,
        ExpressionKind::AlterColumn,
        ExpressionKind::CreateForeignKey,
        ExpressionKind::DeleteForeignKey,
    ],
    transactional_ddl: true,
    supports_schemas: false,
    alter_column: None,
    identity: Some(IdentityStyle::InlineAutoincrementKey),
    rename_table: Some(RenameStyle::AlterTable),
    rename_column: Some(RenameStyle::AlterTable),
    drop_index: DropIndexStyle::Standalone,
    add_column_keyword: "ADD COLUMN",
    drop_foreign_key_keyword: "CONSTRAINT",
    named_default_constraints: false,
    on_delete_rules: &[],
    supports_on_update: false,
    literals: LiteralStyle {
        true_literal: "1",
        false_literal: "0",
        string_prefix: "",
        escape_backslash: false,
        datetime_prefix: "",
        datetime_format: "%Y-%m-%d %H:%M:%S%.f",
        current_utc_datetime: "CURRENT_TIMESTAMP",
        new_guid: None,
    },
    statement_terminator: ";",
};

pub(crate) static DUCKDB: DialectProfile = DialectProfile {
    dialect: Dialect::DuckDb,
    quote_open: '"',
    quote_close: '"',
    quote_policy: QuotePolicy::Always,
    reserved_words: COMMON_RESERVED,
    max_identifier_length: None,
    type_rules: &[
        TypeRule::any(TypeKind::Boolean, "BOOLEAN"),
        TypeRule::any(TypeKind::Int16, "SMALLINT"),
        TypeRule::any(TypeKind::Int32, "INTEGER"),
        TypeRule::any(TypeKind::Int64, "BIGINT"),
        TypeRule::any(TypeKind::Float32, "REAL"),
        TypeRule::any(TypeKind::Float64, "DOUBLE"),
        TypeRule::up_to(TypeKind::Decimal, 38, "DECIMAL($precision,$scale)"),
        TypeRule::up_to(TypeKind::String, u32::MAX, "VARCHAR($size)"),
        TypeRule::any(TypeKind::String, "VARCHAR"),
        TypeRule::any(TypeKind::FixedString, "VARCHAR($size)"),
        TypeRule::any(TypeKind::Date, "DATE"),
        TypeRule::any(TypeKind::Time, "TIME"),
        TypeRule::any(TypeKind::DateTime, "TIMESTAMP"),
        TypeRule::any(TypeKind::DateTimeOffset, "TIMESTAMPTZ"),
        TypeRule::any(TypeKind::Binary, "BLOB"),
        TypeRule::any(TypeKind::Guid, "UUID"),
    ],
    unsupported_types: &[],
    unsupported_expressions: &[
        ExpressionKind::CreateForeignKey,
        ExpressionKind::DeleteForeignKey,
    ],
    transactional_ddl: true,
    supports_schemas: true,
    alter_column: Some(AlterColumnPolicy::SeparateStatements),
    identity: None,
    rename_table: Some(RenameStyle::AlterTable),
    rename_column: Some(RenameStyle::AlterTable),
    drop_index: DropIndexStyle::Standalone,
    add_column_keyword: "ADD COLUMN",
    drop_foreign_key_keyword: "CONSTRAINT",
    named_default_constraints: false,
    on_delete_rules: &[],
    supports_on_update: false,
    literals: LiteralStyle {
        true_literal: "TRUE",
        false_literal: "FALSE",
        string_prefix: "",
        escape_backslash: false,
        datetime_prefix: "TIMESTAMP ",
        datetime_format: "%Y-%m-%d %H:%M:%S%.f",
        current_utc_datetime: "CURRENT_TIMESTAMP",
        new_guid: Some("uuid()"),
    },
    statement_terminator: ";",
};

pub(crate) static ORACLE: DialectProfile = DialectProfile {
    dialect: Dialect::Oracle,
    quote_open: '"',
    quote_close: '"',
    quote_policy: QuotePolicy::WhenNeeded,
    reserved_words: &[
        "ACCESS", "ADD", "ALL", "ALTER", "AND", "ANY", "AS", "ASC", "AUDIT", "BETWEEN", "BY",
        "CHAR", "CHECK", "CLUSTER", "COLUMN", "COMMENT", "COMPRESS", "CONNECT", "CREATE",
        "CURRENT", "DATE", "DECIMAL", "DEFAULT", "DELETE", "DESC", "DISTINCT", "DROP", "ELSE",
        "EXCLUSIVE", "EXISTS", "FILE", "FLOAT", "FOR", "FROM", "GRANT", "GROUP", "HAVING",
        "IDENTIFIED", "IMMEDIATE", "IN", "INCREMENT", "INDEX", "INITIAL", "INSERT", "INTEGER",
        "INTERSECT", "INTO", "IS", "LEVEL", "LIKE", "LOCK", "LONG", "MAXEXTENTS", "MINUS",
        "MODE", "MODIFY", "NOAUDIT", "NOCOMPRESS", "NOT", "NOWAIT", "NULL", "NUMBER", "OF",
        "OFFLINE", "ON", "ONLINE", "OPTION", "OR", "ORDER", "PCTFREE", "PRIOR", "PUBLIC", "RAW",
        "RENAME", "RESOURCE", "REVOKE", "ROW", "ROWID", "ROWNUM", "ROWS", "SELECT", "SESSION",
        "SET", "SHARE", "SIZE", "SMALLINT", "START", "SUCCESSFUL", "SYNONYM", "SYSDATE", "TABLE",
        "THEN", "TO", "TRIGGER", "UID", "UNION", "UNIQUE", "UPDATE", "USER", "VALIDATE",
        "VALUES", "VARCHAR", "VARCHAR2", "VIEW", "WHENEVER", "WHERE", "WITH",
    ],
    max_identifier_length: Some(30),
    type_rules: &[
        TypeRule::any(TypeKind::Boolean, "NUMBER(1,0)"),
        TypeRule::any(TypeKind::Int16, "NUMBER(5,0)"),
        TypeRule::any(TypeKind::Int32, "NUMBER(10,0)"),
        TypeRule::any(TypeKind::Int64, "NUMBER(19,0)"),
        TypeRule::any(TypeKind::Float32, "BINARY_FLOAT"),
        TypeRule::any(TypeKind::Float64, "BINARY_DOUBLE"),
        TypeRule::up_to(TypeKind::Decimal, 38, "NUMBER($precision,$scale)"),
        TypeRule::up_to(TypeKind::String, 4000, "VARCHAR2($size CHAR)"),
        TypeRule::any(TypeKind::String, "CLOB"),
        TypeRule::up_to(TypeKind::FixedString, 2000, "CHAR($size CHAR)"),
        TypeRule::any(TypeKind::Date, "DATE"),
        TypeRule::any(TypeKind::DateTime, "TIMESTAMP"),
        TypeRule::any(TypeKind::DateTimeOffset, "TIMESTAMP WITH TIME ZONE"),
        TypeRule::up_to(TypeKind::Binary, 2000, "RAW($size)"),
        TypeRule::any(TypeKind::Binary, "BLOB"),
        TypeRule::any(TypeKind::Guid, "RAW(16)"),
    ],
    unsupported_types: &[TypeKind::Time],
    unsupported_expressions: &[ExpressionKind::CreateSchema, ExpressionKind::DeleteSchema],
    transactional_ddl: false,
    supports_schemas: true,
    alter_column: Some(AlterColumnPolicy::ModifyPartial),
    identity: Some(IdentityStyle::GeneratedByDefault),
    rename_table: Some(RenameStyle::AlterTable),
    rename_column: Some(RenameStyle::AlterTable),
    drop_index: DropIndexStyle::Standalone,
    add_column_keyword: "ADD",
    drop_foreign_key_keyword: "CONSTRAINT",
    named_default_constraints: false,
    on_delete_rules: &[
        ForeignKeyRule::NoAction,
        ForeignKeyRule::Cascade,
        ForeignKeyRule::SetNull,
    ],
    supports_on_update: false,
    literals: LiteralStyle {
        true_literal: "1",
        false_literal: "0",
        string_prefix: "",
        escape_backslash: false,
        datetime_prefix: "TIMESTAMP ",
        datetime_format: "%Y-%m-%d %H:%M:%S%.f",
        current_utc_datetime: "SYS_EXTRACT_UTC(SYSTIMESTAMP)",
        new_guid: Some("SYS_GUID()"),
    },
    statement_terminator: ";",
};
