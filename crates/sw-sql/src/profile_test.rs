use super::*;

fn decimal_10_2() -> LogicalType {
    LogicalType::Decimal {
        precision: 10,
        scale: 2,
    }
}

#[test]
fn test_every_profile_is_complete() {
    for dialect in Dialect::ALL {
        let profile = DialectProfile::load(dialect);
        assert!(profile.is_ok(), "{dialect}: {:?}", profile.err());
        assert_eq!(profile.unwrap().dialect, dialect);
    }
}

#[test]
fn test_decimal_golden_fragments() {
    let expected = [
        (Dialect::Postgres, "DECIMAL(10,2)"),
        (Dialect::SqlServer, "DECIMAL(10,2)"),
        (Dialect::MySql, "DECIMAL(10,2)"),
        (Dialect::Sqlite, "NUMERIC"),
        (Dialect::DuckDb, "DECIMAL(10,2)"),
        (Dialect::Oracle, "NUMBER(10,2)"),
    ];
    for (dialect, fragment) in expected {
        let profile = DialectProfile::for_dialect(dialect);
        assert_eq!(
            profile.native_type(&decimal_10_2()).unwrap(),
            fragment,
            "{dialect}"
        );
    }
}

#[test]
fn test_string_rules_pick_first_match() {
    let sql_server = DialectProfile::for_dialect(Dialect::SqlServer);
    assert_eq!(
        sql_server
            .native_type(&LogicalType::String(Length::Fixed(255)))
            .unwrap(),
        "NVARCHAR(255)"
    );
    assert_eq!(
        sql_server
            .native_type(&LogicalType::String(Length::Fixed(5000)))
            .unwrap(),
        "NVARCHAR(MAX)"
    );
    assert_eq!(
        sql_server
            .native_type(&LogicalType::String(Length::Max))
            .unwrap(),
        "NVARCHAR(MAX)"
    );

    let mysql = DialectProfile::for_dialect(Dialect::MySql);
    assert_eq!(
        mysql
            .native_type(&LogicalType::String(Length::Fixed(20_000)))
            .unwrap(),
        "TEXT"
    );
    assert_eq!(
        mysql.native_type(&LogicalType::String(Length::Max)).unwrap(),
        "LONGTEXT"
    );
}

#[test]
fn test_unsupported_type_is_reported() {
    let oracle = DialectProfile::for_dialect(Dialect::Oracle);
    let err = oracle.native_type(&LogicalType::Time).unwrap_err();
    assert!(matches!(err, SqlError::UnsupportedType { .. }));
    assert!(err.to_string().contains("[S001]"));

    // Oracle CHAR tops out at 2000
    let err = oracle
        .native_type(&LogicalType::FixedString(3000))
        .unwrap_err();
    assert!(matches!(err, SqlError::UnsupportedType { .. }));

    let mysql = DialectProfile::for_dialect(Dialect::MySql);
    assert!(mysql.native_type(&LogicalType::DateTimeOffset).is_err());
}

#[test]
fn test_quote_ident_always() {
    let postgres = DialectProfile::for_dialect(Dialect::Postgres);
    assert_eq!(postgres.quote_ident("users").unwrap(), "\"users\"");
    assert_eq!(
        postgres.quote_ident("we\"ird").unwrap(),
        "\"we\"\"ird\""
    );

    let sql_server = DialectProfile::for_dialect(Dialect::SqlServer);
    assert_eq!(sql_server.quote_ident("odd]name").unwrap(), "[odd]]name]");

    let mysql = DialectProfile::for_dialect(Dialect::MySql);
    assert_eq!(mysql.quote_ident("order").unwrap(), "`order`");
}

#[test]
fn test_quote_ident_when_needed() {
    let oracle = DialectProfile::for_dialect(Dialect::Oracle);
    assert_eq!(oracle.quote_ident("ORDERS").unwrap(), "ORDERS");
    assert_eq!(oracle.quote_ident("order_lines").unwrap(), "order_lines");
    assert_eq!(oracle.quote_ident("comment").unwrap(), "\"comment\"");
    assert_eq!(oracle.quote_ident("has space").unwrap(), "\"has space\"");
    assert_eq!(oracle.quote_ident("1st").unwrap(), "\"1st\"");
}

#[test]
fn test_identifier_length_limit() {
    let oracle = DialectProfile::for_dialect(Dialect::Oracle);
    let name = "a".repeat(31);
    let err = oracle.quote_ident(&name).unwrap_err();
    assert_eq!(
        err,
        SqlError::IdentifierTooLong {
            dialect: Dialect::Oracle,
            identifier: name,
            length: 31,
            limit: 30,
        }
    );
    assert!(oracle.quote_ident(&"a".repeat(30)).is_ok());

    let duckdb = DialectProfile::for_dialect(Dialect::DuckDb);
    assert!(duckdb.quote_ident(&"a".repeat(500)).is_ok());
}

#[test]
fn test_qualify_without_schema_support() {
    let sqlite = DialectProfile::for_dialect(Dialect::Sqlite);
    assert_eq!(sqlite.qualify(None, "users").unwrap(), "\"users\"");
    let err = sqlite.qualify(Some("app"), "users").unwrap_err();
    assert!(matches!(err, SqlError::UnsupportedOperation { .. }));

    let postgres = DialectProfile::for_dialect(Dialect::Postgres);
    assert_eq!(
        postgres.qualify(Some("app"), "users").unwrap(),
        "\"app\".\"users\""
    );
}

#[test]
fn test_capability_declarations() {
    let sqlite = DialectProfile::for_dialect(Dialect::Sqlite);
    assert!(!sqlite.supports(ExpressionKind::AlterColumn));
    assert!(!sqlite.supports(ExpressionKind::CreateForeignKey));
    assert!(sqlite.supports(ExpressionKind::CreateTable));

    let duckdb = DialectProfile::for_dialect(Dialect::DuckDb);
    assert!(duckdb.transactional_ddl);
    assert!(duckdb.supports(ExpressionKind::AlterColumn));

    let mysql = DialectProfile::for_dialect(Dialect::MySql);
    assert!(!mysql.transactional_ddl);
}

#[test]
fn test_incomplete_profile_is_rejected() {
    const BOOLEAN_ONLY: &[TypeRule] = &[TypeRule::any(TypeKind::Boolean, "BOOLEAN")];
    let broken = DialectProfile {
        type_rules: BOOLEAN_ONLY,
        ..clone_postgres()
    };
    let err = broken.check_complete().unwrap_err();
    assert!(matches!(err, SqlError::IncompleteProfile { .. }));
    assert!(err.to_string().contains("[S004]"));

    let no_alter = DialectProfile {
        alter_column: None,
        ..clone_postgres()
    };
    let err = no_alter.check_complete().unwrap_err();
    assert!(err.to_string().contains("alter column"));
}

fn clone_postgres() -> DialectProfile {
    DialectProfile::for_dialect(Dialect::Postgres).clone()
}
