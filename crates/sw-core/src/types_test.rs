use super::*;

#[test]
fn test_parse_simple_types() {
    assert_eq!("int64".parse::<LogicalType>().unwrap(), LogicalType::Int64);
    assert_eq!("BIGINT".parse::<LogicalType>().unwrap(), LogicalType::Int64);
    assert_eq!("bool".parse::<LogicalType>().unwrap(), LogicalType::Boolean);
    assert_eq!("uuid".parse::<LogicalType>().unwrap(), LogicalType::Guid);
    assert_eq!(
        "timestamptz".parse::<LogicalType>().unwrap(),
        LogicalType::DateTimeOffset
    );
}

#[test]
fn test_parse_parameterised_types() {
    assert_eq!(
        "decimal(10,2)".parse::<LogicalType>().unwrap(),
        LogicalType::decimal(10, 2)
    );
    assert_eq!(
        "decimal( 18 , 4 )".parse::<LogicalType>().unwrap(),
        LogicalType::decimal(18, 4)
    );
    assert_eq!(
        "decimal(9)".parse::<LogicalType>().unwrap(),
        LogicalType::decimal(9, 0)
    );
    assert_eq!(
        "string(255)".parse::<LogicalType>().unwrap(),
        LogicalType::string(255)
    );
    assert_eq!(
        "string(MAX)".parse::<LogicalType>().unwrap(),
        LogicalType::string_max()
    );
    assert_eq!(
        "text".parse::<LogicalType>().unwrap(),
        LogicalType::string_max()
    );
    assert_eq!(
        "char(3)".parse::<LogicalType>().unwrap(),
        LogicalType::FixedString(3)
    );
    assert_eq!(
        "binary(16)".parse::<LogicalType>().unwrap(),
        LogicalType::binary(16)
    );
}

#[test]
fn test_parse_rejects_unknown_text() {
    for text in ["varchar2", "decimal(a,b)", "string(", "int64(4)", ""] {
        let err = text.parse::<LogicalType>().unwrap_err();
        assert!(
            matches!(err, CoreError::UnknownType { .. }),
            "{text}: {err:?}"
        );
    }
}

#[test]
fn test_display_is_canonical() {
    assert_eq!(LogicalType::decimal(10, 2).to_string(), "decimal(10,2)");
    assert_eq!(LogicalType::string_max().to_string(), "string(max)");
    assert_eq!(LogicalType::Int32.to_string(), "int32");
    let reparsed: LogicalType = LogicalType::FixedString(2).to_string().parse().unwrap();
    assert_eq!(reparsed, LogicalType::FixedString(2));
}

#[test]
fn test_validate_decimal_bounds() {
    assert!(LogicalType::decimal(38, 38).validate("c").is_ok());

    let err = LogicalType::decimal(39, 2).validate("price").unwrap_err();
    assert_eq!(err.validation_rule(), Some(ValidationRule::DecimalPrecision));

    let err = LogicalType::decimal(0, 0).validate("price").unwrap_err();
    assert_eq!(err.validation_rule(), Some(ValidationRule::DecimalPrecision));

    let err = LogicalType::decimal(4, 5).validate("price").unwrap_err();
    assert_eq!(err.validation_rule(), Some(ValidationRule::DecimalPrecision));
}

#[test]
fn test_validate_zero_length() {
    for ty in [
        LogicalType::string(0),
        LogicalType::binary(0),
        LogicalType::FixedString(0),
    ] {
        let err = ty.validate("c").unwrap_err();
        assert_eq!(err.validation_rule(), Some(ValidationRule::PositiveLength));
    }
    assert!(LogicalType::string_max().validate("c").is_ok());
}

#[test]
fn test_deserialize_from_yaml() {
    let ty: LogicalType = serde_yaml::from_str("\"decimal(12,3)\"").unwrap();
    assert_eq!(ty, LogicalType::decimal(12, 3));
    assert!(serde_yaml::from_str::<LogicalType>("nonsense").is_err());
}

#[test]
fn test_kind_all_covers_every_kind_once() {
    let mut names: Vec<&str> = TypeKind::ALL.iter().map(TypeKind::name).collect();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), TypeKind::ALL.len());
}
