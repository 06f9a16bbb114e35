use super::*;

fn users() -> TableRef {
    TableRef::new("users")
}

fn rule_of(result: CoreResult<SchemaExpression>) -> ValidationRule {
    result
        .unwrap_err()
        .validation_rule()
        .expect("expected a validation error")
}

#[test]
fn test_create_table_with_column_key() {
    let expr = CreateTable::builder(TableRef::in_schema("app", "users"))
        .column(ColumnDef::new("id", LogicalType::Int64).primary_key().identity())
        .column(ColumnDef::new("email", LogicalType::string(320)).unique())
        .build()
        .unwrap();

    assert_eq!(expr.kind(), ExpressionKind::CreateTable);
    assert_eq!(expr.describe(), "create table app.users");
    let SchemaExpression::CreateTable(table) = &expr else {
        panic!("expected CreateTable");
    };
    assert_eq!(table.primary_key_columns(), vec!["id"]);
    assert_eq!(table.primary_key_name(), "PK_users");
}

#[test]
fn test_create_table_with_table_level_key() {
    let expr = CreateTable::builder(users())
        .column(ColumnDef::new("tenant", LogicalType::Int32))
        .column(ColumnDef::new("id", LogicalType::Int64))
        .primary_key_named("pk_users_tenant", ["tenant", "id"])
        .build()
        .unwrap();
    let SchemaExpression::CreateTable(table) = &expr else {
        panic!("expected CreateTable");
    };
    assert_eq!(table.primary_key_columns(), vec!["tenant", "id"]);
    assert_eq!(table.primary_key_name(), "pk_users_tenant");
}

#[test]
fn test_create_table_rules() {
    assert_eq!(
        rule_of(CreateTable::builder(users()).build()),
        ValidationRule::TableHasColumns
    );
    assert_eq!(
        rule_of(
            CreateTable::builder(TableRef::new(""))
                .column(ColumnDef::new("id", LogicalType::Int32).primary_key())
                .build()
        ),
        ValidationRule::NonEmptyName
    );
    assert_eq!(
        rule_of(
            CreateTable::builder(users())
                .column(ColumnDef::new("id", LogicalType::Int32).primary_key())
                .column(ColumnDef::new("ID", LogicalType::Int32))
                .build()
        ),
        ValidationRule::UniqueColumnNames
    );
    assert_eq!(
        rule_of(
            CreateTable::builder(users())
                .column(ColumnDef::new("id", LogicalType::Int32))
                .build()
        ),
        ValidationRule::SinglePrimaryKey
    );
    assert_eq!(
        rule_of(
            CreateTable::builder(users())
                .column(ColumnDef::new("id", LogicalType::Int32).primary_key())
                .primary_key(["id"])
                .build()
        ),
        ValidationRule::SinglePrimaryKey
    );
    assert_eq!(
        rule_of(
            CreateTable::builder(users())
                .column(ColumnDef::new("id", LogicalType::Int32))
                .primary_key(["missing"])
                .build()
        ),
        ValidationRule::PrimaryKeyColumns
    );
    assert_eq!(
        rule_of(
            CreateTable::builder(users())
                .column(ColumnDef::new("id", LogicalType::Int32).nullable())
                .primary_key(["id"])
                .build()
        ),
        ValidationRule::PrimaryKeyColumns
    );
    assert_eq!(
        rule_of(
            CreateTable::builder(users())
                .column(ColumnDef::new("id", LogicalType::string(10)).primary_key().identity())
                .build()
        ),
        ValidationRule::IdentityType
    );
    assert_eq!(
        rule_of(
            CreateTable::builder(users())
                .column(ColumnDef::new("id", LogicalType::Int32).primary_key())
                .column(ColumnDef::new("price", LogicalType::decimal(40, 2)))
                .build()
        ),
        ValidationRule::DecimalPrecision
    );
    assert_eq!(
        rule_of(
            CreateTable::builder(users())
                .column(ColumnDef::new("id", LogicalType::Int32).primary_key())
                .column(ColumnDef::new("name", LogicalType::string(0)))
                .build()
        ),
        ValidationRule::PositiveLength
    );
}

#[test]
fn test_alter_column_requires_a_change() {
    assert_eq!(
        rule_of(AlterColumn::builder(users(), "email").build()),
        ValidationRule::AlterColumnChange
    );
    let expr = AlterColumn::builder(users(), "email")
        .set_type(LogicalType::string(500))
        .set_nullable(true)
        .drop_default()
        .build()
        .unwrap();
    let SchemaExpression::AlterColumn(alter) = expr else {
        panic!("expected AlterColumn");
    };
    assert_eq!(alter.new_type, Some(LogicalType::string(500)));
    assert_eq!(alter.nullable, Some(true));
    assert_eq!(alter.default, Some(DefaultChange::Drop));
}

#[test]
fn test_index_rules() {
    assert_eq!(
        rule_of(CreateIndex::builder(users(), "ix_users_email").build()),
        ValidationRule::IndexHasColumns
    );
    assert_eq!(
        rule_of(CreateIndex::builder(users(), "").column("email").build()),
        ValidationRule::NonEmptyName
    );
    let expr = CreateIndex::builder(users(), "ix_users_email")
        .column("email")
        .descending("created_at")
        .unique()
        .build()
        .unwrap();
    assert_eq!(expr.describe(), "create index ix_users_email on users");
}

#[test]
fn test_foreign_key_rules() {
    let orders = TableRef::new("orders");
    assert_eq!(
        rule_of(
            CreateForeignKey::builder("fk_orders_users", orders.clone(), users())
                .columns(["user_id", "tenant_id"])
                .referenced_columns(["id"])
                .build()
        ),
        ValidationRule::ForeignKeyColumns
    );
    assert_eq!(
        rule_of(
            CreateForeignKey::builder("fk_orders_users", orders.clone(), users())
                .referenced_columns(["id"])
                .build()
        ),
        ValidationRule::ForeignKeyColumns
    );
    let expr = CreateForeignKey::builder("fk_orders_users", orders, users())
        .columns(["user_id"])
        .referenced_columns(["id"])
        .on_delete(ForeignKeyRule::Cascade)
        .build()
        .unwrap();
    assert_eq!(expr.kind(), ExpressionKind::CreateForeignKey);
}

#[test]
fn test_simple_constructor_rules() {
    assert_eq!(
        rule_of(SchemaExpression::delete_columns(users(), Vec::<String>::new())),
        ValidationRule::DeleteColumnList
    );
    assert_eq!(
        rule_of(SchemaExpression::raw_sql("   \n")),
        ValidationRule::RawSqlNotEmpty
    );
    assert_eq!(
        rule_of(SchemaExpression::create_schema(" ")),
        ValidationRule::NonEmptyName
    );
    assert_eq!(
        rule_of(SchemaExpression::rename_column(users(), "email", "")),
        ValidationRule::NonEmptyName
    );
    assert_eq!(
        rule_of(SchemaExpression::delete_data(
            users(),
            Vec::<(String, Literal)>::new()
        )),
        ValidationRule::DeleteDataFilter
    );
    assert!(SchemaExpression::delete_data(users(), [("id", 7i64)]).is_ok());
}

#[test]
fn test_insert_rows_share_columns() {
    assert_eq!(
        rule_of(InsertData::builder(users()).build()),
        ValidationRule::InsertRows
    );
    assert_eq!(
        rule_of(
            InsertData::builder(users())
                .row([("id", Literal::Integer(1)), ("name", Literal::text("a"))])
                .row([("id", Literal::Integer(2))])
                .build()
        ),
        ValidationRule::InsertRows
    );
    let expr = InsertData::builder(users())
        .row([("id", Literal::Integer(1)), ("name", Literal::text("a"))])
        .row([("name", Literal::text("b")), ("id", Literal::Integer(2))])
        .build()
        .unwrap();
    assert_eq!(expr.describe(), "insert data users (2 rows)");
}

#[test]
fn test_expression_kind_all_matches_variants() {
    assert_eq!(ExpressionKind::ALL.len(), 16);
    let names: HashSet<&str> = ExpressionKind::ALL.iter().map(|k| k.name()).collect();
    assert_eq!(names.len(), ExpressionKind::ALL.len());
}
