//! Schema expressions: one immutable value per requested schema or data change.
//!
//! Every payload is built through a validating constructor or builder, so a
//! [`SchemaExpression`] in hand has already passed its structural rules.
//! Payload fields are public for reading; `#[non_exhaustive]` keeps other
//! crates from assembling unchecked payloads.

use crate::column::{ColumnDef, Literal};
use crate::error::{CoreError, CoreResult, ValidationRule};
use crate::types::LogicalType;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Optionally schema-qualified table reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableRef {
    pub schema: Option<String>,
    pub name: String,
}

impl TableRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            name: name.into(),
        }
    }

    pub fn in_schema(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: Some(schema.into()),
            name: name.into(),
        }
    }

    fn validate(&self) -> CoreResult<()> {
        require_name(&self.name, "table", "table name")?;
        if let Some(schema) = &self.schema {
            require_name(schema, &self.name, "schema name")?;
        }
        Ok(())
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.schema {
            Some(schema) => write!(f, "{schema}.{}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// Discriminant of [`SchemaExpression`], used for capability tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpressionKind {
    CreateSchema,
    DeleteSchema,
    CreateTable,
    DeleteTable,
    RenameTable,
    CreateColumn,
    AlterColumn,
    RenameColumn,
    DeleteColumn,
    CreateIndex,
    DeleteIndex,
    CreateForeignKey,
    DeleteForeignKey,
    InsertData,
    DeleteData,
    RawSql,
}

impl ExpressionKind {
    pub const ALL: [ExpressionKind; 16] = [
        ExpressionKind::CreateSchema,
        ExpressionKind::DeleteSchema,
        ExpressionKind::CreateTable,
        ExpressionKind::DeleteTable,
        ExpressionKind::RenameTable,
        ExpressionKind::CreateColumn,
        ExpressionKind::AlterColumn,
        ExpressionKind::RenameColumn,
        ExpressionKind::DeleteColumn,
        ExpressionKind::CreateIndex,
        ExpressionKind::DeleteIndex,
        ExpressionKind::CreateForeignKey,
        ExpressionKind::DeleteForeignKey,
        ExpressionKind::InsertData,
        ExpressionKind::DeleteData,
        ExpressionKind::RawSql,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ExpressionKind::CreateSchema => "create schema",
            ExpressionKind::DeleteSchema => "delete schema",
            ExpressionKind::CreateTable => "create table",
            ExpressionKind::DeleteTable => "delete table",
            ExpressionKind::RenameTable => "rename table",
            ExpressionKind::CreateColumn => "create column",
            ExpressionKind::AlterColumn => "alter column",
            ExpressionKind::RenameColumn => "rename column",
            ExpressionKind::DeleteColumn => "delete column",
            ExpressionKind::CreateIndex => "create index",
            ExpressionKind::DeleteIndex => "delete index",
            ExpressionKind::CreateForeignKey => "create foreign key",
            ExpressionKind::DeleteForeignKey => "delete foreign key",
            ExpressionKind::InsertData => "insert data",
            ExpressionKind::DeleteData => "delete data",
            ExpressionKind::RawSql => "raw sql",
        }
    }
}

impl fmt::Display for ExpressionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Referential action on a foreign key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForeignKeyRule {
    #[default]
    NoAction,
    Cascade,
    SetNull,
    SetDefault,
    Restrict,
}

impl ForeignKeyRule {
    pub fn sql(&self) -> &'static str {
        match self {
            ForeignKeyRule::NoAction => "NO ACTION",
            ForeignKeyRule::Cascade => "CASCADE",
            ForeignKeyRule::SetNull => "SET NULL",
            ForeignKeyRule::SetDefault => "SET DEFAULT",
            ForeignKeyRule::Restrict => "RESTRICT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexColumn {
    pub name: String,
    pub direction: SortDirection,
}

/// Default-value change requested by an alter-column expression.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultChange {
    Set(Literal),
    Drop,
}

/// One row of column/value pairs.
pub type Row = Vec<(String, Literal)>;

#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct SchemaDef {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct PrimaryKey {
    pub name: Option<String>,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct CreateTable {
    pub table: TableRef,
    pub columns: Vec<ColumnDef>,
    /// Table-level key; mutually exclusive with column-level flags.
    pub primary_key: Option<PrimaryKey>,
}

#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct DeleteTable {
    pub table: TableRef,
}

#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct RenameTable {
    pub table: TableRef,
    pub new_name: String,
}

#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct CreateColumn {
    pub table: TableRef,
    pub column: ColumnDef,
}

#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct AlterColumn {
    pub table: TableRef,
    pub column: String,
    pub new_type: Option<LogicalType>,
    pub nullable: Option<bool>,
    pub default: Option<DefaultChange>,
}

#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct RenameColumn {
    pub table: TableRef,
    pub column: String,
    pub new_name: String,
}

#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct DeleteColumn {
    pub table: TableRef,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct CreateIndex {
    pub table: TableRef,
    pub name: String,
    pub columns: Vec<IndexColumn>,
    pub unique: bool,
}

#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct DeleteIndex {
    pub table: TableRef,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct CreateForeignKey {
    pub name: String,
    pub table: TableRef,
    pub columns: Vec<String>,
    pub referenced_table: TableRef,
    pub referenced_columns: Vec<String>,
    pub on_delete: ForeignKeyRule,
    pub on_update: ForeignKeyRule,
}

#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct DeleteForeignKey {
    pub table: TableRef,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct InsertData {
    pub table: TableRef,
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct DeleteData {
    pub table: TableRef,
    /// Conjunction of `column = value` tests; `Null` matches `IS NULL`.
    pub filter: Row,
}

#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct RawSql {
    pub sql: String,
}

/// A single requested schema or data change.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaExpression {
    CreateSchema(SchemaDef),
    DeleteSchema(SchemaDef),
    CreateTable(CreateTable),
    DeleteTable(DeleteTable),
    RenameTable(RenameTable),
    CreateColumn(CreateColumn),
    AlterColumn(AlterColumn),
    RenameColumn(RenameColumn),
    DeleteColumn(DeleteColumn),
    CreateIndex(CreateIndex),
    DeleteIndex(DeleteIndex),
    CreateForeignKey(CreateForeignKey),
    DeleteForeignKey(DeleteForeignKey),
    InsertData(InsertData),
    DeleteData(DeleteData),
    RawSql(RawSql),
}

fn require_name(value: &str, object: impl fmt::Display, what: &str) -> CoreResult<()> {
    if value.trim().is_empty() {
        return Err(CoreError::validation(
            ValidationRule::NonEmptyName,
            object.to_string(),
            format!("{what} must not be empty"),
        ));
    }
    Ok(())
}

/// Names must be non-empty and unique (case-insensitively) within one list.
fn require_unique<'a>(
    names: impl IntoIterator<Item = &'a str>,
    object: &str,
    what: &str,
) -> CoreResult<()> {
    let mut seen = HashSet::new();
    for name in names {
        require_name(name, object, what)?;
        if !seen.insert(name.to_ascii_lowercase()) {
            return Err(CoreError::validation(
                ValidationRule::UniqueColumnNames,
                object,
                format!("{what} '{name}' appears more than once"),
            ));
        }
    }
    Ok(())
}

impl SchemaDef {
    fn validate(&self) -> CoreResult<()> {
        require_name(&self.name, "schema", "schema name")
    }
}

impl CreateTable {
    pub fn builder(table: TableRef) -> CreateTableBuilder {
        CreateTableBuilder {
            table,
            columns: Vec::new(),
            primary_key: None,
        }
    }

    /// Primary-key column names, whichever way the key was declared.
    pub fn primary_key_columns(&self) -> Vec<&str> {
        match &self.primary_key {
            Some(pk) => pk.columns.iter().map(String::as_str).collect(),
            None => self
                .columns
                .iter()
                .filter(|c| c.primary_key)
                .map(|c| c.name.as_str())
                .collect(),
        }
    }

    /// Constraint name for the key, `PK_<table>` unless one was given.
    pub fn primary_key_name(&self) -> String {
        self.primary_key
            .as_ref()
            .and_then(|pk| pk.name.clone())
            .unwrap_or_else(|| format!("PK_{}", self.table.name))
    }

    fn validate(&self) -> CoreResult<()> {
        self.table.validate()?;
        let object = self.table.to_string();
        if self.columns.is_empty() {
            return Err(CoreError::validation(
                ValidationRule::TableHasColumns,
                object,
                "a table needs at least one column",
            ));
        }
        for column in &self.columns {
            column.validate(&object)?;
        }
        require_unique(self.columns.iter().map(|c| c.name.as_str()), &object, "column")?;

        let flagged = self.columns.iter().filter(|c| c.primary_key).count();
        match (&self.primary_key, flagged) {
            (None, 0) => {
                return Err(CoreError::validation(
                    ValidationRule::SinglePrimaryKey,
                    object,
                    "no primary key declared",
                ))
            }
            (Some(_), n) if n > 0 => {
                return Err(CoreError::validation(
                    ValidationRule::SinglePrimaryKey,
                    object,
                    "primary key declared both on columns and on the table",
                ))
            }
            _ => {}
        }

        if let Some(pk) = &self.primary_key {
            if let Some(name) = &pk.name {
                require_name(name, &object, "primary key name")?;
            }
            if pk.columns.is_empty() {
                return Err(CoreError::validation(
                    ValidationRule::PrimaryKeyColumns,
                    object,
                    "primary key lists no columns",
                ));
            }
            require_unique(pk.columns.iter().map(String::as_str), &object, "key column")?;
            for key_column in &pk.columns {
                let column = self
                    .columns
                    .iter()
                    .find(|c| c.name.eq_ignore_ascii_case(key_column))
                    .ok_or_else(|| {
                        CoreError::validation(
                            ValidationRule::PrimaryKeyColumns,
                            object.clone(),
                            format!("key column '{key_column}' is not in the table"),
                        )
                    })?;
                if column.nullable {
                    return Err(CoreError::validation(
                        ValidationRule::PrimaryKeyColumns,
                        object,
                        format!("key column '{key_column}' is nullable"),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Builder for [`CreateTable`]; `build` validates.
#[derive(Debug, Clone)]
pub struct CreateTableBuilder {
    table: TableRef,
    columns: Vec<ColumnDef>,
    primary_key: Option<PrimaryKey>,
}

impl CreateTableBuilder {
    pub fn column(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }

    pub fn primary_key<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.primary_key = Some(PrimaryKey {
            name: None,
            columns: columns.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn primary_key_named<I, S>(mut self, name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.primary_key = Some(PrimaryKey {
            name: Some(name.into()),
            columns: columns.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn build(self) -> CoreResult<SchemaExpression> {
        let create = CreateTable {
            table: self.table,
            columns: self.columns,
            primary_key: self.primary_key,
        };
        create.validate()?;
        Ok(SchemaExpression::CreateTable(create))
    }
}

impl DeleteTable {
    fn validate(&self) -> CoreResult<()> {
        self.table.validate()
    }
}

impl RenameTable {
    fn validate(&self) -> CoreResult<()> {
        self.table.validate()?;
        require_name(&self.new_name, &self.table, "new table name")
    }
}

impl CreateColumn {
    fn validate(&self) -> CoreResult<()> {
        self.table.validate()?;
        self.column.validate(&self.table.to_string())
    }
}

impl AlterColumn {
    pub fn builder(table: TableRef, column: impl Into<String>) -> AlterColumnBuilder {
        AlterColumnBuilder {
            inner: AlterColumn {
                table,
                column: column.into(),
                new_type: None,
                nullable: None,
                default: None,
            },
        }
    }

    fn validate(&self) -> CoreResult<()> {
        self.table.validate()?;
        require_name(&self.column, &self.table, "column name")?;
        let object = format!("{}.{}", self.table, self.column);
        if self.new_type.is_none() && self.nullable.is_none() && self.default.is_none() {
            return Err(CoreError::validation(
                ValidationRule::AlterColumnChange,
                object,
                "nothing to change",
            ));
        }
        if let Some(ty) = &self.new_type {
            ty.validate(&object)?;
        }
        if let Some(DefaultChange::Set(value)) = &self.default {
            value.validate(&object)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct AlterColumnBuilder {
    inner: AlterColumn,
}

impl AlterColumnBuilder {
    pub fn set_type(mut self, ty: LogicalType) -> Self {
        self.inner.new_type = Some(ty);
        self
    }

    pub fn set_nullable(mut self, nullable: bool) -> Self {
        self.inner.nullable = Some(nullable);
        self
    }

    pub fn set_default(mut self, value: impl Into<Literal>) -> Self {
        self.inner.default = Some(DefaultChange::Set(value.into()));
        self
    }

    pub fn drop_default(mut self) -> Self {
        self.inner.default = Some(DefaultChange::Drop);
        self
    }

    pub fn build(self) -> CoreResult<SchemaExpression> {
        self.inner.validate()?;
        Ok(SchemaExpression::AlterColumn(self.inner))
    }
}

impl RenameColumn {
    fn validate(&self) -> CoreResult<()> {
        self.table.validate()?;
        require_name(&self.column, &self.table, "column name")?;
        require_name(&self.new_name, &self.table, "new column name")
    }
}

impl DeleteColumn {
    fn validate(&self) -> CoreResult<()> {
        self.table.validate()?;
        let object = self.table.to_string();
        if self.columns.is_empty() {
            return Err(CoreError::validation(
                ValidationRule::DeleteColumnList,
                object,
                "no columns to delete",
            ));
        }
        require_unique(self.columns.iter().map(String::as_str), &object, "column")
    }
}

impl CreateIndex {
    pub fn builder(table: TableRef, name: impl Into<String>) -> CreateIndexBuilder {
        CreateIndexBuilder {
            inner: CreateIndex {
                table,
                name: name.into(),
                columns: Vec::new(),
                unique: false,
            },
        }
    }

    fn validate(&self) -> CoreResult<()> {
        self.table.validate()?;
        require_name(&self.name, &self.table, "index name")?;
        if self.columns.is_empty() {
            return Err(CoreError::validation(
                ValidationRule::IndexHasColumns,
                &self.name,
                "an index needs at least one column",
            ));
        }
        require_unique(self.columns.iter().map(|c| c.name.as_str()), &self.name, "column")
    }
}

#[derive(Debug, Clone)]
pub struct CreateIndexBuilder {
    inner: CreateIndex,
}

impl CreateIndexBuilder {
    pub fn column(self, name: impl Into<String>) -> Self {
        self.column_sorted(name, SortDirection::Ascending)
    }

    pub fn descending(self, name: impl Into<String>) -> Self {
        self.column_sorted(name, SortDirection::Descending)
    }

    pub fn column_sorted(mut self, name: impl Into<String>, direction: SortDirection) -> Self {
        self.inner.columns.push(IndexColumn {
            name: name.into(),
            direction,
        });
        self
    }

    pub fn unique(mut self) -> Self {
        self.inner.unique = true;
        self
    }

    pub fn build(self) -> CoreResult<SchemaExpression> {
        self.inner.validate()?;
        Ok(SchemaExpression::CreateIndex(self.inner))
    }
}

impl DeleteIndex {
    fn validate(&self) -> CoreResult<()> {
        self.table.validate()?;
        require_name(&self.name, &self.table, "index name")
    }
}

impl CreateForeignKey {
    pub fn builder(
        name: impl Into<String>,
        table: TableRef,
        referenced_table: TableRef,
    ) -> CreateForeignKeyBuilder {
        CreateForeignKeyBuilder {
            inner: CreateForeignKey {
                name: name.into(),
                table,
                columns: Vec::new(),
                referenced_table,
                referenced_columns: Vec::new(),
                on_delete: ForeignKeyRule::NoAction,
                on_update: ForeignKeyRule::NoAction,
            },
        }
    }

    fn validate(&self) -> CoreResult<()> {
        self.table.validate()?;
        self.referenced_table.validate()?;
        require_name(&self.name, &self.table, "foreign key name")?;
        if self.columns.is_empty() || self.referenced_columns.is_empty() {
            return Err(CoreError::validation(
                ValidationRule::ForeignKeyColumns,
                &self.name,
                "foreign key needs columns on both sides",
            ));
        }
        if self.columns.len() != self.referenced_columns.len() {
            return Err(CoreError::validation(
                ValidationRule::ForeignKeyColumns,
                &self.name,
                format!(
                    "{} column(s) reference {} column(s)",
                    self.columns.len(),
                    self.referenced_columns.len()
                ),
            ));
        }
        require_unique(self.columns.iter().map(String::as_str), &self.name, "column")?;
        require_unique(
            self.referenced_columns.iter().map(String::as_str),
            &self.name,
            "referenced column",
        )
    }
}

#[derive(Debug, Clone)]
pub struct CreateForeignKeyBuilder {
    inner: CreateForeignKey,
}

impl CreateForeignKeyBuilder {
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn referenced_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner.referenced_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn on_delete(mut self, rule: ForeignKeyRule) -> Self {
        self.inner.on_delete = rule;
        self
    }

    pub fn on_update(mut self, rule: ForeignKeyRule) -> Self {
        self.inner.on_update = rule;
        self
    }

    pub fn build(self) -> CoreResult<SchemaExpression> {
        self.inner.validate()?;
        Ok(SchemaExpression::CreateForeignKey(self.inner))
    }
}

impl DeleteForeignKey {
    fn validate(&self) -> CoreResult<()> {
        self.table.validate()?;
        require_name(&self.name, &self.table, "foreign key name")
    }
}

impl InsertData {
    pub fn builder(table: TableRef) -> InsertDataBuilder {
        InsertDataBuilder {
            inner: InsertData {
                table,
                rows: Vec::new(),
            },
        }
    }

    fn validate(&self) -> CoreResult<()> {
        self.table.validate()?;
        let object = self.table.to_string();
        let first = self.rows.first().ok_or_else(|| {
            CoreError::validation(ValidationRule::InsertRows, object.clone(), "no rows to insert")
        })?;
        let column_set = |row: &Row| -> HashSet<String> {
            row.iter().map(|(c, _)| c.to_ascii_lowercase()).collect()
        };
        let expected = column_set(first);
        for (idx, row) in self.rows.iter().enumerate() {
            if row.is_empty() {
                return Err(CoreError::validation(
                    ValidationRule::InsertRows,
                    object,
                    format!("row {idx} has no values"),
                ));
            }
            require_unique(row.iter().map(|(c, _)| c.as_str()), &object, "column")?;
            if column_set(row) != expected {
                return Err(CoreError::validation(
                    ValidationRule::InsertRows,
                    object,
                    format!("row {idx} does not share the column set of row 0"),
                ));
            }
            for (column, value) in row {
                value.validate(&format!("{object}.{column}"))?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct InsertDataBuilder {
    inner: InsertData,
}

impl InsertDataBuilder {
    pub fn row<I, S, L>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = (S, L)>,
        S: Into<String>,
        L: Into<Literal>,
    {
        self.inner
            .rows
            .push(values.into_iter().map(|(c, v)| (c.into(), v.into())).collect());
        self
    }

    pub fn build(self) -> CoreResult<SchemaExpression> {
        self.inner.validate()?;
        Ok(SchemaExpression::InsertData(self.inner))
    }
}

impl DeleteData {
    fn validate(&self) -> CoreResult<()> {
        self.table.validate()?;
        let object = self.table.to_string();
        if self.filter.is_empty() {
            return Err(CoreError::validation(
                ValidationRule::DeleteDataFilter,
                object,
                "delete needs at least one equality filter",
            ));
        }
        require_unique(self.filter.iter().map(|(c, _)| c.as_str()), &object, "column")?;
        for (column, value) in &self.filter {
            value.validate(&format!("{object}.{column}"))?;
        }
        Ok(())
    }
}

impl RawSql {
    fn validate(&self) -> CoreResult<()> {
        if self.sql.trim().is_empty() {
            return Err(CoreError::validation(
                ValidationRule::RawSqlNotEmpty,
                "raw sql",
                "statement text is blank",
            ));
        }
        Ok(())
    }
}

impl SchemaExpression {
    pub fn create_schema(name: impl Into<String>) -> CoreResult<Self> {
        Self::checked(SchemaExpression::CreateSchema(SchemaDef { name: name.into() }))
    }

    pub fn delete_schema(name: impl Into<String>) -> CoreResult<Self> {
        Self::checked(SchemaExpression::DeleteSchema(SchemaDef { name: name.into() }))
    }

    pub fn delete_table(table: TableRef) -> CoreResult<Self> {
        Self::checked(SchemaExpression::DeleteTable(DeleteTable { table }))
    }

    pub fn rename_table(table: TableRef, new_name: impl Into<String>) -> CoreResult<Self> {
        Self::checked(SchemaExpression::RenameTable(RenameTable {
            table,
            new_name: new_name.into(),
        }))
    }

    pub fn create_column(table: TableRef, column: ColumnDef) -> CoreResult<Self> {
        Self::checked(SchemaExpression::CreateColumn(CreateColumn { table, column }))
    }

    pub fn rename_column(
        table: TableRef,
        column: impl Into<String>,
        new_name: impl Into<String>,
    ) -> CoreResult<Self> {
        Self::checked(SchemaExpression::RenameColumn(RenameColumn {
            table,
            column: column.into(),
            new_name: new_name.into(),
        }))
    }

    pub fn delete_columns<I, S>(table: TableRef, columns: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::checked(SchemaExpression::DeleteColumn(DeleteColumn {
            table,
            columns: columns.into_iter().map(Into::into).collect(),
        }))
    }

    pub fn delete_index(table: TableRef, name: impl Into<String>) -> CoreResult<Self> {
        Self::checked(SchemaExpression::DeleteIndex(DeleteIndex {
            table,
            name: name.into(),
        }))
    }

    pub fn delete_foreign_key(table: TableRef, name: impl Into<String>) -> CoreResult<Self> {
        Self::checked(SchemaExpression::DeleteForeignKey(DeleteForeignKey {
            table,
            name: name.into(),
        }))
    }

    pub fn delete_data<I, S, L>(table: TableRef, filter: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = (S, L)>,
        S: Into<String>,
        L: Into<Literal>,
    {
        Self::checked(SchemaExpression::DeleteData(DeleteData {
            table,
            filter: filter.into_iter().map(|(c, v)| (c.into(), v.into())).collect(),
        }))
    }

    pub fn raw_sql(sql: impl Into<String>) -> CoreResult<Self> {
        Self::checked(SchemaExpression::RawSql(RawSql { sql: sql.into() }))
    }

    fn checked(expr: SchemaExpression) -> CoreResult<Self> {
        expr.validate()?;
        Ok(expr)
    }

    pub fn kind(&self) -> ExpressionKind {
        match self {
            SchemaExpression::CreateSchema(_) => ExpressionKind::CreateSchema,
            SchemaExpression::DeleteSchema(_) => ExpressionKind::DeleteSchema,
            SchemaExpression::CreateTable(_) => ExpressionKind::CreateTable,
            SchemaExpression::DeleteTable(_) => ExpressionKind::DeleteTable,
            SchemaExpression::RenameTable(_) => ExpressionKind::RenameTable,
            SchemaExpression::CreateColumn(_) => ExpressionKind::CreateColumn,
            SchemaExpression::AlterColumn(_) => ExpressionKind::AlterColumn,
            SchemaExpression::RenameColumn(_) => ExpressionKind::RenameColumn,
            SchemaExpression::DeleteColumn(_) => ExpressionKind::DeleteColumn,
            SchemaExpression::CreateIndex(_) => ExpressionKind::CreateIndex,
            SchemaExpression::DeleteIndex(_) => ExpressionKind::DeleteIndex,
            SchemaExpression::CreateForeignKey(_) => ExpressionKind::CreateForeignKey,
            SchemaExpression::DeleteForeignKey(_) => ExpressionKind::DeleteForeignKey,
            SchemaExpression::InsertData(_) => ExpressionKind::InsertData,
            SchemaExpression::DeleteData(_) => ExpressionKind::DeleteData,
            SchemaExpression::RawSql(_) => ExpressionKind::RawSql,
        }
    }

    /// Re-check every structural rule for this expression.
    pub fn validate(&self) -> CoreResult<()> {
        match self {
            SchemaExpression::CreateSchema(e) | SchemaExpression::DeleteSchema(e) => e.validate(),
            SchemaExpression::CreateTable(e) => e.validate(),
            SchemaExpression::DeleteTable(e) => e.validate(),
            SchemaExpression::RenameTable(e) => e.validate(),
            SchemaExpression::CreateColumn(e) => e.validate(),
            SchemaExpression::AlterColumn(e) => e.validate(),
            SchemaExpression::RenameColumn(e) => e.validate(),
            SchemaExpression::DeleteColumn(e) => e.validate(),
            SchemaExpression::CreateIndex(e) => e.validate(),
            SchemaExpression::DeleteIndex(e) => e.validate(),
            SchemaExpression::CreateForeignKey(e) => e.validate(),
            SchemaExpression::DeleteForeignKey(e) => e.validate(),
            SchemaExpression::InsertData(e) => e.validate(),
            SchemaExpression::DeleteData(e) => e.validate(),
            SchemaExpression::RawSql(e) => e.validate(),
        }
    }

    /// Short human description, e.g. `create table shop.orders`.
    pub fn describe(&self) -> String {
        let target = match self {
            SchemaExpression::CreateSchema(e) | SchemaExpression::DeleteSchema(e) => e.name.clone(),
            SchemaExpression::CreateTable(e) => e.table.to_string(),
            SchemaExpression::DeleteTable(e) => e.table.to_string(),
            SchemaExpression::RenameTable(e) => format!("{} to {}", e.table, e.new_name),
            SchemaExpression::CreateColumn(e) => format!("{}.{}", e.table, e.column.name),
            SchemaExpression::AlterColumn(e) => format!("{}.{}", e.table, e.column),
            SchemaExpression::RenameColumn(e) => {
                format!("{}.{} to {}", e.table, e.column, e.new_name)
            }
            SchemaExpression::DeleteColumn(e) => format!("{}.{}", e.table, e.columns.join(",")),
            SchemaExpression::CreateIndex(e) => format!("{} on {}", e.name, e.table),
            SchemaExpression::DeleteIndex(e) => format!("{} on {}", e.name, e.table),
            SchemaExpression::CreateForeignKey(e) => format!("{} on {}", e.name, e.table),
            SchemaExpression::DeleteForeignKey(e) => format!("{} on {}", e.name, e.table),
            SchemaExpression::InsertData(e) => format!("{} ({} rows)", e.table, e.rows.len()),
            SchemaExpression::DeleteData(e) => e.table.to_string(),
            SchemaExpression::RawSql(e) => {
                let first_line = e.sql.trim().lines().next().unwrap_or_default();
                first_line.chars().take(40).collect()
            }
        };
        format!("{} {}", self.kind(), target)
    }
}

#[cfg(test)]
#[path = "expression_test.rs"]
mod tests;
