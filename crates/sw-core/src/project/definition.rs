//! On-disk shape of migration files and their conversion into units.

use crate::column::{ColumnDef, Literal};
use crate::error::{CoreError, CoreResult};
use crate::expression::{
    AlterColumn, CreateForeignKey, CreateIndex, CreateTable, ForeignKeyRule, InsertData, Row,
    SchemaExpression, SortDirection, TableRef,
};
use crate::migration::{
    MaintenanceStage, MaintenanceUnit, MigrationUnit, Tag, TransactionBehavior,
};
use crate::types::LogicalType;
use chrono::{DateTime, Utc};
use minijinja::Environment;
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use std::collections::HashMap;
use std::path::Path;

/// A migration or maintenance file.
///
/// Expression lists use the single-key map form (`- create_table: {...}`).
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct MigrationFile {
    #[serde(default)]
    pub version: Option<i64>,

    /// Present only on maintenance files
    #[serde(default)]
    pub stage: Option<MaintenanceStage>,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub tags: Vec<Tag>,

    #[serde(default)]
    pub transaction: TransactionBehavior,

    #[serde(default)]
    pub up: Vec<ExpressionDef>,

    #[serde(default)]
    pub down: Option<Vec<ExpressionDef>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub(crate) enum ExpressionDef {
    CreateSchema {
        name: String,
    },
    DeleteSchema {
        name: String,
    },
    CreateTable {
        #[serde(default)]
        schema: Option<String>,
        name: String,
        columns: Vec<ColumnFile>,
        #[serde(default)]
        primary_key: Option<PrimaryKeyFile>,
    },
    DeleteTable {
        #[serde(default)]
        schema: Option<String>,
        name: String,
    },
    RenameTable {
        #[serde(default)]
        schema: Option<String>,
        name: String,
        to: String,
    },
    CreateColumn {
        #[serde(default)]
        schema: Option<String>,
        table: String,
        column: ColumnFile,
    },
    AlterColumn {
        #[serde(default)]
        schema: Option<String>,
        table: String,
        column: String,
        #[serde(default, rename = "type")]
        ty: Option<LogicalType>,
        #[serde(default)]
        nullable: Option<bool>,
        #[serde(default)]
        default: Option<Value>,
        #[serde(default)]
        drop_default: bool,
    },
    RenameColumn {
        #[serde(default)]
        schema: Option<String>,
        table: String,
        column: String,
        to: String,
    },
    DeleteColumn {
        #[serde(default)]
        schema: Option<String>,
        table: String,
        columns: Vec<String>,
    },
    CreateIndex {
        #[serde(default)]
        schema: Option<String>,
        table: String,
        name: String,
        columns: Vec<IndexColumnFile>,
        #[serde(default)]
        unique: bool,
    },
    DeleteIndex {
        #[serde(default)]
        schema: Option<String>,
        table: String,
        name: String,
    },
    CreateForeignKey {
        name: String,
        #[serde(default)]
        schema: Option<String>,
        table: String,
        columns: Vec<String>,
        references: ReferenceFile,
        #[serde(default)]
        on_delete: ForeignKeyRule,
        #[serde(default)]
        on_update: ForeignKeyRule,
    },
    DeleteForeignKey {
        #[serde(default)]
        schema: Option<String>,
        table: String,
        name: String,
    },
    InsertData {
        #[serde(default)]
        schema: Option<String>,
        table: String,
        rows: Vec<Mapping>,
    },
    DeleteData {
        #[serde(default)]
        schema: Option<String>,
        table: String,
        filter: Mapping,
    },
    Sql(String),
    SqlFile(String),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ColumnFile {
    name: String,
    #[serde(rename = "type")]
    ty: LogicalType,
    #[serde(default)]
    nullable: bool,
    #[serde(default)]
    default: Option<Value>,
    #[serde(default)]
    primary_key: bool,
    #[serde(default)]
    unique: bool,
    #[serde(default)]
    identity: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct PrimaryKeyFile {
    #[serde(default)]
    name: Option<String>,
    columns: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum IndexColumnFile {
    Name(String),
    Sorted {
        name: String,
        #[serde(default)]
        direction: SortDirection,
    },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ReferenceFile {
    #[serde(default)]
    schema: Option<String>,
    table: String,
    columns: Vec<String>,
}

/// A loaded file is either a versioned unit or a maintenance unit.
#[derive(Debug)]
pub(crate) enum LoadedFile {
    Unit(MigrationUnit),
    Maintenance(MaintenanceUnit),
}

/// What `sql_file` entries need: the directory they are relative to and the
/// template environment with project variables.
pub(crate) struct ScriptContext<'a> {
    pub dir: &'a Path,
    pub env: &'a Environment<'static>,
    pub vars: &'a HashMap<String, Value>,
}

impl ScriptContext<'_> {
    fn render_sql_file(&self, relative: &str) -> CoreResult<String> {
        let path = self.dir.join(relative);
        let source = std::fs::read_to_string(&path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        self.env
            .render_str(&source, self.vars)
            .map_err(|e| CoreError::ScriptRender {
                path: path.display().to_string(),
                message: e.to_string(),
            })
    }
}

fn definition_error(message: impl Into<String>) -> CoreError {
    CoreError::MigrationDefinition {
        message: message.into(),
    }
}

fn table_ref(schema: Option<String>, name: String) -> TableRef {
    TableRef { schema, name }
}

/// Map a YAML scalar (or a single-key tagged map) to a literal.
///
/// Tagged maps: `{raw: "..."}`, `{decimal: "12.50"}`,
/// `{datetime: "2024-01-01T00:00:00Z"}`, `{function: current_utc_datetime | new_guid}`.
fn literal_from_yaml(value: &Value, object: &str) -> CoreResult<Literal> {
    match value {
        Value::Null => Ok(Literal::Null),
        Value::Bool(b) => Ok(Literal::Bool(*b)),
        Value::Number(n) => Ok(match n.as_i64() {
            Some(i) => Literal::Integer(i),
            None => Literal::Decimal(n.to_string()),
        }),
        Value::String(s) => Ok(Literal::Text(s.clone())),
        Value::Mapping(map) if map.len() == 1 => {
            let Some((key, inner)) = map.iter().next() else {
                return Err(definition_error(format!("{object}: empty literal map")));
            };
            let text = inner.as_str();
            match (key.as_str(), text) {
                (Some("raw"), Some(sql)) => Ok(Literal::Raw(sql.to_string())),
                (Some("decimal"), Some(d)) => Ok(Literal::Decimal(d.to_string())),
                (Some("datetime"), Some(ts)) => DateTime::parse_from_rfc3339(ts)
                    .map(|dt| Literal::DateTime(dt.with_timezone(&Utc)))
                    .map_err(|e| definition_error(format!("{object}: bad datetime '{ts}': {e}"))),
                (Some("function"), Some("current_utc_datetime")) => {
                    Ok(Literal::CurrentUtcDateTime)
                }
                (Some("function"), Some("new_guid")) => Ok(Literal::NewGuid),
                _ => Err(definition_error(format!(
                    "{object}: unrecognised literal {}",
                    serde_yaml::to_string(value).unwrap_or_default().trim()
                ))),
            }
        }
        _ => Err(definition_error(format!(
            "{object}: unsupported literal value"
        ))),
    }
}

fn row_from_mapping(map: &Mapping, object: &str) -> CoreResult<Row> {
    map.iter()
        .map(|(key, value)| {
            let column = key.as_str().ok_or_else(|| {
                definition_error(format!("{object}: column names must be strings"))
            })?;
            let literal = literal_from_yaml(value, &format!("{object}.{column}"))?;
            Ok((column.to_string(), literal))
        })
        .collect()
}

impl ColumnFile {
    fn into_column(self, table: &str) -> CoreResult<ColumnDef> {
        let default = match &self.default {
            Some(value) => Some(literal_from_yaml(value, &format!("{table}.{}", self.name))?),
            None => None,
        };
        let mut column = ColumnDef::new(self.name, self.ty);
        column.nullable = self.nullable;
        column.default = default;
        column.primary_key = self.primary_key;
        column.unique = self.unique;
        column.identity = self.identity;
        Ok(column)
    }
}

impl ExpressionDef {
    pub(crate) fn into_expression(
        self,
        scripts: &ScriptContext<'_>,
    ) -> CoreResult<SchemaExpression> {
        match self {
            ExpressionDef::CreateSchema { name } => SchemaExpression::create_schema(name),
            ExpressionDef::DeleteSchema { name } => SchemaExpression::delete_schema(name),
            ExpressionDef::CreateTable {
                schema,
                name,
                columns,
                primary_key,
            } => {
                let table = table_ref(schema, name);
                let object = table.to_string();
                let mut builder = CreateTable::builder(table);
                for column in columns {
                    builder = builder.column(column.into_column(&object)?);
                }
                if let Some(pk) = primary_key {
                    builder = match pk.name {
                        Some(name) => builder.primary_key_named(name, pk.columns),
                        None => builder.primary_key(pk.columns),
                    };
                }
                builder.build()
            }
            ExpressionDef::DeleteTable { schema, name } => {
                SchemaExpression::delete_table(table_ref(schema, name))
            }
            ExpressionDef::RenameTable { schema, name, to } => {
                SchemaExpression::rename_table(table_ref(schema, name), to)
            }
            ExpressionDef::CreateColumn {
                schema,
                table,
                column,
            } => {
                let table = table_ref(schema, table);
                let column = column.into_column(&table.to_string())?;
                SchemaExpression::create_column(table, column)
            }
            ExpressionDef::AlterColumn {
                schema,
                table,
                column,
                ty,
                nullable,
                default,
                drop_default,
            } => {
                let object = format!("{table}.{column}");
                let mut builder = AlterColumn::builder(table_ref(schema, table), column);
                if let Some(ty) = ty {
                    builder = builder.set_type(ty);
                }
                if let Some(nullable) = nullable {
                    builder = builder.set_nullable(nullable);
                }
                match (default, drop_default) {
                    (Some(_), true) => {
                        return Err(definition_error(format!(
                            "{object}: 'default' and 'drop_default' are mutually exclusive"
                        )))
                    }
                    (Some(value), false) => {
                        builder = builder.set_default(literal_from_yaml(&value, &object)?)
                    }
                    (None, true) => builder = builder.drop_default(),
                    (None, false) => {}
                }
                builder.build()
            }
            ExpressionDef::RenameColumn {
                schema,
                table,
                column,
                to,
            } => SchemaExpression::rename_column(table_ref(schema, table), column, to),
            ExpressionDef::DeleteColumn {
                schema,
                table,
                columns,
            } => SchemaExpression::delete_columns(table_ref(schema, table), columns),
            ExpressionDef::CreateIndex {
                schema,
                table,
                name,
                columns,
                unique,
            } => {
                let mut builder = CreateIndex::builder(table_ref(schema, table), name);
                for column in columns {
                    builder = match column {
                        IndexColumnFile::Name(name) => builder.column(name),
                        IndexColumnFile::Sorted { name, direction } => {
                            builder.column_sorted(name, direction)
                        }
                    };
                }
                if unique {
                    builder = builder.unique();
                }
                builder.build()
            }
            ExpressionDef::DeleteIndex {
                schema,
                table,
                name,
            } => SchemaExpression::delete_index(table_ref(schema, table), name),
            ExpressionDef::CreateForeignKey {
                name,
                schema,
                table,
                columns,
                references,
                on_delete,
                on_update,
            } => CreateForeignKey::builder(
                name,
                table_ref(schema, table),
                table_ref(references.schema, references.table),
            )
            .columns(columns)
            .referenced_columns(references.columns)
            .on_delete(on_delete)
            .on_update(on_update)
            .build(),
            ExpressionDef::DeleteForeignKey {
                schema,
                table,
                name,
            } => SchemaExpression::delete_foreign_key(table_ref(schema, table), name),
            ExpressionDef::InsertData {
                schema,
                table,
                rows,
            } => {
                let table = table_ref(schema, table);
                let object = table.to_string();
                let mut builder = InsertData::builder(table);
                for row in &rows {
                    builder = builder.row(row_from_mapping(row, &object)?);
                }
                builder.build()
            }
            ExpressionDef::DeleteData {
                schema,
                table,
                filter,
            } => {
                let table = table_ref(schema, table);
                let filter = row_from_mapping(&filter, &table.to_string())?;
                SchemaExpression::delete_data(table, filter)
            }
            ExpressionDef::Sql(sql) => SchemaExpression::raw_sql(sql),
            ExpressionDef::SqlFile(relative) => {
                SchemaExpression::raw_sql(scripts.render_sql_file(&relative)?)
            }
        }
    }
}

fn convert_all(
    defs: Vec<ExpressionDef>,
    scripts: &ScriptContext<'_>,
) -> CoreResult<Vec<SchemaExpression>> {
    defs.into_iter()
        .map(|def| def.into_expression(scripts))
        .collect()
}

impl MigrationFile {
    pub(crate) fn into_loaded(self, scripts: &ScriptContext<'_>) -> CoreResult<LoadedFile> {
        let up = convert_all(self.up, scripts)?;
        match self.stage {
            Some(stage) => {
                if self.down.is_some() {
                    return Err(definition_error(
                        "maintenance files run forward only and cannot declare 'down'",
                    ));
                }
                let mut builder = MaintenanceUnit::builder(stage)
                    .description(self.description)
                    .transaction(self.transaction);
                if let Some(version) = self.version {
                    builder = builder.version(version);
                }
                for tag in self.tags {
                    builder = builder.tag(tag);
                }
                for expression in up {
                    builder = builder.expression(expression);
                }
                Ok(LoadedFile::Maintenance(builder.build()?))
            }
            None => {
                let version = self.version.ok_or_else(|| {
                    definition_error("missing 'version' (maintenance files set 'stage' instead)")
                })?;
                let mut builder = MigrationUnit::builder(version)
                    .description(self.description)
                    .transaction(self.transaction);
                for tag in self.tags {
                    builder = builder.tag(tag);
                }
                for expression in up {
                    builder = builder.up(expression);
                }
                if let Some(down) = self.down {
                    builder = builder.reversible();
                    for expression in convert_all(down, scripts)? {
                        builder = builder.down(expression);
                    }
                }
                Ok(LoadedFile::Unit(builder.build()?))
            }
        }
    }
}
