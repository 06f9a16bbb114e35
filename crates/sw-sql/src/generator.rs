//! Statement generation: a pure mapping from `(expression, profile)` to SQL.
//!
//! Every variant of [`SchemaExpression`] is handled explicitly; adding a
//! variant fails to compile here until each dialect path is decided.

use crate::error::SqlResult;
use crate::literal::{quote_text, render_literal};
use crate::profile::{
    AlterColumnPolicy, DialectProfile, DropIndexStyle, IdentityStyle, RenameStyle,
};
use sw_core::expression::{
    CreateColumn, DeleteColumn, DeleteData, DeleteForeignKey, DeleteIndex, RenameColumn,
    RenameTable,
};
use sw_core::{
    AlterColumn, ColumnDef, CreateForeignKey, CreateIndex, CreateTable, DefaultChange,
    ForeignKeyRule, InsertData, SchemaExpression, SortDirection, TableRef,
};

/// Render one expression into the statements that perform it, in order.
pub fn generate(expr: &SchemaExpression, profile: &DialectProfile) -> SqlResult<Vec<String>> {
    let kind = expr.kind();
    if !profile.supports(kind) {
        return Err(profile.unsupported(kind.name()));
    }

    match expr {
        SchemaExpression::CreateSchema(e) => {
            Ok(vec![format!("CREATE SCHEMA {}", profile.quote_ident(&e.name)?)])
        }
        SchemaExpression::DeleteSchema(e) => {
            Ok(vec![format!("DROP SCHEMA {}", profile.quote_ident(&e.name)?)])
        }
        SchemaExpression::CreateTable(e) => create_table(e, profile),
        SchemaExpression::DeleteTable(e) => {
            Ok(vec![format!("DROP TABLE {}", table(profile, &e.table)?)])
        }
        SchemaExpression::RenameTable(e) => rename_table(e, profile),
        SchemaExpression::CreateColumn(e) => create_column(e, profile),
        SchemaExpression::AlterColumn(e) => alter_column(e, profile),
        SchemaExpression::RenameColumn(e) => rename_column(e, profile),
        SchemaExpression::DeleteColumn(e) => delete_column(e, profile),
        SchemaExpression::CreateIndex(e) => create_index(e, profile),
        SchemaExpression::DeleteIndex(e) => delete_index(e, profile),
        SchemaExpression::CreateForeignKey(e) => create_foreign_key(e, profile),
        SchemaExpression::DeleteForeignKey(e) => delete_foreign_key(e, profile),
        SchemaExpression::InsertData(e) => insert_data(e, profile),
        SchemaExpression::DeleteData(e) => delete_data(e, profile),
        SchemaExpression::RawSql(e) => Ok(vec![e.sql.clone()]),
    }
}

/// Join statements into a script using the dialect's terminator.
pub fn render_script(statements: &[String], profile: &DialectProfile) -> String {
    let mut script = String::new();
    for statement in statements {
        let body = statement.trim_end();
        let body = body.strip_suffix(';').unwrap_or(body);
        script.push_str(body);
        script.push_str(profile.statement_terminator);
        script.push('\n');
    }
    script
}

fn table(profile: &DialectProfile, table: &TableRef) -> SqlResult<String> {
    profile.qualify(table.schema.as_deref(), &table.name)
}

fn column_list<'a>(
    profile: &DialectProfile,
    columns: impl IntoIterator<Item = &'a String>,
) -> SqlResult<String> {
    let quoted = columns
        .into_iter()
        .map(|c| profile.quote_ident(c))
        .collect::<SqlResult<Vec<_>>>()?;
    Ok(quoted.join(", "))
}

fn default_constraint_name(table: &TableRef, column: &str) -> String {
    format!("DF_{}_{}", table.name, column)
}

/// Column definition as used in CREATE TABLE and ADD COLUMN.
///
/// `inline_key` is set when the column is the single primary-key column of a
/// table being created; only then can SQLite express an identity.
fn column_definition(
    profile: &DialectProfile,
    table: &TableRef,
    column: &ColumnDef,
    inline_key: bool,
) -> SqlResult<String> {
    let mut def = format!(
        "{} {}",
        profile.quote_ident(&column.name)?,
        profile.native_type(&column.ty)?
    );

    if column.identity {
        let style = profile
            .identity
            .ok_or_else(|| profile.unsupported("identity columns"))?;
        match style {
            IdentityStyle::GeneratedByDefault => def.push_str(" GENERATED BY DEFAULT AS IDENTITY"),
            IdentityStyle::IdentityFunction => def.push_str(" IDENTITY(1,1)"),
            IdentityStyle::AutoIncrement => def.push_str(" AUTO_INCREMENT"),
            IdentityStyle::InlineAutoincrementKey => {
                if !inline_key {
                    return Err(profile.unsupported(
                        "identity columns outside a single-column primary key",
                    ));
                }
                return Ok(format!(
                    "{} INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT",
                    profile.quote_ident(&column.name)?
                ));
            }
        }
    }

    if let Some(value) = &column.default {
        if profile.named_default_constraints {
            def.push_str(&format!(
                " CONSTRAINT {}",
                profile.quote_ident(&default_constraint_name(table, &column.name))?
            ));
        }
        def.push_str(&format!(" DEFAULT {}", render_literal(profile, value)?));
    }
    if !column.nullable {
        def.push_str(" NOT NULL");
    }
    if column.unique {
        def.push_str(" UNIQUE");
    }
    Ok(def)
}

fn create_table(e: &CreateTable, profile: &DialectProfile) -> SqlResult<Vec<String>> {
    let key_columns = e.primary_key_columns();
    let inline_identity = profile.identity == Some(IdentityStyle::InlineAutoincrementKey)
        && key_columns.len() == 1
        && e
            .columns
            .iter()
            .any(|c| c.identity && c.name.eq_ignore_ascii_case(key_columns[0]));

    let mut parts = Vec::with_capacity(e.columns.len() + 1);
    for column in &e.columns {
        let inline_key = inline_identity && column.name.eq_ignore_ascii_case(key_columns[0]);
        parts.push(column_definition(profile, &e.table, column, inline_key)?);
    }

    if !inline_identity {
        let quoted = key_columns
            .iter()
            .map(|c| profile.quote_ident(c))
            .collect::<SqlResult<Vec<_>>>()?;
        parts.push(format!(
            "CONSTRAINT {} PRIMARY KEY ({})",
            profile.quote_ident(&e.primary_key_name())?,
            quoted.join(", ")
        ));
    }

    Ok(vec![format!(
        "CREATE TABLE {} (\n    {}\n)",
        table(profile, &e.table)?,
        parts.join(",\n    ")
    )])
}

fn rename_table(e: &RenameTable, profile: &DialectProfile) -> SqlResult<Vec<String>> {
    let style = profile
        .rename_table
        .ok_or_else(|| profile.unsupported("rename table"))?;
    let current = table(profile, &e.table)?;
    let statement = match style {
        RenameStyle::AlterTable => format!(
            "ALTER TABLE {current} RENAME TO {}",
            profile.quote_ident(&e.new_name)?
        ),
        RenameStyle::RenameStatement => format!(
            "RENAME TABLE {current} TO {}",
            profile.qualify(e.table.schema.as_deref(), &e.new_name)?
        ),
        RenameStyle::StoredProcedure => format!(
            "EXEC sp_rename {}, {}",
            quote_text(profile, &current),
            quote_text(profile, &e.new_name)
        ),
    };
    Ok(vec![statement])
}

fn rename_column(e: &RenameColumn, profile: &DialectProfile) -> SqlResult<Vec<String>> {
    let style = profile
        .rename_column
        .ok_or_else(|| profile.unsupported("rename column"))?;
    let current = table(profile, &e.table)?;
    let statement = match style {
        RenameStyle::AlterTable => format!(
            "ALTER TABLE {current} RENAME COLUMN {} TO {}",
            profile.quote_ident(&e.column)?,
            profile.quote_ident(&e.new_name)?
        ),
        RenameStyle::RenameStatement => {
            return Err(profile.unsupported("rename column through RENAME"));
        }
        RenameStyle::StoredProcedure => format!(
            "EXEC sp_rename {}, {}, N'COLUMN'",
            quote_text(
                profile,
                &format!("{current}.{}", profile.quote_ident(&e.column)?)
            ),
            quote_text(profile, &e.new_name)
        ),
    };
    Ok(vec![statement])
}

fn create_column(e: &CreateColumn, profile: &DialectProfile) -> SqlResult<Vec<String>> {
    let mut def = column_definition(profile, &e.table, &e.column, false)?;
    if e.column.primary_key {
        def.push_str(" PRIMARY KEY");
    }
    Ok(vec![format!(
        "ALTER TABLE {} {} {def}",
        table(profile, &e.table)?,
        profile.add_column_keyword
    )])
}

/// SQL Server keeps defaults as named constraints whose name may not be the
/// one we generated, so the drop looks it up from the catalog.
fn drop_default_constraint(
    profile: &DialectProfile,
    table_sql: &str,
    column: &str,
) -> String {
    format!(
        "DECLARE @sql NVARCHAR(MAX);\n\
         SELECT @sql = {} + QUOTENAME(d.name)\n\
         FROM sys.default_constraints d\n\
         JOIN sys.columns c ON c.object_id = d.parent_object_id AND c.column_id = d.parent_column_id\n\
         WHERE d.parent_object_id = OBJECT_ID({}) AND c.name = {};\n\
         IF @sql IS NOT NULL EXEC sp_executesql @sql",
        quote_text(profile, &format!("ALTER TABLE {table_sql} DROP CONSTRAINT ")),
        quote_text(profile, table_sql),
        quote_text(profile, column)
    )
}

/// Engines that rewrite the whole column definition need both the type and
/// the nullability; an omitted NULL/NOT NULL would silently mean NULL.
fn restated_definition<'a>(
    profile: &DialectProfile,
    native: &'a Option<String>,
    nullable: Option<bool>,
) -> SqlResult<(&'a str, bool)> {
    let native = native.as_deref().ok_or_else(|| {
        profile.unsupported("changing nullability without restating the column type")
    })?;
    let nullable = nullable.ok_or_else(|| {
        profile.unsupported("changing the column type without restating nullability")
    })?;
    Ok((native, nullable))
}

fn alter_column(e: &AlterColumn, profile: &DialectProfile) -> SqlResult<Vec<String>> {
    let policy = profile
        .alter_column
        .ok_or_else(|| profile.unsupported("alter column"))?;
    let t = table(profile, &e.table)?;
    let c = profile.quote_ident(&e.column)?;
    let native = e
        .new_type
        .as_ref()
        .map(|ty| profile.native_type(ty))
        .transpose()?;
    let default = match &e.default {
        Some(DefaultChange::Set(value)) => Some(Some(render_literal(profile, value)?)),
        Some(DefaultChange::Drop) => Some(None),
        None => None,
    };

    let statements = match policy {
        AlterColumnPolicy::CombinedActions | AlterColumnPolicy::SeparateStatements => {
            let mut actions = Vec::new();
            if let Some(native) = &native {
                actions.push(format!("ALTER COLUMN {c} TYPE {native}"));
            }
            match &default {
                Some(Some(value)) => actions.push(format!("ALTER COLUMN {c} SET DEFAULT {value}")),
                Some(None) => actions.push(format!("ALTER COLUMN {c} DROP DEFAULT")),
                None => {}
            }
            match e.nullable {
                Some(false) => actions.push(format!("ALTER COLUMN {c} SET NOT NULL")),
                Some(true) => actions.push(format!("ALTER COLUMN {c} DROP NOT NULL")),
                None => {}
            }
            if policy == AlterColumnPolicy::CombinedActions {
                vec![format!("ALTER TABLE {t} {}", actions.join(", "))]
            } else {
                actions
                    .into_iter()
                    .map(|action| format!("ALTER TABLE {t} {action}"))
                    .collect()
            }
        }
        AlterColumnPolicy::DefaultConstraintSwap => {
            let mut statements = Vec::new();
            if default.is_some() {
                statements.push(drop_default_constraint(profile, &t, &e.column));
            }
            if native.is_some() || e.nullable.is_some() {
                let (native, nullable) = restated_definition(profile, &native, e.nullable)?;
                let nullability = if nullable { "NULL" } else { "NOT NULL" };
                statements.push(format!("ALTER TABLE {t} ALTER COLUMN {c} {native} {nullability}"));
            }
            if let Some(Some(value)) = &default {
                statements.push(format!(
                    "ALTER TABLE {t} ADD CONSTRAINT {} DEFAULT {value} FOR {c}",
                    profile.quote_ident(&default_constraint_name(&e.table, &e.column))?
                ));
            }
            statements
        }
        AlterColumnPolicy::ModifyColumn => {
            if native.is_some() || e.nullable.is_some() {
                let (native, nullable) = restated_definition(profile, &native, e.nullable)?;
                // MODIFY COLUMN replaces the whole definition, dropping an unstated default
                let default = default.as_ref().ok_or_else(|| {
                    profile.unsupported("modifying a column without restating its default")
                })?;
                let mut def = format!("ALTER TABLE {t} MODIFY COLUMN {c} {native}");
                if let Some(value) = default {
                    def.push_str(&format!(" DEFAULT {value}"));
                }
                def.push_str(if nullable { " NULL" } else { " NOT NULL" });
                vec![def]
            } else {
                match &default {
                    Some(Some(value)) => {
                        vec![format!("ALTER TABLE {t} ALTER COLUMN {c} SET DEFAULT {value}")]
                    }
                    _ => vec![format!("ALTER TABLE {t} ALTER COLUMN {c} DROP DEFAULT")],
                }
            }
        }
        AlterColumnPolicy::ModifyPartial => {
            let mut parts = vec![c.clone()];
            if let Some(native) = &native {
                parts.push(native.clone());
            }
            match &default {
                Some(Some(value)) => parts.push(format!("DEFAULT {value}")),
                Some(None) => parts.push("DEFAULT NULL".to_string()),
                None => {}
            }
            match e.nullable {
                Some(false) => parts.push("NOT NULL".to_string()),
                Some(true) => parts.push("NULL".to_string()),
                None => {}
            }
            vec![format!("ALTER TABLE {t} MODIFY ({})", parts.join(" "))]
        }
    };
    Ok(statements)
}

fn delete_column(e: &DeleteColumn, profile: &DialectProfile) -> SqlResult<Vec<String>> {
    let t = table(profile, &e.table)?;
    let mut statements = Vec::new();
    for column in &e.columns {
        if profile.named_default_constraints {
            statements.push(drop_default_constraint(profile, &t, column));
        }
        statements.push(format!(
            "ALTER TABLE {t} DROP COLUMN {}",
            profile.quote_ident(column)?
        ));
    }
    Ok(statements)
}

fn create_index(e: &CreateIndex, profile: &DialectProfile) -> SqlResult<Vec<String>> {
    let columns = e
        .columns
        .iter()
        .map(|c| {
            let name = profile.quote_ident(&c.name)?;
            Ok(match c.direction {
                SortDirection::Ascending => name,
                SortDirection::Descending => format!("{name} DESC"),
            })
        })
        .collect::<SqlResult<Vec<_>>>()?;
    Ok(vec![format!(
        "CREATE {}INDEX {} ON {} ({})",
        if e.unique { "UNIQUE " } else { "" },
        profile.quote_ident(&e.name)?,
        table(profile, &e.table)?,
        columns.join(", ")
    )])
}

fn delete_index(e: &DeleteIndex, profile: &DialectProfile) -> SqlResult<Vec<String>> {
    let statement = match profile.drop_index {
        DropIndexStyle::Standalone => format!(
            "DROP INDEX {}",
            profile.qualify(e.table.schema.as_deref(), &e.name)?
        ),
        DropIndexStyle::OnTable => format!(
            "DROP INDEX {} ON {}",
            profile.quote_ident(&e.name)?,
            table(profile, &e.table)?
        ),
    };
    Ok(vec![statement])
}

fn check_rule(profile: &DialectProfile, clause: &str, rule: ForeignKeyRule) -> SqlResult<()> {
    if rule == ForeignKeyRule::NoAction {
        return Ok(());
    }
    let allowed = profile.on_delete_rules.contains(&rule)
        && (clause == "ON DELETE" || profile.supports_on_update);
    if !allowed {
        return Err(profile.unsupported(format!("{clause} {}", rule.sql())));
    }
    Ok(())
}

fn create_foreign_key(e: &CreateForeignKey, profile: &DialectProfile) -> SqlResult<Vec<String>> {
    check_rule(profile, "ON DELETE", e.on_delete)?;
    check_rule(profile, "ON UPDATE", e.on_update)?;

    let mut statement = format!(
        "ALTER TABLE {} ADD CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({})",
        table(profile, &e.table)?,
        profile.quote_ident(&e.name)?,
        column_list(profile, &e.columns)?,
        table(profile, &e.referenced_table)?,
        column_list(profile, &e.referenced_columns)?
    );
    if e.on_delete != ForeignKeyRule::NoAction {
        statement.push_str(&format!(" ON DELETE {}", e.on_delete.sql()));
    }
    if e.on_update != ForeignKeyRule::NoAction {
        statement.push_str(&format!(" ON UPDATE {}", e.on_update.sql()));
    }
    Ok(vec![statement])
}

fn delete_foreign_key(e: &DeleteForeignKey, profile: &DialectProfile) -> SqlResult<Vec<String>> {
    Ok(vec![format!(
        "ALTER TABLE {} DROP {} {}",
        table(profile, &e.table)?,
        profile.drop_foreign_key_keyword,
        profile.quote_ident(&e.name)?
    )])
}

fn insert_data(e: &InsertData, profile: &DialectProfile) -> SqlResult<Vec<String>> {
    let t = table(profile, &e.table)?;
    e.rows
        .iter()
        .map(|row| {
            let columns = column_list(profile, row.iter().map(|(c, _)| c))?;
            let values = row
                .iter()
                .map(|(_, v)| render_literal(profile, v))
                .collect::<SqlResult<Vec<_>>>()?;
            Ok(format!(
                "INSERT INTO {t} ({columns}) VALUES ({})",
                values.join(", ")
            ))
        })
        .collect()
}

fn delete_data(e: &DeleteData, profile: &DialectProfile) -> SqlResult<Vec<String>> {
    let conditions = e
        .filter
        .iter()
        .map(|(column, value)| {
            let column = profile.quote_ident(column)?;
            Ok(if value.is_null() {
                format!("{column} IS NULL")
            } else {
                format!("{column} = {}", render_literal(profile, value)?)
            })
        })
        .collect::<SqlResult<Vec<_>>>()?;
    Ok(vec![format!(
        "DELETE FROM {} WHERE {}",
        table(profile, &e.table)?,
        conditions.join(" AND ")
    )])
}

#[cfg(test)]
#[path = "generator_test.rs"]
mod tests;
