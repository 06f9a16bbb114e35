//! Validate command implementation
//!
//! Loading a project already validates every expression. This command adds
//! the checks that need a dialect: every up and down expression must render,
//! and so must the version table.

use anyhow::Result;
use std::fmt;
use sw_core::{Dialect, MigrationSet, Project, SchemaExpression, VersionTableConfig};
use sw_runner::VersionStore;
use sw_sql::{generate, DialectProfile};

use crate::cli::{GlobalArgs, ValidateArgs};
use crate::commands::common::ExitCode;
use crate::context::RuntimeContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "WARNING"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// A single validation issue
struct ValidationIssue {
    severity: Severity,
    code: &'static str,
    message: String,
    file: Option<String>,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(
                f,
                "[{}] {}: {} ({})",
                self.severity, self.code, self.message, file
            ),
            None => write!(f, "[{}] {}: {}", self.severity, self.code, self.message),
        }
    }
}

#[derive(Default)]
struct ValidationContext {
    issues: Vec<ValidationIssue>,
}

impl ValidationContext {
    fn error(&mut self, code: &'static str, message: impl Into<String>, file: Option<String>) {
        self.issues.push(ValidationIssue {
            severity: Severity::Error,
            code,
            message: message.into(),
            file,
        });
    }

    fn warning(&mut self, code: &'static str, message: impl Into<String>, file: Option<String>) {
        self.issues.push(ValidationIssue {
            severity: Severity::Warning,
            code,
            message: message.into(),
            file,
        });
    }

    fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }
}

/// Execute the validate command
pub(crate) async fn execute(args: &ValidateArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let project = &ctx.project;

    println!("Validating project: {}\n", project.config.name);

    let dialects: Vec<Dialect> = if args.all_dialects {
        Dialect::ALL.to_vec()
    } else {
        vec![ctx.dialect()]
    };

    let mut issues = ValidationContext::default();
    check_duplicates(&project.migrations, &mut issues);
    check_reversibility(project, &mut issues);
    for dialect in dialects {
        print!("Rendering for {}... ", dialect);
        let before = issues.count(Severity::Error);
        match DialectProfile::load(dialect) {
            Ok(profile) => {
                check_rendering(project, profile, &mut issues);
                check_version_table(&project.config.version_table, profile, &mut issues);
            }
            Err(err) => issues.error("V005", err.to_string(), None),
        }
        let added = issues.count(Severity::Error) - before;
        if added == 0 {
            println!("✓");
        } else {
            println!("✗ ({} errors)", added);
        }
    }

    print_issues_and_summary(&issues)
}

fn check_duplicates(migrations: &MigrationSet, issues: &mut ValidationContext) {
    for version in migrations.duplicate_versions() {
        issues.error(
            "V001",
            format!("Version {} is defined more than once", version),
            None,
        );
    }
}

fn check_reversibility(project: &Project, issues: &mut ValidationContext) {
    for unit in project.migrations.units() {
        if !unit.is_reversible() {
            issues.warning(
                "W001",
                format!("Migration {} has no down expressions and cannot be reverted", unit.label()),
                source_of(project, unit.version()),
            );
        }
    }
}

fn check_rendering(project: &Project, profile: &DialectProfile, issues: &mut ValidationContext) {
    for unit in project.migrations.units() {
        let file = source_of(project, unit.version());
        render_all(&unit.label(), "up", unit.up(), profile, file.clone(), issues);
        if let Some(down) = unit.down() {
            render_all(&unit.label(), "down", down, profile, file, issues);
        }
    }
    for unit in project.migrations.maintenance() {
        render_all(&unit.label(), "up", unit.expressions(), profile, None, issues);
    }
}

fn render_all(
    label: &str,
    direction: &str,
    expressions: &[SchemaExpression],
    profile: &DialectProfile,
    file: Option<String>,
    issues: &mut ValidationContext,
) {
    for (index, expr) in expressions.iter().enumerate() {
        if let Err(err) = generate(expr, profile) {
            issues.error(
                "V002",
                format!(
                    "{} {} expression #{} cannot be rendered for {}: {}",
                    label, direction, index, profile.dialect, err
                ),
                file.clone(),
            );
        }
    }
}

fn check_version_table(
    config: &VersionTableConfig,
    profile: &'static DialectProfile,
    issues: &mut ValidationContext,
) {
    if let Err(err) = VersionStore::new(profile, config).check_generation() {
        issues.error(
            "V003",
            format!("Version table cannot be created on {}: {}", profile.dialect, err),
            None,
        );
    }
}

fn source_of(project: &Project, version: sw_core::MigrationVersion) -> Option<String> {
    project
        .source_of(version)
        .map(|p| p.strip_prefix(&project.root).unwrap_or(p).display().to_string())
}

fn print_issues_and_summary(issues: &ValidationContext) -> Result<()> {
    println!();
    for issue in &issues.issues {
        println!("{}", issue);
    }

    let error_count = issues.count(Severity::Error);
    let warning_count = issues.count(Severity::Warning);

    println!();
    if error_count == 0 {
        println!(
            "Validation passed: {} errors, {} warnings",
            error_count, warning_count
        );
        Ok(())
    } else {
        println!(
            "Validation failed: {} errors, {} warnings",
            error_count, warning_count
        );
        Err(ExitCode(1).into())
    }
}

#[cfg(test)]
#[path = "validate_test.rs"]
mod tests;
