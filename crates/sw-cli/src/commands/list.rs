//! List command implementation

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use sw_core::{MigrationSet, MigrationVersion};
use sw_runner::{ConsistencyWarning, RunRequest, Runner, VersionRecord};

use crate::cli::{GlobalArgs, ListArgs, ListOutput};
use crate::commands::common::print_json;
use crate::context::RuntimeContext;

/// Applied state of one version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum EntryStatus {
    Applied,
    Pending,
    /// Recorded in the version table but not defined by any file
    Missing,
}

impl EntryStatus {
    fn as_str(self) -> &'static str {
        match self {
            EntryStatus::Applied => "applied",
            EntryStatus::Pending => "pending",
            EntryStatus::Missing => "missing",
        }
    }
}

#[derive(Debug, Serialize)]
struct ListEntry {
    version: MigrationVersion,
    status: EntryStatus,
    description: String,
    tags: Vec<String>,
    applied_at: Option<DateTime<Utc>>,
    reversible: bool,
}

#[derive(Debug, Serialize)]
struct ListReport<'a> {
    migrations: &'a [ListEntry],
    warnings: &'a [ConsistencyWarning],
}

/// Execute the list command
pub(crate) async fn execute(args: &ListArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let processor = ctx.connect()?;
    let runner = Runner::new(processor, &ctx.project.migrations)?
        .with_version_table(&ctx.project.config.version_table);

    let records = runner
        .records()
        .await
        .context("Failed to read the version table")?;
    let entries = build_entries(&ctx.project.migrations, &records);

    let warnings = match runner.plan(&RunRequest::up().dry_run()).await {
        Ok(plan) => plan.warnings,
        Err(err) => {
            ctx.verbose(&format!("Skipping consistency checks: {}", err));
            Vec::new()
        }
    };

    match args.output {
        ListOutput::Table => {
            print_table(&entries);
            for warning in &warnings {
                eprintln!("[warn] {}", warning);
            }
        }
        ListOutput::Json => print_json(&ListReport {
            migrations: &entries,
            warnings: &warnings,
        })?,
    }
    Ok(())
}

/// Merge discovered units with version-table rows, ordered by version.
fn build_entries(migrations: &MigrationSet, records: &[VersionRecord]) -> Vec<ListEntry> {
    let applied: BTreeMap<MigrationVersion, &VersionRecord> =
        records.iter().map(|r| (r.version, r)).collect();

    let mut entries: Vec<ListEntry> = migrations
        .sorted()
        .into_iter()
        .map(|unit| {
            let record = applied.get(&unit.version());
            ListEntry {
                version: unit.version(),
                status: if record.is_some() {
                    EntryStatus::Applied
                } else {
                    EntryStatus::Pending
                },
                description: unit.description().to_string(),
                tags: unit.tags().iter().map(|t| t.to_string()).collect(),
                applied_at: record.and_then(|r| r.applied_at_utc),
                reversible: unit.is_reversible(),
            }
        })
        .collect();

    for unit in migrations.maintenance() {
        if let Some(version) = unit.version() {
            entries.push(ListEntry {
                version,
                status: if applied.contains_key(&version) {
                    EntryStatus::Applied
                } else {
                    EntryStatus::Pending
                },
                description: unit.label(),
                tags: unit.tags().iter().map(|t| t.to_string()).collect(),
                applied_at: applied.get(&version).and_then(|r| r.applied_at_utc),
                reversible: false,
            });
        }
    }

    let known: Vec<MigrationVersion> = entries.iter().map(|e| e.version).collect();
    for record in records.iter().filter(|r| !known.contains(&r.version)) {
        entries.push(ListEntry {
            version: record.version,
            status: EntryStatus::Missing,
            description: record.description.clone().unwrap_or_default(),
            tags: Vec::new(),
            applied_at: record.applied_at_utc,
            reversible: false,
        });
    }

    entries.sort_by_key(|e| e.version);
    entries
}

fn print_table(entries: &[ListEntry]) {
    let version_width = entries
        .iter()
        .map(|e| e.version.to_string().len())
        .max()
        .unwrap_or(7)
        .max(7);
    let status_width = 7;
    let applied_width = 19;

    println!(
        "{:<version_width$}  {:<status_width$}  {:<applied_width$}  DESCRIPTION",
        "VERSION", "STATUS", "APPLIED_AT",
    );
    println!(
        "{:-<version_width$}  {:-<status_width$}  {:-<applied_width$}  {}",
        "",
        "",
        "",
        "-".repeat(40),
    );

    for entry in entries {
        let applied_at = entry
            .applied_at
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string());
        let mut description = entry.description.clone();
        if !entry.tags.is_empty() {
            description.push_str(&format!(" [{}]", entry.tags.join(", ")));
        }
        println!(
            "{:<version_width$}  {:<status_width$}  {:<applied_width$}  {}",
            entry.version.to_string(),
            entry.status.as_str(),
            applied_at,
            description,
        );
    }

    let applied = entries
        .iter()
        .filter(|e| e.status == EntryStatus::Applied)
        .count();
    let pending = entries
        .iter()
        .filter(|e| e.status == EntryStatus::Pending)
        .count();
    println!();
    println!("{} applied, {} pending", applied, pending);
}

#[cfg(test)]
#[path = "list_test.rs"]
mod tests;
