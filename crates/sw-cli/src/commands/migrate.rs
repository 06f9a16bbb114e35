//! `up` and `down` command implementation

use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use sw_db::DbError;
use sw_runner::{
    Direction, NoopObserver, Planner, PreviewScript, RunObserver, RunOutcome, RunReport,
    RunRequest, RunStatus, Runner,
};
use sw_sql::DialectProfile;

use crate::cli::{GlobalArgs, MigrateArgs, OutputFormat};
use crate::commands::common::{parse_tags, print_json, ExitCode, EXIT_CANCELLED, EXIT_RUN_FAILED};
use crate::commands::progress::ProgressObserver;
use crate::context::RuntimeContext;

/// Execute `up` or `down`
pub(crate) async fn execute(
    direction: Direction,
    args: &MigrateArgs,
    global: &GlobalArgs,
) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let request = build_request(direction, args)?;
    let profile = ctx.profile()?;

    let processor = match ctx.try_connect()? {
        Ok(processor) => processor,
        Err(DbError::NotImplemented { .. }) if args.dry_run => {
            ctx.verbose(&format!(
                "No processor for {}; rendering against an empty version table",
                ctx.dialect()
            ));
            let plan = Planner::new(&ctx.project.migrations, profile)
                .plan(&request, &BTreeSet::new())
                .context("Planning failed")?;
            let preview = PreviewScript::from_plan(&plan, profile);
            return print_preview(&preview, profile, args.output);
        }
        Err(err) => {
            return Err(err)
                .with_context(|| format!("Failed to connect to {} database", ctx.dialect()))
        }
    };

    let observer: Arc<dyn RunObserver> = match args.output {
        OutputFormat::Text if !args.dry_run => Arc::new(ProgressObserver::new(ctx.verbose)),
        _ => Arc::new(NoopObserver),
    };
    let runner = Runner::new(processor, &ctx.project.migrations)?
        .with_version_table(&ctx.project.config.version_table)
        .with_observer(observer);

    let cancel = runner.cancel_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("Cancelling after the current migration finishes...");
            cancel.store(true, Ordering::SeqCst);
        }
    });

    let outcome = runner.run(&request).await.context("Migration run failed")?;
    match outcome {
        RunOutcome::Preview(preview) => print_preview(&preview, profile, args.output),
        RunOutcome::Applied(report) => {
            match args.output {
                OutputFormat::Json => print_json(&report)?,
                OutputFormat::Text => print_report(&report),
            }
            match report.status {
                RunStatus::Failed => Err(ExitCode(EXIT_RUN_FAILED).into()),
                RunStatus::Cancelled => Err(ExitCode(EXIT_CANCELLED).into()),
                RunStatus::Success | RunStatus::NoOp => Ok(()),
            }
        }
    }
}

fn build_request(direction: Direction, args: &MigrateArgs) -> Result<RunRequest> {
    let mut request = match direction {
        Direction::Up => RunRequest::up(),
        Direction::Down => RunRequest::down(),
    };
    if let Some(to) = args.to {
        if to < 0 {
            anyhow::bail!("--to must be zero or a migration version, got {}", to);
        }
        request = request.to(to);
    }
    let tags = parse_tags(&args.tags)?;
    if !tags.is_empty() {
        request = request.with_tags(tags);
    }
    if args.dry_run {
        request = request.dry_run();
    }
    Ok(request)
}

fn print_preview(
    preview: &PreviewScript,
    profile: &DialectProfile,
    output: OutputFormat,
) -> Result<()> {
    if output == OutputFormat::Json {
        return print_json(preview);
    }
    for warning in &preview.warnings {
        eprintln!("[warn] {}", warning);
    }
    if preview.is_empty() {
        println!("-- Nothing to run ({})", preview.direction);
    } else {
        print!("{}", preview.script(profile));
    }
    Ok(())
}

fn print_report(report: &RunReport) {
    let duration = report.finished_at - report.started_at;
    match report.status {
        RunStatus::NoOp => println!("Nothing to migrate {}.", report.direction),
        RunStatus::Success => println!(
            "Applied {} migration(s) {} in {:.2}s",
            report.units_applied.len(),
            report.direction,
            duration.num_milliseconds() as f64 / 1000.0
        ),
        RunStatus::Cancelled => println!(
            "Cancelled after {} migration(s).",
            report.units_applied.len()
        ),
        RunStatus::Failed => {
            println!(
                "Run failed after {} migration(s).",
                report.units_applied.len()
            );
            if let Some(failure) = &report.failure {
                eprintln!(
                    "  {} failed at statement {}: {}",
                    failure.unit, failure.statement_index, failure.message
                );
                if failure.rolled_back {
                    eprintln!("  The migration was rolled back.");
                } else {
                    eprintln!("  Statements before the failure were NOT rolled back.");
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "migrate_test.rs"]
mod tests;
