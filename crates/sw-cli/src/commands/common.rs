//! Shared helpers for CLI commands

use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt;
use sw_core::Tag;

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that destructors run (progress bars, database handles).
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Control flow only; main never prints this
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Exit code for a run that stopped on a failed unit
pub(crate) const EXIT_RUN_FAILED: i32 = 2;

/// Exit code for a run stopped by Ctrl-C
pub(crate) const EXIT_CANCELLED: i32 = 130;

/// Parse `--tags` values; a blank entry is an error.
pub(crate) fn parse_tags(raw: &[String]) -> Result<Vec<Tag>> {
    raw.iter()
        .map(|s| Tag::new(s.as_str()).with_context(|| format!("Invalid tag '{}'", s)))
        .collect()
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
