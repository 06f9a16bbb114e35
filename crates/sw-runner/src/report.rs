//! Run results: the report of an executed run, or the script of a dry run.

use crate::plan::{ConsistencyWarning, Direction, RunPlan};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sw_core::{Dialect, MigrationVersion};
use sw_sql::{render_script, DialectProfile};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Success,
    Failed,
    NoOp,
    Cancelled,
}

/// Where and why a unit failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitFailure {
    pub unit: String,
    pub version: Option<MigrationVersion>,
    /// Index into the unit's statements; equal to the statement count when
    /// the version-table update or the commit failed
    pub statement_index: usize,
    pub message: String,
    pub rolled_back: bool,
}

/// A step that completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedStep {
    pub label: String,
    pub version: Option<MigrationVersion>,
    pub statements: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub direction: Direction,
    pub status: RunStatus,
    pub units_applied: Vec<AppliedStep>,
    pub failure: Option<UnitFailure>,
    pub warnings: Vec<ConsistencyWarning>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    /// Versions of the completed steps, in execution order.
    pub fn versions(&self) -> Vec<MigrationVersion> {
        self.units_applied.iter().filter_map(|s| s.version).collect()
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, RunStatus::Success | RunStatus::NoOp)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewStep {
    pub label: String,
    pub version: Option<MigrationVersion>,
    pub statements: Vec<String>,
}

/// The SQL a run would execute, without executing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewScript {
    pub direction: Direction,
    pub dialect: Dialect,
    pub steps: Vec<PreviewStep>,
    pub warnings: Vec<ConsistencyWarning>,
}

impl PreviewScript {
    pub fn from_plan(plan: &RunPlan, profile: &DialectProfile) -> Self {
        Self {
            direction: plan.direction,
            dialect: profile.dialect,
            steps: plan
                .steps
                .iter()
                .map(|s| PreviewStep {
                    label: s.label.clone(),
                    version: s.version,
                    statements: s.statements.clone(),
                })
                .collect(),
            warnings: plan.warnings.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// One script, each step introduced by a `-- label` comment.
    pub fn script(&self, profile: &DialectProfile) -> String {
        let mut out = String::new();
        for step in &self.steps {
            out.push_str(&format!("-- {} ({})\n", step.label, self.direction));
            out.push_str(&render_script(&step.statements, profile));
            out.push('\n');
        }
        out
    }
}

/// Result of [`Runner::run`](crate::Runner::run).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunOutcome {
    Preview(PreviewScript),
    Applied(RunReport),
}
