//! Per-run progress reporting.

use crate::plan::{ConsistencyWarning, PlannedStep, RunPlan};
use std::fmt;

/// Engine state transitions reported to a [`RunObserver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Planning,
    Executing { index: usize, total: usize, label: String },
    Committed { label: String },
    RolledBack { label: String },
    Failed { label: String },
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineState::Idle => write!(f, "idle"),
            EngineState::Planning => write!(f, "planning"),
            EngineState::Executing {
                index,
                total,
                label,
            } => write!(f, "executing [{}/{}] {}", index + 1, total, label),
            EngineState::Committed { label } => write!(f, "committed {label}"),
            EngineState::RolledBack { label } => write!(f, "rolled back {label}"),
            EngineState::Failed { label } => write!(f, "failed {label}"),
        }
    }
}

/// Receives progress for one run. Every method has a no-op default.
pub trait RunObserver: Send + Sync {
    fn on_state(&self, _state: &EngineState) {}

    fn on_plan(&self, _plan: &RunPlan) {}

    fn on_warning(&self, _warning: &ConsistencyWarning) {}

    fn on_statement(&self, _step: &PlannedStep, _index: usize, _sql: &str) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl RunObserver for NoopObserver {}

/// Observer that forwards to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl RunObserver for LogObserver {
    fn on_state(&self, state: &EngineState) {
        match state {
            EngineState::Failed { .. } | EngineState::RolledBack { .. } => {
                log::error!("{state}")
            }
            _ => log::info!("{state}"),
        }
    }

    fn on_plan(&self, plan: &RunPlan) {
        log::info!(
            "Plan: {} {} step(s), {} statement(s)",
            plan.direction,
            plan.steps.len(),
            plan.statement_count()
        );
    }

    fn on_warning(&self, warning: &ConsistencyWarning) {
        log::warn!("{warning}");
    }

    fn on_statement(&self, step: &PlannedStep, index: usize, sql: &str) {
        log::debug!("{} #{}: {}", step.label, index, sql);
    }
}
