//! Terminal progress for migration runs

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use sw_runner::{ConsistencyWarning, EngineState, PlannedStep, RunObserver, RunPlan};

/// Drives an indicatif bar from engine state changes.
pub(crate) struct ProgressObserver {
    bar: Mutex<Option<ProgressBar>>,
    verbose: bool,
}

impl ProgressObserver {
    pub(crate) fn new(verbose: bool) -> Self {
        Self {
            bar: Mutex::new(None),
            verbose,
        }
    }

    fn current(&self) -> Option<ProgressBar> {
        self.bar.lock().ok().and_then(|bar| bar.clone())
    }

    /// Print above the bar when one is drawn.
    fn line(&self, msg: String) {
        match self.current() {
            Some(bar) => emit(&bar, msg),
            None => eprintln!("{}", msg),
        }
    }
}

impl RunObserver for ProgressObserver {
    fn on_plan(&self, plan: &RunPlan) {
        if plan.is_empty() {
            return;
        }
        let bar = ProgressBar::new(plan.steps.len() as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        if let Ok(mut slot) = self.bar.lock() {
            *slot = Some(bar);
        }
    }

    fn on_state(&self, state: &EngineState) {
        let Some(bar) = self.current() else {
            return;
        };
        match state {
            EngineState::Executing { label, .. } => bar.set_message(label.clone()),
            EngineState::Committed { label } => {
                emit(&bar, format!("  ✓ {}", label));
                bar.inc(1);
            }
            EngineState::RolledBack { label } => {
                emit(&bar, format!("  ↺ {} (rolled back)", label));
            }
            EngineState::Failed { label } => {
                emit(&bar, format!("  ✗ {}", label));
                bar.abandon();
            }
            EngineState::Idle => bar.finish_and_clear(),
            EngineState::Planning => {}
        }
    }

    fn on_warning(&self, warning: &ConsistencyWarning) {
        self.line(format!("[warn] {}", warning));
    }

    fn on_statement(&self, step: &PlannedStep, index: usize, sql: &str) {
        if self.verbose {
            self.line(format!("[verbose] {} #{}: {}", step.label, index, sql));
        }
    }
}

/// Hidden bars (stderr is not a terminal) drop `println`, so fall back to
/// plain stderr.
fn emit(bar: &ProgressBar, msg: String) {
    if bar.is_hidden() {
        eprintln!("{}", msg);
    } else {
        bar.println(msg);
    }
}
