//! The execution engine.
//!
//! A run reads the applied set, plans and renders everything, then executes
//! one step at a time: open a transaction (when the dialect and unit allow
//! it), submit the statements, update the version table, commit. The first
//! failure rolls back the current step and halts the run.

use crate::error::{RunnerError, RunnerResult};
use crate::observer::{EngineState, NoopObserver, RunObserver};
use crate::plan::{PlannedStep, Planner, RunPlan, RunRequest, VersionAction};
use crate::report::{AppliedStep, PreviewScript, RunOutcome, RunReport, RunStatus, UnitFailure};
use crate::version_store::{VersionRecord, VersionStore};
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use sw_core::{MigrationSet, VersionTableConfig};
use sw_db::Processor;
use sw_sql::DialectProfile;
use uuid::Uuid;

pub struct Runner<'a> {
    processor: Arc<dyn Processor>,
    profile: &'static DialectProfile,
    migrations: &'a MigrationSet,
    store: VersionStore,
    observer: Arc<dyn RunObserver>,
    cancel: Arc<AtomicBool>,
}

impl<'a> Runner<'a> {
    /// Build a runner for the processor's dialect. Fails when the dialect
    /// profile is incomplete.
    pub fn new(processor: Arc<dyn Processor>, migrations: &'a MigrationSet) -> RunnerResult<Self> {
        let profile = DialectProfile::load(processor.dialect())?;
        Ok(Self {
            processor,
            profile,
            migrations,
            store: VersionStore::new(profile, &VersionTableConfig::default()),
            observer: Arc::new(NoopObserver),
            cancel: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn with_version_table(mut self, config: &VersionTableConfig) -> Self {
        self.store = VersionStore::new(self.profile, config);
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn RunObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Share an externally owned cancellation flag.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = flag;
        self
    }

    /// Setting this flag stops the run before the next step starts.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    pub fn profile(&self) -> &'static DialectProfile {
        self.profile
    }

    pub fn version_store(&self) -> &VersionStore {
        &self.store
    }

    /// Current version-table rows.
    pub async fn records(&self) -> RunnerResult<Vec<VersionRecord>> {
        self.store.records(self.processor.as_ref()).await
    }

    /// Read the applied set and build a rendered plan. Nothing executes.
    pub async fn plan(&self, request: &RunRequest) -> RunnerResult<RunPlan> {
        self.observer.on_state(&EngineState::Planning);
        self.store.check_generation()?;
        let applied = self.store.applied_versions(self.processor.as_ref()).await?;
        let plan = Planner::new(self.migrations, self.profile).plan(request, &applied);
        match plan {
            Ok(plan) => {
                for warning in &plan.warnings {
                    self.observer.on_warning(warning);
                }
                self.observer.on_plan(&plan);
                Ok(plan)
            }
            Err(err) => {
                self.observer.on_state(&EngineState::Idle);
                Err(RunnerError::Plan(err))
            }
        }
    }

    pub async fn run(&self, request: &RunRequest) -> RunnerResult<RunOutcome> {
        let started_at = Utc::now();
        let plan = self.plan(request).await?;

        if request.dry_run {
            self.observer.on_state(&EngineState::Idle);
            return Ok(RunOutcome::Preview(PreviewScript::from_plan(
                &plan,
                self.profile,
            )));
        }

        let mut report = RunReport {
            run_id: Uuid::new_v4(),
            direction: plan.direction,
            status: RunStatus::NoOp,
            units_applied: Vec::new(),
            failure: None,
            warnings: plan.warnings.clone(),
            started_at,
            finished_at: started_at,
        };

        if plan.is_empty() {
            log::info!("Nothing to {}; database is up to date", plan.direction);
            self.observer.on_state(&EngineState::Idle);
            report.finished_at = Utc::now();
            return Ok(RunOutcome::Applied(report));
        }

        self.store.ensure_initialized(self.processor.as_ref()).await?;

        report.status = RunStatus::Success;
        let total = plan.steps.len();
        for (index, step) in plan.steps.iter().enumerate() {
            if self.cancel.load(Ordering::SeqCst) {
                log::warn!("Run {} cancelled before {}", report.run_id, step.label);
                report.status = RunStatus::Cancelled;
                break;
            }

            self.observer.on_state(&EngineState::Executing {
                index,
                total,
                label: step.label.clone(),
            });
            match self.execute_step(step).await {
                Ok(()) => {
                    let label = step.label.clone();
                    self.observer.on_state(&EngineState::Committed { label });
                    report.units_applied.push(AppliedStep {
                        label: step.label.clone(),
                        version: step.version,
                        statements: step.statements.len(),
                    });
                }
                Err(failure) => {
                    if failure.rolled_back {
                        self.observer.on_state(&EngineState::RolledBack {
                            label: step.label.clone(),
                        });
                    }
                    self.observer.on_state(&EngineState::Failed {
                        label: step.label.clone(),
                    });
                    report.status = RunStatus::Failed;
                    report.failure = Some(failure);
                    break;
                }
            }
        }

        if report.status != RunStatus::Failed {
            self.observer.on_state(&EngineState::Idle);
        }
        report.finished_at = Utc::now();
        Ok(RunOutcome::Applied(report))
    }

    async fn execute_step(&self, step: &PlannedStep) -> Result<(), UnitFailure> {
        let processor = self.processor.as_ref();

        if step.transactional {
            if let Err(err) = processor.begin_transaction().await {
                return Err(self.failure(step, 0, err.to_string(), false));
            }
        } else {
            log::debug!("{} runs without a transaction", step.label);
        }

        for (index, sql) in step.statements.iter().enumerate() {
            self.observer.on_statement(step, index, sql);
            if let Err(err) = processor.execute(sql).await {
                return Err(self.abort(step, index, err.to_string()).await);
            }
        }

        let bookkeeping_index = step.statements.len();
        let bookkeeping = match &step.action {
            VersionAction::Record {
                version,
                description,
            } => self.store.record_applied(processor, *version, description).await,
            VersionAction::Remove { version } => {
                self.store.record_reverted(processor, *version).await
            }
            VersionAction::None => Ok(()),
        };
        if let Err(err) = bookkeeping {
            return Err(self.abort(step, bookkeeping_index, err.to_string()).await);
        }

        if step.transactional {
            if let Err(err) = processor.commit().await {
                return Err(self.abort(step, bookkeeping_index, err.to_string()).await);
            }
        }
        Ok(())
    }

    /// Roll back the open transaction, if any, and describe the failure.
    async fn abort(&self, step: &PlannedStep, index: usize, message: String) -> UnitFailure {
        let rolled_back = if step.transactional {
            match self.processor.rollback().await {
                Ok(()) => true,
                Err(err) => {
                    log::error!("Rollback of {} failed: {}", step.label, err);
                    false
                }
            }
        } else {
            false
        };
        self.failure(step, index, message, rolled_back)
    }

    fn failure(
        &self,
        step: &PlannedStep,
        statement_index: usize,
        message: String,
        rolled_back: bool,
    ) -> UnitFailure {
        log::error!(
            "{} failed at statement {}: {}",
            step.label,
            statement_index,
            message
        );
        UnitFailure {
            unit: step.label.clone(),
            version: step.version,
            statement_index,
            message,
            rolled_back,
        }
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
