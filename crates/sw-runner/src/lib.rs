//! Stepwise execution engine.
//!
//! Plans runs against the version table, renders every statement up front
//! and executes units one at a time with per-unit transactions.

pub mod error;
pub mod observer;
pub mod plan;
pub mod report;
pub mod runner;
pub mod version_store;

pub use error::{PlanError, RunnerError, RunnerResult};
pub use observer::{EngineState, LogObserver, NoopObserver, RunObserver};
pub use plan::{
    ConsistencyWarning, Direction, PlannedStep, Planner, RunPlan, RunRequest, TagFilter,
    VersionAction,
};
pub use report::{
    AppliedStep, PreviewScript, PreviewStep, RunOutcome, RunReport, RunStatus, UnitFailure,
};
pub use runner::Runner;
pub use version_store::{VersionRecord, VersionStore};
