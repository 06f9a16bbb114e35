//! Run planning: which units run, in which order, with which SQL.
//!
//! Planning is pure. It takes the registry, the dialect profile and the
//! applied-version set, and produces a fully rendered [`RunPlan`] or a
//! [`PlanError`] before anything touches the database.

use crate::error::PlanError;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use sw_core::{
    MaintenanceStage, MaintenanceUnit, MigrationSet, MigrationUnit, MigrationVersion,
    SchemaExpression, Tag, TransactionBehavior,
};
use sw_sql::{generate, DialectProfile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// Requested tags. A unit matches when it is untagged or carries every
/// requested tag; an empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagFilter(BTreeSet<Tag>);

impl TagFilter {
    pub fn new(tags: impl IntoIterator<Item = Tag>) -> Self {
        Self(tags.into_iter().collect())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn matches(&self, tags: &BTreeSet<Tag>) -> bool {
        tags.is_empty() || self.0.iter().all(|t| tags.contains(t))
    }
}

/// One invocation of the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub direction: Direction,
    pub target: Option<MigrationVersion>,
    pub tags: TagFilter,
    pub dry_run: bool,
}

impl RunRequest {
    pub fn up() -> Self {
        Self {
            direction: Direction::Up,
            target: None,
            tags: TagFilter::default(),
            dry_run: false,
        }
    }

    pub fn down() -> Self {
        Self {
            direction: Direction::Down,
            ..Self::up()
        }
    }

    pub fn to(mut self, target: i64) -> Self {
        self.target = Some(MigrationVersion::new(target));
        self
    }

    pub fn with_tags(mut self, tags: impl IntoIterator<Item = Tag>) -> Self {
        self.tags = TagFilter::new(tags);
        self
    }

    pub fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }
}

/// What a step does to the version table once its statements succeed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum VersionAction {
    Record {
        version: MigrationVersion,
        description: String,
    },
    Remove {
        version: MigrationVersion,
    },
    None,
}

/// A unit with its statements already rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedStep {
    pub label: String,
    pub version: Option<MigrationVersion>,
    pub stage: Option<MaintenanceStage>,
    pub direction: Direction,
    pub statements: Vec<String>,
    pub action: VersionAction,
    /// Run inside a transaction; false when the dialect or unit opts out
    pub transactional: bool,
}

/// Non-blocking observations about the applied-version set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConsistencyWarning {
    /// Recorded as applied, but no discovered unit has this version
    UnknownAppliedVersion { version: MigrationVersion },
    /// Pending, yet older than the newest applied version
    OutOfOrder {
        version: MigrationVersion,
        newest_applied: MigrationVersion,
    },
}

impl fmt::Display for ConsistencyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsistencyWarning::UnknownAppliedVersion { version } => write!(
                f,
                "version {version} is recorded as applied but no migration defines it"
            ),
            ConsistencyWarning::OutOfOrder {
                version,
                newest_applied,
            } => write!(
                f,
                "version {version} is pending but older than applied version {newest_applied}"
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunPlan {
    pub direction: Direction,
    pub steps: Vec<PlannedStep>,
    pub warnings: Vec<ConsistencyWarning>,
}

impl RunPlan {
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn statement_count(&self) -> usize {
        self.steps.iter().map(|s| s.statements.len()).sum()
    }
}

/// A unit selected for a down run.
enum DownCandidate<'a> {
    Unit(&'a MigrationUnit),
    Maintenance(&'a MaintenanceUnit, MigrationVersion),
}

impl DownCandidate<'_> {
    fn version(&self) -> MigrationVersion {
        match self {
            DownCandidate::Unit(unit) => unit.version(),
            DownCandidate::Maintenance(_, version) => *version,
        }
    }
}

/// Builds a [`RunPlan`] for one dialect.
pub struct Planner<'a> {
    migrations: &'a MigrationSet,
    profile: &'a DialectProfile,
}

impl<'a> Planner<'a> {
    pub fn new(migrations: &'a MigrationSet, profile: &'a DialectProfile) -> Self {
        Self {
            migrations,
            profile,
        }
    }

    pub fn plan(
        &self,
        request: &RunRequest,
        applied: &BTreeSet<MigrationVersion>,
    ) -> Result<RunPlan, PlanError> {
        self.check_versions()?;

        if let Some(target) = request.target {
            if target != MigrationVersion::ZERO && !self.is_known(target) {
                return Err(PlanError::TargetNotFound { target });
            }
        }

        let mut steps = Vec::new();
        match request.direction {
            Direction::Up => {
                let selected = self.select_up(request, applied);
                log::debug!(
                    "Planned {} up unit(s) against {} applied version(s)",
                    selected.len(),
                    applied.len()
                );
                if !selected.is_empty() {
                    for unit in self.maintenance(MaintenanceStage::BeforeAll, request, applied) {
                        steps.push(self.maintenance_step(unit)?);
                    }
                    for unit in &selected {
                        steps.push(self.unit_step(unit, Direction::Up)?);
                    }
                    for unit in self.maintenance(MaintenanceStage::AfterAll, request, applied) {
                        steps.push(self.maintenance_step(unit)?);
                    }
                }
            }
            Direction::Down => {
                let selected = self.select_down(request, applied)?;
                log::debug!(
                    "Planned {} down step(s) against {} applied version(s)",
                    selected.len(),
                    applied.len()
                );
                for candidate in selected {
                    steps.push(match candidate {
                        DownCandidate::Unit(unit) => self.unit_step(unit, Direction::Down)?,
                        DownCandidate::Maintenance(unit, version) => {
                            self.forget_maintenance_step(unit, version)
                        }
                    });
                }
            }
        }

        Ok(RunPlan {
            direction: request.direction,
            steps,
            warnings: self.warnings(applied),
        })
    }

    fn is_known(&self, version: MigrationVersion) -> bool {
        self.migrations.get(version).is_some()
            || self.migrations.maintenance().iter().any(|m| m.version() == Some(version))
    }

    fn check_versions(&self) -> Result<(), PlanError> {
        if let Some(version) = self.migrations.duplicate_versions().into_iter().next() {
            return Err(PlanError::DuplicateVersion { version });
        }
        let mut seen: BTreeSet<MigrationVersion> =
            self.migrations.units().iter().map(|u| u.version()).collect();
        for unit in self.migrations.maintenance() {
            if let Some(version) = unit.version() {
                if !seen.insert(version) {
                    return Err(PlanError::DuplicateVersion { version });
                }
            }
        }
        Ok(())
    }

    fn select_up(
        &self,
        request: &RunRequest,
        applied: &BTreeSet<MigrationVersion>,
    ) -> Vec<&'a MigrationUnit> {
        self.migrations
            .sorted()
            .into_iter()
            .filter(|u| !applied.contains(&u.version()))
            .filter(|u| request.target.map_or(true, |t| u.version() <= t))
            .filter(|u| request.tags.matches(u.tags()))
            .collect()
    }

    /// Applied versioned units above the target, newest first. Versioned
    /// maintenance units take part so that their records are removed too.
    fn select_down(
        &self,
        request: &RunRequest,
        applied: &BTreeSet<MigrationVersion>,
    ) -> Result<Vec<DownCandidate<'a>>, PlanError> {
        let mut candidates: Vec<DownCandidate<'a>> = self
            .migrations
            .units()
            .iter()
            .filter(|u| request.tags.matches(u.tags()))
            .map(DownCandidate::Unit)
            .chain(
                self.migrations
                    .maintenance()
                    .iter()
                    .filter(|m| request.tags.matches(m.tags()))
                    .filter_map(|m| m.version().map(|v| DownCandidate::Maintenance(m, v))),
            )
            .filter(|c| applied.contains(&c.version()))
            .collect();
        candidates.sort_by(|a, b| b.version().cmp(&a.version()));

        match request.target {
            Some(target) => candidates.retain(|c| c.version() > target),
            None => candidates.truncate(1),
        }

        for candidate in &candidates {
            if let DownCandidate::Unit(unit) = candidate {
                if !unit.is_reversible() {
                    return Err(PlanError::IrreversibleMigration {
                        unit: unit.label(),
                        version: unit.version(),
                    });
                }
            }
        }
        Ok(candidates)
    }

    fn maintenance(
        &self,
        stage: MaintenanceStage,
        request: &RunRequest,
        applied: &'_ BTreeSet<MigrationVersion>,
    ) -> Vec<&'a MaintenanceUnit> {
        self.migrations
            .maintenance()
            .iter()
            .filter(|m| m.stage() == stage)
            .filter(|m| request.tags.matches(m.tags()))
            .filter(|m| m.version().map_or(true, |v| !applied.contains(&v)))
            .collect()
    }

    fn render(
        &self,
        label: &str,
        expressions: &[SchemaExpression],
    ) -> Result<Vec<String>, PlanError> {
        let mut statements = Vec::new();
        for (index, expr) in expressions.iter().enumerate() {
            let rendered = generate(expr, self.profile).map_err(|source| PlanError::Generation {
                unit: label.to_string(),
                index,
                source,
            })?;
            statements.extend(rendered);
        }
        Ok(statements)
    }

    fn transactional(&self, behavior: TransactionBehavior) -> bool {
        self.profile.transactional_ddl && behavior == TransactionBehavior::Default
    }

    fn unit_step(
        &self,
        unit: &MigrationUnit,
        direction: Direction,
    ) -> Result<PlannedStep, PlanError> {
        let label = unit.label();
        let (expressions, action) = match direction {
            Direction::Up => (
                unit.up(),
                VersionAction::Record {
                    version: unit.version(),
                    description: unit.description().to_string(),
                },
            ),
            Direction::Down => (
                unit.down().ok_or_else(|| PlanError::IrreversibleMigration {
                    unit: label.clone(),
                    version: unit.version(),
                })?,
                VersionAction::Remove {
                    version: unit.version(),
                },
            ),
        };
        Ok(PlannedStep {
            statements: self.render(&label, expressions)?,
            label,
            version: Some(unit.version()),
            stage: None,
            direction,
            action,
            transactional: self.transactional(unit.transaction()),
        })
    }

    fn maintenance_step(&self, unit: &MaintenanceUnit) -> Result<PlannedStep, PlanError> {
        let label = unit.label();
        let action = match unit.version() {
            Some(version) => VersionAction::Record {
                version,
                description: unit.description().to_string(),
            },
            None => VersionAction::None,
        };
        Ok(PlannedStep {
            statements: self.render(&label, unit.expressions())?,
            label,
            version: unit.version(),
            stage: Some(unit.stage()),
            direction: Direction::Up,
            action,
            transactional: self.transactional(unit.transaction()),
        })
    }

    /// Maintenance has no down expressions; reverting one only drops its record
    /// so that the next up run executes it again.
    fn forget_maintenance_step(
        &self,
        unit: &MaintenanceUnit,
        version: MigrationVersion,
    ) -> PlannedStep {
        PlannedStep {
            label: unit.label(),
            version: Some(version),
            stage: Some(unit.stage()),
            direction: Direction::Down,
            statements: Vec::new(),
            action: VersionAction::Remove { version },
            transactional: self.transactional(unit.transaction()),
        }
    }

    fn warnings(&self, applied: &BTreeSet<MigrationVersion>) -> Vec<ConsistencyWarning> {
        let known: BTreeSet<MigrationVersion> = self
            .migrations
            .units()
            .iter()
            .map(|u| u.version())
            .chain(self.migrations.maintenance().iter().filter_map(|m| m.version()))
            .collect();

        let mut warnings: Vec<ConsistencyWarning> = applied
            .iter()
            .filter(|v| !known.contains(*v))
            .map(|&version| ConsistencyWarning::UnknownAppliedVersion { version })
            .collect();

        let newest_applied = self
            .migrations
            .units()
            .iter()
            .map(|u| u.version())
            .filter(|v| applied.contains(v))
            .max();
        if let Some(newest_applied) = newest_applied {
            warnings.extend(
                self.migrations
                    .sorted()
                    .into_iter()
                    .map(|u| u.version())
                    .filter(|v| !applied.contains(v) && *v < newest_applied)
                    .map(|version| ConsistencyWarning::OutOfOrder {
                        version,
                        newest_applied,
                    }),
            );
        }
        warnings
    }
}

#[cfg(test)]
#[path = "plan_test.rs"]
mod tests;
