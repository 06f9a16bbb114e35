//! Migration units and the registry handed to the runner.

use crate::error::{CoreError, CoreResult, ValidationRule};
use crate::expression::SchemaExpression;
use crate::newtype_string::define_newtype_string;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

define_newtype_string! {
    /// A label used to select subsets of units at run time.
    pub struct Tag;
}

/// Orderable unit version. `0` is reserved for "nothing applied".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MigrationVersion(i64);

impl MigrationVersion {
    pub const ZERO: MigrationVersion = MigrationVersion(0);

    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> i64 {
        self.0
    }

    fn validate(self, object: &str) -> CoreResult<()> {
        if self.0 <= 0 {
            return Err(CoreError::validation(
                ValidationRule::PositiveVersion,
                object,
                format!("version {} must be greater than zero", self.0),
            ));
        }
        Ok(())
    }
}

impl From<i64> for MigrationVersion {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for MigrationVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether a unit runs inside its own transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionBehavior {
    #[default]
    Default,
    None,
}

/// A versioned, ordered set of schema changes with an optional reverse.
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationUnit {
    version: MigrationVersion,
    description: String,
    up: Vec<SchemaExpression>,
    down: Option<Vec<SchemaExpression>>,
    tags: BTreeSet<Tag>,
    transaction: TransactionBehavior,
}

impl MigrationUnit {
    pub fn builder(version: i64) -> MigrationUnitBuilder {
        MigrationUnitBuilder {
            version: MigrationVersion(version),
            description: String::new(),
            up: Vec::new(),
            down: None,
            tags: BTreeSet::new(),
            transaction: TransactionBehavior::Default,
        }
    }

    pub fn version(&self) -> MigrationVersion {
        self.version
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn up(&self) -> &[SchemaExpression] {
        &self.up
    }

    /// `None` marks the unit irreversible.
    pub fn down(&self) -> Option<&[SchemaExpression]> {
        self.down.as_deref()
    }

    pub fn is_reversible(&self) -> bool {
        self.down.is_some()
    }

    pub fn tags(&self) -> &BTreeSet<Tag> {
        &self.tags
    }

    pub fn transaction(&self) -> TransactionBehavior {
        self.transaction
    }

    /// `"3 create orders"`, or just the version when undescribed.
    pub fn label(&self) -> String {
        if self.description.is_empty() {
            self.version.to_string()
        } else {
            format!("{} {}", self.version, self.description)
        }
    }
}

#[derive(Debug, Clone)]
pub struct MigrationUnitBuilder {
    version: MigrationVersion,
    description: String,
    up: Vec<SchemaExpression>,
    down: Option<Vec<SchemaExpression>>,
    tags: BTreeSet<Tag>,
    transaction: TransactionBehavior,
}

impl MigrationUnitBuilder {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn up(mut self, expression: SchemaExpression) -> Self {
        self.up.push(expression);
        self
    }

    /// Adding any down expression makes the unit reversible.
    pub fn down(mut self, expression: SchemaExpression) -> Self {
        self.down.get_or_insert_with(Vec::new).push(expression);
        self
    }

    /// Mark the unit reversible with an empty down list (a no-op revert).
    pub fn reversible(mut self) -> Self {
        self.down.get_or_insert_with(Vec::new);
        self
    }

    pub fn tag(mut self, tag: Tag) -> Self {
        self.tags.insert(tag);
        self
    }

    pub fn transaction(mut self, behavior: TransactionBehavior) -> Self {
        self.transaction = behavior;
        self
    }

    pub fn build(self) -> CoreResult<MigrationUnit> {
        let object = format!("migration {}", self.version);
        self.version.validate(&object)?;
        if self.up.is_empty() {
            return Err(CoreError::validation(
                ValidationRule::UnitHasUp,
                object,
                "a unit needs at least one up expression",
            ));
        }
        for expression in self.up.iter().chain(self.down.iter().flatten()) {
            expression.validate()?;
        }
        Ok(MigrationUnit {
            version: self.version,
            description: self.description,
            up: self.up,
            down: self.down,
            tags: self.tags,
            transaction: self.transaction,
        })
    }
}

/// When a maintenance unit runs relative to the versioned units of an up run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceStage {
    BeforeAll,
    AfterAll,
}

impl fmt::Display for MaintenanceStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaintenanceStage::BeforeAll => f.write_str("before_all"),
            MaintenanceStage::AfterAll => f.write_str("after_all"),
        }
    }
}

/// Unversioned (or optionally versioned) unit run around every non-empty up run.
#[derive(Debug, Clone, PartialEq)]
pub struct MaintenanceUnit {
    stage: MaintenanceStage,
    description: String,
    expressions: Vec<SchemaExpression>,
    tags: BTreeSet<Tag>,
    transaction: TransactionBehavior,
    version: Option<MigrationVersion>,
}

impl MaintenanceUnit {
    pub fn builder(stage: MaintenanceStage) -> MaintenanceUnitBuilder {
        MaintenanceUnitBuilder {
            inner: MaintenanceUnit {
                stage,
                description: String::new(),
                expressions: Vec::new(),
                tags: BTreeSet::new(),
                transaction: TransactionBehavior::Default,
                version: None,
            },
        }
    }

    pub fn stage(&self) -> MaintenanceStage {
        self.stage
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn expressions(&self) -> &[SchemaExpression] {
        &self.expressions
    }

    pub fn tags(&self) -> &BTreeSet<Tag> {
        &self.tags
    }

    pub fn transaction(&self) -> TransactionBehavior {
        self.transaction
    }

    /// Only versioned maintenance units are written to the version table.
    pub fn version(&self) -> Option<MigrationVersion> {
        self.version
    }

    pub fn label(&self) -> String {
        if self.description.is_empty() {
            format!("{} maintenance", self.stage)
        } else {
            format!("{} {}", self.stage, self.description)
        }
    }
}

#[derive(Debug, Clone)]
pub struct MaintenanceUnitBuilder {
    inner: MaintenanceUnit,
}

impl MaintenanceUnitBuilder {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.inner.description = description.into();
        self
    }

    pub fn expression(mut self, expression: SchemaExpression) -> Self {
        self.inner.expressions.push(expression);
        self
    }

    pub fn tag(mut self, tag: Tag) -> Self {
        self.inner.tags.insert(tag);
        self
    }

    pub fn transaction(mut self, behavior: TransactionBehavior) -> Self {
        self.inner.transaction = behavior;
        self
    }

    pub fn version(mut self, version: i64) -> Self {
        self.inner.version = Some(MigrationVersion(version));
        self
    }

    pub fn build(self) -> CoreResult<MaintenanceUnit> {
        let object = format!("{} maintenance", self.inner.stage);
        if let Some(version) = self.inner.version {
            version.validate(&object)?;
        }
        if self.inner.expressions.is_empty() {
            return Err(CoreError::validation(
                ValidationRule::MaintenanceStage,
                object,
                "a maintenance unit needs at least one expression",
            ));
        }
        for expression in &self.inner.expressions {
            expression.validate()?;
        }
        Ok(self.inner)
    }
}

/// Explicit registry of every discovered unit.
///
/// Units are kept in registration order; ordering by version and the
/// duplicate check belong to planning.
#[derive(Debug, Clone, Default)]
pub struct MigrationSet {
    units: Vec<MigrationUnit>,
    maintenance: Vec<MaintenanceUnit>,
}

impl MigrationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, unit: MigrationUnit) -> Self {
        self.units.push(unit);
        self
    }

    pub fn with_maintenance(mut self, unit: MaintenanceUnit) -> Self {
        self.maintenance.push(unit);
        self
    }

    pub fn push(&mut self, unit: MigrationUnit) {
        self.units.push(unit);
    }

    pub fn push_maintenance(&mut self, unit: MaintenanceUnit) {
        self.maintenance.push(unit);
    }

    pub fn units(&self) -> &[MigrationUnit] {
        &self.units
    }

    pub fn maintenance(&self) -> &[MaintenanceUnit] {
        &self.maintenance
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn get(&self, version: MigrationVersion) -> Option<&MigrationUnit> {
        self.units.iter().find(|u| u.version() == version)
    }

    /// Versions registered more than once, ascending.
    pub fn duplicate_versions(&self) -> Vec<MigrationVersion> {
        let mut counts: BTreeMap<MigrationVersion, usize> = BTreeMap::new();
        for unit in &self.units {
            *counts.entry(unit.version()).or_default() += 1;
        }
        counts
            .into_iter()
            .filter(|(_, n)| *n > 1)
            .map(|(v, _)| v)
            .collect()
    }

    /// Units sorted by ascending version.
    pub fn sorted(&self) -> Vec<&MigrationUnit> {
        let mut units: Vec<&MigrationUnit> = self.units.iter().collect();
        units.sort_by_key(|u| u.version());
        units
    }
}

impl FromIterator<MigrationUnit> for MigrationSet {
    fn from_iter<T: IntoIterator<Item = MigrationUnit>>(iter: T) -> Self {
        Self {
            units: iter.into_iter().collect(),
            maintenance: Vec::new(),
        }
    }
}

#[cfg(test)]
#[path = "migration_test.rs"]
mod tests;
