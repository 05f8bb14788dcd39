//! # Migration Sequencer
//!
//! Selects, orders and applies the registered units for a single source → target request.
//!
//! Units are totally ordered by `(introduced_on, threshold, name)`. A forward plan scans that
//! order ascending and keeps units whose threshold lies above the source; a backward plan scans
//! it descending and keeps units whose threshold lies below the source. Finalization stamps the
//! target version on both trees only after every step succeeded.

use crate::document::DocumentPair;
use crate::error::MigrationError;
use crate::registry::{RegisteredMigration, Registry};
use crate::version::Version;
use std::fmt;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Backward,
    /// Source and target are equal; only the version stamp is rewritten.
    Unchanged,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Forward => "forward",
            Self::Backward => "backward",
            Self::Unchanged => "unchanged",
        })
    }
}

/// The ordered, direction-specific units selected for one request. Immutable once built.
#[derive(Debug)]
pub struct Plan<'r> {
    source: Version,
    target: Version,
    direction: Direction,
    steps: Vec<&'r RegisteredMigration>,
}

impl<'r> Plan<'r> {
    #[must_use]
    pub fn build(registry: &'r Registry, source: Version, target: Version) -> Self {
        let direction = match target.cmp(&source) {
            std::cmp::Ordering::Greater => Direction::Forward,
            std::cmp::Ordering::Less => Direction::Backward,
            std::cmp::Ordering::Equal => Direction::Unchanged,
        };

        let mut ordered: Vec<&RegisteredMigration> = registry.iter().collect();
        ordered.sort_by(|a, b| {
            let (a, b) = (&a.metadata, &b.metadata);
            a.introduced_on
                .cmp(&b.introduced_on)
                .then_with(|| a.threshold.cmp(&b.threshold))
                .then_with(|| a.name.cmp(b.name))
        });

        let steps: Vec<_> = match direction {
            Direction::Forward => {
                ordered.into_iter().filter(|unit| source < unit.metadata.threshold).collect()
            },
            Direction::Backward => {
                ordered.into_iter().rev().filter(|unit| source > unit.metadata.threshold).collect()
            },
            Direction::Unchanged => Vec::new(),
        };

        debug!(%source, %target, %direction, steps = steps.len(), "Migration plan built");
        Self { source, target, direction, steps }
    }

    #[must_use]
    pub const fn source(&self) -> &Version {
        &self.source
    }

    #[must_use]
    pub const fn target(&self) -> &Version {
        &self.target
    }

    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn steps(&self) -> &[&'r RegisteredMigration] {
        &self.steps
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Applies every step in order, then stamps the target version.
    ///
    /// # Errors
    /// The first unit error, unchanged. Later steps are not run and the version is not stamped,
    /// so the pair must be discarded.
    pub fn execute(self, pair: &mut DocumentPair) -> Result<MigrationReport, MigrationError> {
        let mut applied = Vec::with_capacity(self.steps.len());

        for registered in &self.steps {
            let metadata = &registered.metadata;
            let step = match self.direction {
                Direction::Backward => {
                    registered.unit.backward(&mut pair.document, &mut pair.gui_document)
                },
                _ => registered.unit.forward(&mut pair.document, &mut pair.gui_document),
            };

            if let Err(err) = step {
                warn!(
                    unit = metadata.name,
                    direction = %self.direction,
                    kind = err.kind(),
                    "Migration step failed, aborting plan"
                );
                return Err(err);
            }

            info!(
                unit = metadata.name,
                direction = %self.direction,
                change_id = metadata.change_id,
                "Migration applied"
            );
            applied.push(AppliedMigration {
                name: metadata.name,
                change_id: metadata.change_id,
                threshold: metadata.threshold.clone(),
            });
        }

        pair.stamp_version(&self.target);

        Ok(MigrationReport {
            source: self.source,
            target: self.target,
            direction: self.direction,
            applied,
        })
    }
}

/// Entry point tying a registry to migration requests.
#[derive(Debug, Clone, Copy)]
pub struct Sequencer<'r> {
    registry: &'r Registry,
}

impl<'r> Sequencer<'r> {
    #[must_use]
    pub const fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    /// Plans a migration of `pair` to `target` without touching it.
    ///
    /// # Errors
    /// When the pair's source version is missing or unparseable.
    pub fn plan(&self, pair: &DocumentPair, target: &Version) -> Result<Plan<'r>, MigrationError> {
        let source = pair.source_version()?;
        Ok(Plan::build(self.registry, source, target.clone()))
    }

    /// Plans and executes a migration of `pair` to `target`.
    ///
    /// # Errors
    /// See [`Sequencer::plan`] and [`Plan::execute`].
    pub fn run(&self, pair: &mut DocumentPair, target: &Version) -> Result<MigrationReport, MigrationError> {
        self.plan(pair, target)?.execute(pair)
    }
}

/// A unit that ran as part of a successful plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedMigration {
    pub name: &'static str,
    pub change_id: &'static str,
    pub threshold: Version,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    pub source: Version,
    pub target: Version,
    pub direction: Direction,
    pub applied: Vec<AppliedMigration>,
}

impl MigrationReport {
    /// Names of the applied units, in application order.
    pub fn applied_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.applied.iter().map(|applied| applied.name)
    }
}
