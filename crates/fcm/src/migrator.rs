//! # File Migration Job
//!
//! Opens an `.FCStd` container, runs the sequencer over its document pair and exports the
//! result. Nothing is written unless every unit in the plan succeeded.

use crate::config::MigratorConfig;
use crate::error::FcmError;
use fcm_container::{Compression, Container, ExportSummary};
use fcm_engine::{MigrationReport, Plan, Registry, Sequencer, Version};
use std::path::Path;
use tracing::{info, instrument};

/// A validated registry plus the export settings applied to every job.
#[derive(Debug)]
pub struct Migrator {
    registry: Registry,
    compression: Compression,
}

/// What a completed [`Migrator::migrate_file`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationOutcome {
    pub report: MigrationReport,
    pub export: ExportSummary,
}

impl Migrator {
    #[must_use]
    pub const fn new(registry: Registry, compression: Compression) -> Self {
        Self { registry, compression }
    }

    /// Discovers the built-in units under the configured root.
    ///
    /// # Errors
    /// [`FcmError::Migration`] when a unit breaks the contract.
    pub fn from_config(config: &MigratorConfig) -> Result<Self, FcmError> {
        let registry = fcm_migrations::registry_under(&config.migrations.root)?;
        Ok(Self::new(registry, config.export.compression))
    }

    #[must_use]
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Builds the plan for `input` without touching any file.
    ///
    /// # Errors
    /// [`FcmError::Container`] when the archive or its trees cannot be loaded,
    /// [`FcmError::Migration`] when the source version is absent or unreadable.
    #[instrument(skip_all, fields(input = %input.as_ref().display(), %target))]
    pub fn plan_file(&self, input: impl AsRef<Path>, target: &Version) -> Result<Plan<'_>, FcmError> {
        let pair = Container::open(input)?.load_pair()?;
        Ok(Sequencer::new(&self.registry).plan(&pair, target)?)
    }

    /// Migrates `input` to `target` and writes the result to `output`.
    ///
    /// `output` may equal `input`; the archive is replaced atomically.
    ///
    /// # Errors
    /// Any container or unit failure. On error `output` is left as it was.
    #[instrument(
        skip_all,
        fields(input = %input.as_ref().display(), output = %output.as_ref().display(), %target)
    )]
    pub fn migrate_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        target: &Version,
    ) -> Result<MigrationOutcome, FcmError> {
        let mut container = Container::open(input)?;
        let mut pair = container.load_pair()?;

        let report = Sequencer::new(&self.registry).run(&mut pair, target)?;
        let export = container.export(output, &pair, self.compression)?;

        info!(
            source = %report.source,
            direction = %report.direction,
            applied = report.applied.len(),
            "Document migrated"
        );
        Ok(MigrationOutcome { report, export })
    }
}
