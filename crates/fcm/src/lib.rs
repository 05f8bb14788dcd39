//! Facade crate for the FCStd migrator.
//! Re-exports the engine, the container and the built-in units, and composes them into a
//! single file migration job. Keep this crate thin: migration logic belongs to the engine and
//! the units.
//!
//! ## Usage
//! ```rust,no_run
//! use fcm::config::{MigratorConfig, load_config};
//! use fcm::{FcmError, Migrator, Version};
//!
//! fn upgrade() -> Result<(), FcmError> {
//!     let config: MigratorConfig = load_config(None::<&str>)?;
//!     let migrator = Migrator::from_config(&config)?;
//!     let target = Version::parse("1.1")?;
//!     migrator.migrate_file("Part.FCStd", "Part-1.1.FCStd", &target)?;
//!     Ok(())
//! }
//! ```

pub mod config;
mod error;
mod migrator;

pub use error::{FcmError, FcmErrorExt};
pub use migrator::{MigrationOutcome, Migrator};

pub use fcm_container as container;
pub use fcm_engine as engine;
pub use fcm_migrations as migrations;

pub use fcm_container::{Compression, ExportSummary};
pub use fcm_engine::{Direction, MigrationError, MigrationReport, Plan, Registry, Version};
