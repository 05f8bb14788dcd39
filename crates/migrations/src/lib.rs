//! Built-in migration units.
//!
//! Every unit under [`units`] is listed in a catalog rendered by `cargo xtask codegen migrations`.
//! [`registry`] discovers the whole catalog; [`registry_under`] narrows discovery to a
//! subdirectory such as `units/freecad_1_0`.

mod generated;
pub mod units;

use fcm_engine::{MigrationError, Registry};
use std::path::Path;

pub use generated::catalog::CATALOG;

/// Discovery root of the built-in units, relative to this crate.
pub const DEFAULT_ROOT: &str = "units";

/// Registry of every built-in unit.
///
/// # Errors
/// [`MigrationError::ContractViolation`] when a unit's declaration is invalid or two units share a
/// name.
pub fn registry() -> Result<Registry, MigrationError> {
    registry_under(DEFAULT_ROOT)
}

/// Registry of the built-in units whose sources live under `root`.
///
/// # Errors
/// See [`registry`].
pub fn registry_under(root: impl AsRef<Path>) -> Result<Registry, MigrationError> {
    Registry::discover(CATALOG, root)
}
