//! # Unit Registry
//!
//! Units are compiled in, so "discovery" selects from a static catalog that the `xtask codegen
//! migrations` command renders from the unit sources. Each [`CatalogEntry`] remembers the source
//! path it was generated from, and [`Registry::discover`] applies the directory policy to those
//! paths: everything under the requested root, skipping reserved (`__`-prefixed) names and
//! anything that is not a unit source file.

use crate::error::{MigrationError, Violation};
use crate::unit::{Metadata, Migration};
use fxhash::FxHashSet;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

/// Name prefix that excludes a file or directory from discovery.
pub const RESERVED_PREFIX: &str = "__";
/// Extension of unit source files.
pub const UNIT_EXTENSION: &str = "rs";

/// One generated catalog row.
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    /// Source path relative to the migrations crate, with `/` separators.
    pub path: &'static str,
    pub type_name: &'static str,
    pub factory: fn() -> Box<dyn Migration>,
}

/// Catalog factory for any default-constructible unit.
#[must_use]
pub fn instantiate<T: Migration + Default + 'static>() -> Box<dyn Migration> {
    Box::new(T::default())
}

/// A unit paired with its validated metadata.
#[derive(Debug)]
pub struct RegisteredMigration {
    pub metadata: Metadata,
    pub unit: Box<dyn Migration>,
}

/// Contract-checked set of migration units with unique names.
#[derive(Debug, Default)]
pub struct Registry {
    units: Vec<RegisteredMigration>,
}

impl Registry {
    /// Validates and registers `units`.
    ///
    /// # Errors
    /// [`MigrationError::ContractViolation`] listing every violation across all units, including
    /// duplicate names.
    pub fn from_units(units: Vec<Box<dyn Migration>>) -> Result<Self, MigrationError> {
        let mut violations = Vec::new();
        let mut registered = Vec::with_capacity(units.len());
        let mut names = FxHashSet::default();

        for unit in units {
            match Metadata::validate(&unit.declaration()) {
                Ok(metadata) => {
                    if !names.insert(metadata.name) {
                        violations.push(Violation::new(
                            metadata.type_name,
                            "name",
                            format!("'{}' is already registered", metadata.name),
                        ));
                        continue;
                    }
                    debug!(unit = metadata.name, threshold = %metadata.threshold, "Migration registered");
                    registered.push(RegisteredMigration { metadata, unit });
                },
                Err(found) => violations.extend(found),
            }
        }

        if !violations.is_empty() {
            return Err(MigrationError::ContractViolation { violations, context: None });
        }

        Ok(Self { units: registered })
    }

    /// Instantiates every catalog unit whose source lives under `root`.
    ///
    /// # Errors
    /// See [`Registry::from_units`].
    pub fn discover(catalog: &[CatalogEntry], root: impl AsRef<Path>) -> Result<Self, MigrationError> {
        let root = normalize(root.as_ref());

        let units: Vec<Box<dyn Migration>> = catalog
            .iter()
            .filter(|entry| {
                let selected = is_discoverable(&root, Path::new(entry.path));
                if !selected {
                    debug!(path = entry.path, unit = entry.type_name, "Catalog entry skipped");
                }
                selected
            })
            .map(|entry| (entry.factory)())
            .collect();

        let registry = Self::from_units(units)?;
        info!(root = %root.display(), units = registry.len(), "Migration units discovered");
        Ok(registry)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegisteredMigration> {
        self.units.iter()
    }

    /// Looks a unit up by its declared name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RegisteredMigration> {
        self.units.iter().find(|registered| registered.metadata.name == name)
    }
}

impl<'r> IntoIterator for &'r Registry {
    type Item = &'r RegisteredMigration;
    type IntoIter = std::slice::Iter<'r, RegisteredMigration>;

    fn into_iter(self) -> Self::IntoIter {
        self.units.iter()
    }
}

fn is_discoverable(root: &Path, path: &Path) -> bool {
    let path = normalize(path);
    let Ok(relative) = path.strip_prefix(normalize(root)) else {
        return false;
    };

    let reserved = relative.components().any(|component| {
        component.as_os_str().to_str().is_some_and(|name| name.starts_with(RESERVED_PREFIX))
    });

    !reserved && path.extension().is_some_and(|ext| ext == UNIT_EXTENSION)
}

/// Drops `.` components so `./units` and `units` select the same entries.
fn normalize(path: &Path) -> PathBuf {
    path.components().filter(|component| !matches!(component, Component::CurDir)).collect()
}
