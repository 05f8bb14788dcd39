//! # Migration Unit Contract
//!
//! A unit is a self-describing, bidirectional transformation tied to one FreeCAD format change.
//! Declarations are written with [`macro@crate::migration`], which checks their shape at compile
//! time; [`Metadata::validate`] re-checks them semantically when the registry is built so that
//! hand-written [`Declared`] impls obey the same rules.

use crate::error::{MigrationError, Violation};
use crate::version::Version;
use chrono::NaiveDate;
use std::fmt::Debug;
use xmltree::Element;

/// Raw, unvalidated metadata as declared on a unit type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Declaration {
    pub type_name: &'static str,
    pub name: Option<&'static str>,
    pub description: Option<&'static str>,
    /// Version at which the format change took effect.
    pub threshold: Option<&'static str>,
    /// `YYYY-MM-DD` date of the upstream change.
    pub introduced_on: Option<&'static str>,
    /// Identifier of the upstream change, typically a commit hash.
    pub change_id: Option<&'static str>,
}

pub trait Declared {
    fn declaration(&self) -> Declaration;
}

/// A bidirectional edit of a document pair.
///
/// `forward` lifts a document from below the unit's threshold to the threshold's format;
/// `backward` is its inverse. Either may fail, and the sequencer aborts the plan on the first
/// failure.
pub trait Migration: Declared + Debug + Send + Sync {
    /// # Errors
    /// Returns a [`MigrationError`] when the document cannot be upgraded.
    fn forward(&self, document: &mut Element, gui_document: &mut Element) -> Result<(), MigrationError>;

    /// # Errors
    /// Returns [`MigrationError::IncompatibleDowngrade`] when the edit has no older encoding.
    fn backward(&self, document: &mut Element, gui_document: &mut Element) -> Result<(), MigrationError>;
}

/// Validated unit metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub type_name: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub threshold: Version,
    pub introduced_on: NaiveDate,
    pub change_id: &'static str,
}

impl Metadata {
    /// Checks a declaration, reporting every failing field rather than the first one.
    ///
    /// # Errors
    /// Returns the list of violations when any field is missing or malformed.
    pub fn validate(declaration: &Declaration) -> Result<Self, Vec<Violation>> {
        let unit = declaration.type_name;
        let mut violations = Vec::new();

        let mut text = |field: &'static str, value: Option<&'static str>, allow_empty: bool| {
            match value {
                None => violations.push(Violation::new(unit, field, "missing")),
                Some(v) if !allow_empty && v.trim().is_empty() => {
                    violations.push(Violation::new(unit, field, "must not be empty"));
                },
                Some(v) => return Some(v),
            }
            None
        };

        let name = text("name", declaration.name, false);
        let description = text("description", declaration.description, true);
        let change_id = text("change_id", declaration.change_id, false);
        let threshold_raw = text("threshold", declaration.threshold, false);
        let date_raw = text("introduced_on", declaration.introduced_on, false);

        let threshold = threshold_raw.and_then(|raw| {
            Version::parse(raw)
                .map_err(|_| {
                    violations.push(Violation::new(unit, "threshold", format!("'{raw}' is not a version")));
                })
                .ok()
        });
        let introduced_on = date_raw.and_then(|raw| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| {
                    violations.push(Violation::new(unit, "introduced_on", format!("'{raw}' is not a YYYY-MM-DD date")));
                })
                .ok()
        });

        match (name, description, change_id, threshold, introduced_on) {
            (Some(name), Some(description), Some(change_id), Some(threshold), Some(introduced_on))
                if violations.is_empty() =>
            {
                Ok(Self { type_name: unit, name, description, threshold, introduced_on, change_id })
            },
            _ => Err(violations),
        }
    }

    /// Convenience wrapper turning violations into [`MigrationError::ContractViolation`].
    ///
    /// # Errors
    /// See [`Metadata::validate`].
    pub fn of(unit: &dyn Migration) -> Result<Self, MigrationError> {
        Self::validate(&unit.declaration())
            .map_err(|violations| MigrationError::ContractViolation { violations, context: None })
    }
}
