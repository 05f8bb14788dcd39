//! # Migration Errors
//!
//! [`MigrationError`] covers every failure the engine surfaces: version parsing, contract
//! validation at registry build, and failures raised by migration units while a plan runs.

use std::borrow::Cow;
use std::fmt;

/// A single contract breach found while validating a unit declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Rust type name of the offending unit.
    pub unit: Cow<'static, str>,
    /// Declaration field that failed validation.
    pub field: &'static str,
    pub reason: Cow<'static, str>,
}

impl Violation {
    pub fn new(
        unit: impl Into<Cow<'static, str>>,
        field: &'static str,
        reason: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self { unit: unit.into(), field, reason: reason.into() }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}: {}", self.unit, self.field, self.reason)
    }
}

/// Errors produced by the migration engine and by migration units.
#[fcm_derive::fcm_error]
pub enum MigrationError {
    /// The version string matched none of the supported encodings.
    #[error("Unrecognized version format{}: '{raw}'", format_context(.context))]
    UnrecognizedVersion { raw: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The primary tree root carries no version attribute.
    #[error("Missing version{}: <{element}> has no `{attribute}` attribute", format_context(.context))]
    MissingVersion {
        element: Cow<'static, str>,
        attribute: &'static str,
        context: Option<Cow<'static, str>>,
    },

    /// One or more units do not satisfy the migration unit contract.
    #[error("Contract violation{}: {}", format_context(.context), format_violations(.violations))]
    ContractViolation { violations: Vec<Violation>, context: Option<Cow<'static, str>> },

    /// A backward step cannot be inverted without losing information.
    #[error("Incompatible downgrade{} in '{unit}': {message}", format_context(.context))]
    IncompatibleDowngrade {
        unit: Cow<'static, str>,
        message: Cow<'static, str>,
        context: Option<Cow<'static, str>>,
    },

    /// A unit found content it must read in an unexpected shape.
    #[error("Invalid document{}: {message}", format_context(.context))]
    InvalidDocument { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal migrator error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl MigrationError {
    /// Shorthand for units refusing a backward step.
    pub fn incompatible_downgrade(
        unit: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::IncompatibleDowngrade { unit: unit.into(), message: message.into(), context: None }
    }

    pub fn invalid_document(message: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidDocument { message: message.into(), context: None }
    }

    /// The violations carried by a [`MigrationError::ContractViolation`], empty otherwise.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::ContractViolation { violations, .. } => violations,
            _ => &[],
        }
    }
}

fn format_violations(violations: &[Violation]) -> String {
    violations.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}
