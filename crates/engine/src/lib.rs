//! # FCStd Migration Engine
//!
//! Version model, unit contract, registry and sequencer for migrating the XML trees
//! inside FreeCAD documents between format versions.
//!
//! The engine never touches archives: it operates on a [`DocumentPair`] that the
//! container layer extracted, and hands the pair back with its version stamped.
//!
//! ```rust,ignore
//! let registry = fcm_migrations::registry()?;
//! let mut pair = container.load_pair()?;
//! let report = Sequencer::new(&registry).run(&mut pair, &Version::parse("1.1")?)?;
//! ```

mod document;
mod edit;
mod error;
mod registry;
mod sequencer;
mod tree;
mod unit;
mod version;

pub use document::{DocumentPair, PROGRAM_VERSION};
pub use edit::{PROPERTY_ELEMENT, rename_property, retype_property, retype_property_with, transform_property};
pub use error::{MigrationError, MigrationErrorExt, Violation};
pub use registry::{CatalogEntry, RESERVED_PREFIX, RegisteredMigration, Registry, UNIT_EXTENSION, instantiate};
pub use sequencer::{AppliedMigration, Direction, MigrationReport, Plan, Sequencer};
pub use tree::{
    NAME_ATTRIBUTE, TYPE_ATTRIBUTE, attribute, child_elements, child_elements_mut, find_by_tag,
    find_by_type, find_first_by_name, find_first_by_name_mut, for_each_by_tag_mut, for_each_by_type_mut,
    set_attribute, walk_mut,
};
pub use unit::{Declaration, Declared, Metadata, Migration};
pub use version::{PrePhase, Version};

/// Attribute macro that declares a migration unit. See [`Declared`].
pub use fcm_derive::migration;

/// Re-exported so units can build and inspect elements without naming the XML crate.
pub use xmltree::{Element, XMLNode};
