use crate::error::MigrationError;
use crate::tree::{attribute, set_attribute};
use crate::version::Version;
use xmltree::Element;

/// Root attribute recording the FreeCAD build that last saved the document.
pub const PROGRAM_VERSION: &str = "ProgramVersion";

/// The two XML trees a migration operates on: the model (`Document.xml`) and its
/// presentation (`GuiDocument.xml`). Units receive both, mutably, on every step.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentPair {
    pub document: Element,
    pub gui_document: Element,
}

impl DocumentPair {
    #[must_use]
    pub const fn new(document: Element, gui_document: Element) -> Self {
        Self { document, gui_document }
    }

    /// Raw `ProgramVersion` of the document tree, if present.
    #[must_use]
    pub fn program_version(&self) -> Option<&str> {
        attribute(&self.document, PROGRAM_VERSION)
    }

    /// Parses the source version from the document root.
    ///
    /// # Errors
    /// [`MigrationError::MissingVersion`] when the attribute is absent, or
    /// [`MigrationError::UnrecognizedVersion`] when it cannot be parsed.
    pub fn source_version(&self) -> Result<Version, MigrationError> {
        let raw = self.program_version().ok_or_else(|| MigrationError::MissingVersion {
            element: self.document.name.clone().into(),
            attribute: PROGRAM_VERSION,
            context: None,
        })?;
        Version::parse(raw)
    }

    /// Writes the canonical form of `version` onto both roots.
    pub fn stamp_version(&mut self, version: &Version) {
        let canonical = version.to_string();
        set_attribute(&mut self.document, PROGRAM_VERSION, canonical.clone());
        set_attribute(&mut self.gui_document, PROGRAM_VERSION, canonical);
    }
}
