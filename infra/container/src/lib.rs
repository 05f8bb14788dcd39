//! Access to the FCStd document container.
//!
//! An `.FCStd` file is a zip archive. Two of its parts are XML trees the migrator rewrites:
//! [`DOCUMENT_PART`] (the model) and [`GUI_DOCUMENT_PART`] (its presentation). Every other part
//! (BREP shapes, thumbnails, embedded files) is carried over untouched.
//!
//! # Examples
//!
//! ```rust,no_run
//! use fcm_container::{Compression, Container, ContainerError};
//!
//! fn bump(input: &str, output: &str) -> Result<(), ContainerError> {
//!     let mut container = Container::open(input)?;
//!     let pair = container.load_pair()?;
//!     // ... migrate the pair ...
//!     container.export(output, &pair, Compression::Deflated)?;
//!     Ok(())
//! }
//! ```

mod archive;
mod error;
mod export;

pub use archive::Container;
pub use error::{ContainerError, ContainerErrorExt};
pub use export::{Compression, ExportSummary};

/// Primary tree part.
pub const DOCUMENT_PART: &str = "Document.xml";
/// Presentation tree part.
pub const GUI_DOCUMENT_PART: &str = "GuiDocument.xml";
