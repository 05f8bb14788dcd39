//! Read side of the FCStd container.

use crate::error::{ContainerError, ContainerErrorExt};
use crate::{DOCUMENT_PART, GUI_DOCUMENT_PART};
use fcm_engine::DocumentPair;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::debug;
use xmltree::Element;
use zip::ZipArchive;
use zip::result::ZipError;

/// An opened `.FCStd` archive.
///
/// Parts are read lazily; nothing but the central directory is loaded by [`Container::open`].
#[derive(Debug)]
pub struct Container {
    path: PathBuf,
    pub(crate) archive: ZipArchive<BufReader<File>>,
}

impl Container {
    /// Opens the archive at `path` and reads its central directory.
    ///
    /// # Errors
    /// [`ContainerError::Io`] when the file cannot be opened, [`ContainerError::Archive`] when it
    /// is not a zip archive.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ContainerError> {
        let path = path.as_ref();
        let file = File::open(path).context(format!("Opening {}", path.display()))?;
        let archive = ZipArchive::new(BufReader::new(file))
            .context(format!("Reading archive directory of {}", path.display()))?;

        debug!(path = %path.display(), parts = archive.len(), "Container opened");
        Ok(Self { path: path.to_path_buf(), archive })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Part names in archive order.
    #[must_use]
    pub fn part_names(&self) -> Vec<String> {
        self.archive.file_names().map(str::to_owned).collect()
    }

    #[must_use]
    pub fn has_part(&self, name: &str) -> bool {
        self.archive.index_for_name(name).is_some()
    }

    /// Decompressed contents of the part called `name`.
    ///
    /// # Errors
    /// [`ContainerError::MissingRequiredPart`] when no such part exists.
    pub fn read_part(&mut self, name: &str) -> Result<Vec<u8>, ContainerError> {
        let mut part = match self.archive.by_name(name) {
            Ok(part) => part,
            Err(ZipError::FileNotFound) => {
                return Err(ContainerError::MissingRequiredPart {
                    part: name.to_owned().into(),
                    context: Some(self.path.display().to_string().into()),
                });
            },
            Err(source) => {
                return Err(ContainerError::Archive { source, context: Some(format!("Reading {name}").into()) });
            },
        };

        let mut bytes = Vec::with_capacity(usize::try_from(part.size()).unwrap_or_default());
        part.read_to_end(&mut bytes).context(format!("Decompressing {name}"))?;
        Ok(bytes)
    }

    /// Parses the part called `name` as an XML tree.
    ///
    /// # Errors
    /// See [`Container::read_part`]; [`ContainerError::Xml`] when the part is not well-formed.
    pub fn load_tree(&mut self, name: &str) -> Result<Element, ContainerError> {
        let bytes = self.read_part(name)?;
        Element::parse(bytes.as_slice()).map_err(|e| ContainerError::Xml {
            message: e.to_string().into(),
            context: Some(format!("Parsing {name}").into()),
        })
    }

    /// Loads `Document.xml` and `GuiDocument.xml`.
    ///
    /// # Errors
    /// [`ContainerError::MissingRequiredPart`] naming whichever part is absent.
    pub fn load_pair(&mut self) -> Result<DocumentPair, ContainerError> {
        let document = self.load_tree(DOCUMENT_PART)?;
        let gui_document = self.load_tree(GUI_DOCUMENT_PART)?;
        Ok(DocumentPair::new(document, gui_document))
    }
}
