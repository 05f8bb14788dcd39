//! Write side: rewrites the two XML parts and raw-copies everything else.
//!
//! The new archive is assembled in a sibling temporary file (`<output>.fcmtmp.<pid>`), synced,
//! and renamed over `output`. A failed export never leaves a truncated `output` behind, and the
//! source archive may be the output itself.

use crate::archive::Container;
use crate::error::{ContainerError, ContainerErrorExt};
use crate::{DOCUMENT_PART, GUI_DOCUMENT_PART};
use fcm_engine::DocumentPair;
use serde::Deserialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use xmltree::{Element, EmitterConfig};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Compression applied to the two rewritten XML parts. Copied parts keep their own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    #[default]
    Deflated,
    Stored,
}

impl Compression {
    const fn method(self) -> CompressionMethod {
        match self {
            Self::Deflated => CompressionMethod::Deflated,
            Self::Stored => CompressionMethod::Stored,
        }
    }
}

/// What an export wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub output: PathBuf,
    /// Parts serialized from the migrated trees.
    pub rewritten: usize,
    /// Parts copied byte for byte from the source archive.
    pub copied: usize,
}

impl Container {
    /// Writes a new archive at `output` holding `pair` plus every other part of this container.
    ///
    /// # Errors
    /// [`ContainerError::Xml`] when a tree cannot be serialized, [`ContainerError::Archive`] or
    /// [`ContainerError::Io`] on write failures. `output` is untouched on error.
    pub fn export(
        &mut self,
        output: impl AsRef<Path>,
        pair: &DocumentPair,
        compression: Compression,
    ) -> Result<ExportSummary, ContainerError> {
        let output = output.as_ref();
        let temp = temp_path(output);

        let result = self.write_archive(&temp, pair, compression).and_then(|summary| {
            replace(&temp, output)?;
            Ok(summary)
        });

        match result {
            Ok((rewritten, copied)) => {
                info!(output = %output.display(), rewritten, copied, "Container exported");
                Ok(ExportSummary { output: output.to_path_buf(), rewritten, copied })
            },
            Err(err) => {
                if let Err(cleanup) = fs::remove_file(&temp)
                    && cleanup.kind() != std::io::ErrorKind::NotFound
                {
                    warn!(path = %temp.display(), error = %cleanup, "Failed to remove temporary archive");
                }
                Err(err)
            },
        }
    }

    fn write_archive(
        &mut self,
        temp: &Path,
        pair: &DocumentPair,
        compression: Compression,
    ) -> Result<(usize, usize), ContainerError> {
        let file = File::create(temp).context(format!("Creating {}", temp.display()))?;
        let mut writer = ZipWriter::new(BufWriter::new(file));
        let options = SimpleFileOptions::default().compression_method(compression.method());

        for (name, tree) in [(DOCUMENT_PART, &pair.document), (GUI_DOCUMENT_PART, &pair.gui_document)] {
            writer.start_file(name, options).context(format!("Starting {name}"))?;
            write_tree(tree, &mut writer).map_err(|e| match e {
                ContainerError::Xml { message, .. } => {
                    ContainerError::Xml { message, context: Some(format!("Serializing {name}").into()) }
                },
                other => other,
            })?;
        }

        let mut copied = 0;
        for index in 0..self.archive.len() {
            let part = self.archive.by_index_raw(index).context("Reading source part")?;
            let name = part.name().to_owned();
            if name == DOCUMENT_PART || name == GUI_DOCUMENT_PART {
                continue;
            }
            writer.raw_copy_file(part).context(format!("Copying {name}"))?;
            debug!(part = %name, "Part copied");
            copied += 1;
        }

        let buffered = writer.finish().context("Finishing archive")?;
        let file = buffered.into_inner().map_err(|e| ContainerError::Io {
            source: e.into_error(),
            context: Some("Flushing archive".into()),
        })?;
        file.sync_all().context("Syncing archive")?;

        Ok((2, copied))
    }
}

fn write_tree(tree: &Element, writer: &mut impl Write) -> Result<(), ContainerError> {
    let config = EmitterConfig::new().perform_indent(true).write_document_declaration(true);
    let mut xml = Vec::new();
    tree.write_with_config(&mut xml, config).map_err(|e| ContainerError::Xml {
        message: e.to_string().into(),
        context: None,
    })?;
    writer.write_all(&escape_attribute_whitespace(&xml)).context("Writing XML part")
}

#[derive(Clone, Copy)]
enum Markup {
    Text,
    Tag,
    Value(u8),
    /// Comment, CDATA section or processing instruction, up to its terminator.
    Skip(&'static [u8]),
}

/// Replaces literal tabs and carriage returns inside attribute values with character references.
///
/// The emitter writes both verbatim, and attribute-value normalization on load turns them into
/// spaces. Text, comments, CDATA sections and processing instructions are left alone.
fn escape_attribute_whitespace(xml: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(xml.len());
    let mut state = Markup::Text;
    let mut i = 0;

    while i < xml.len() {
        let rest = &xml[i..];
        let byte = xml[i];
        match state {
            Markup::Text if byte == b'<' => {
                state = if rest.starts_with(b"<!--") {
                    Markup::Skip(b"-->")
                } else if rest.starts_with(b"<![CDATA[") {
                    Markup::Skip(b"]]>")
                } else if rest.starts_with(b"<?") {
                    Markup::Skip(b"?>")
                } else {
                    Markup::Tag
                };
            },
            Markup::Skip(end) if rest.starts_with(end) => {
                out.extend_from_slice(end);
                i += end.len();
                state = Markup::Text;
                continue;
            },
            Markup::Tag if byte == b'"' || byte == b'\'' => state = Markup::Value(byte),
            Markup::Tag if byte == b'>' => state = Markup::Text,
            Markup::Value(quote) if byte == quote => state = Markup::Tag,
            Markup::Value(_) if byte == b'\t' => {
                out.extend_from_slice(b"&#9;");
                i += 1;
                continue;
            },
            Markup::Value(_) if byte == b'\r' => {
                out.extend_from_slice(b"&#13;");
                i += 1;
                continue;
            },
            _ => {},
        }
        out.push(byte);
        i += 1;
    }
    out
}

fn temp_path(output: &Path) -> PathBuf {
    let name = output.file_name().map_or_else(|| "export".into(), |n| n.to_string_lossy());
    output.with_file_name(format!("{name}.fcmtmp.{}", std::process::id()))
}

fn replace(temp: &Path, output: &Path) -> Result<(), ContainerError> {
    if let Err(err) = fs::rename(temp, output) {
        // Windows refuses to rename over an existing file.
        if output.exists() {
            fs::remove_file(output).context(format!("Removing {}", output.display()))?;
            fs::rename(temp, output).context(format!("Moving archive to {}", output.display()))?;
        } else {
            return Err(ContainerError::Io {
                source: err,
                context: Some(format!("Moving archive to {}", output.display()).into()),
            });
        }
    }
    Ok(())
}
