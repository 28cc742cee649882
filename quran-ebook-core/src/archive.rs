//! Archive Assembler - EPUB container serialization
//!
//! The `mimetype` entry is written first, stored, with no extra field, so
//! its content sits at byte offset 38 where readers sniff for it. Entry
//! times are pinned; identical document sets yield identical bytes.

use std::io::{Cursor, Write};
use thiserror::Error;
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::CompressionMethod;

pub const MIMETYPE_ENTRY: &str = "mimetype";
pub const EPUB_MIMETYPE: &str = "application/epub+zip";

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("'{0}' is reserved and written by the assembler")]
    ReservedEntry(String),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Archive paths to bytes, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentSet {
    entries: Vec<(String, Vec<u8>)>,
}

impl DocumentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry. A repeated path replaces the earlier bytes in place.
    pub fn insert(&mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        let path = path.into();
        let bytes = bytes.into();
        match self.entries.iter_mut().find(|(p, _)| *p == path) {
            Some(entry) => entry.1 = bytes,
            None => self.entries.push((path, bytes)),
        }
    }

    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, b)| b.as_slice())
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(p, _)| p.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.entries.iter().map(|(p, b)| (p.as_str(), b.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Serialize the document set into an EPUB container.
pub fn assemble(documents: &DocumentSet) -> Result<Vec<u8>, ArchiveError> {
    if documents.get(MIMETYPE_ENTRY).is_some() {
        return Err(ArchiveError::ReservedEntry(MIMETYPE_ENTRY.to_string()));
    }

    let pinned = zip::DateTime::default();
    let stored = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Stored)
        .last_modified_time(pinned);
    let deflated = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(pinned);

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    writer.start_file(MIMETYPE_ENTRY, stored)?;
    writer.write_all(EPUB_MIMETYPE.as_bytes())?;

    for (path, bytes) in documents.iter() {
        writer.start_file(path, deflated)?;
        writer.write_all(bytes)?;
    }

    let bytes = writer.finish()?.into_inner();
    tracing::debug!(entries = documents.len() + 1, bytes = bytes.len(), "Assembled archive");
    Ok(bytes)
}
