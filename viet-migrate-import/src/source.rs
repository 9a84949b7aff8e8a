//! Source reader for the flat-file data directory.

use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use viet_migrate_catalog::Collection;

/// Failures reading a source document. All of them abort the run: a corrupt
/// file means the dataset as a whole can't be trusted.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Malformed JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("{collection}: expected {expected} at the top level")]
    UnexpectedShape {
        collection: Collection,
        expected: &'static str,
    },
}

/// Result of looking up a collection's document.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceRead {
    /// No file for this collection; nothing to migrate.
    Absent,
    /// The parsed document.
    Found(Value),
}

/// The directory holding one `<collection>.json` document per collection.
#[derive(Debug, Clone)]
pub struct SourceDir {
    root: PathBuf,
}

impl SourceDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, collection: Collection) -> PathBuf {
        self.root.join(collection.file_name())
    }

    /// Load and parse a collection's document.
    ///
    /// A missing file is [`SourceRead::Absent`], not an error.
    pub fn read(&self, collection: Collection) -> Result<SourceRead, SourceError> {
        let path = self.path_for(collection);
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No source file at {}", path.display());
                return Ok(SourceRead::Absent);
            }
            Err(source) => return Err(SourceError::Io { path, source }),
        };

        serde_json::from_str(&text)
            .map(SourceRead::Found)
            .map_err(|source| SourceError::Json { path, source })
    }
}
