//! File-based transcript source.
//!
//! Reads a transcript file once, in full. There is no follow mode: the
//! pipeline only ever sees a complete buffer.

use crate::model::error::InputError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A transcript file to read once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Create a source for the given path.
    ///
    /// # Errors
    ///
    /// Returns `InputError::FileNotFound` if the file does not exist.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, InputError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(InputError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Path being read.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole file as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns `InputError::Io` for I/O errors, including non-UTF-8 content.
    pub fn read_all(&self) -> Result<String, InputError> {
        let contents = std::fs::read_to_string(&self.path)?;
        debug!(path = %self.path.display(), bytes = contents.len(), "Read transcript file");
        Ok(contents)
    }
}
