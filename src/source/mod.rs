//! Transcript input sources.
//!
//! This module provides input sources for raw transcript text:
//! - File loading for a path given on the command line
//! - Stdin for piped input
//! - Unified InputSource enum for both
//!
//! Both are read once, completely, before the pure pipeline runs.

use crate::model::error::InputError;
use std::path::PathBuf;

pub mod file;
pub mod stdin;

pub use file::FileSource;
pub use stdin::StdinSource;

/// Unified input source for transcript text.
///
/// Sum type enforces exactly one variant.
#[derive(Debug)]
pub enum InputSource {
    /// File given as an argument.
    File(FileSource),
    /// Piped stdin.
    Stdin(StdinSource<std::io::Stdin>),
}

impl InputSource {
    /// Read the complete input.
    ///
    /// # Errors
    ///
    /// Returns `InputError::Io` for I/O errors or non-UTF-8 input.
    pub fn read_all(self) -> Result<String, InputError> {
        match self {
            InputSource::File(f) => f.read_all(),
            InputSource::Stdin(s) => s.read_all(),
        }
    }

    /// Short description for logs.
    pub fn describe(&self) -> String {
        match self {
            InputSource::File(f) => f.path().display().to_string(),
            InputSource::Stdin(_) => "<stdin>".to_string(),
        }
    }
}

/// Detect and create appropriate input source.
///
/// # Logic:
/// 1. If file path is provided: create FileSource
/// 2. If stdin is piped: use StdinSource
/// 3. Else: return InputError::NoInput
///
/// # Errors
///
/// Returns `InputError::NoInput` if no file is provided and stdin is a terminal.
/// Returns `InputError::FileNotFound` if file does not exist.
pub fn detect_input_source(file: Option<PathBuf>) -> Result<InputSource, InputError> {
    match file {
        Some(path) => Ok(InputSource::File(FileSource::new(path)?)),
        None => Ok(InputSource::Stdin(StdinSource::new()?)),
    }
}
