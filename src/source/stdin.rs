//! Stdin-based transcript source for piped input.

use crate::model::error::InputError;
use std::io::{IsTerminal, Read};
use tracing::debug;

/// Stdin source for piped transcripts (e.g. `pbpaste | sselens`).
///
/// Reads until EOF in one blocking call.
#[derive(Debug)]
pub struct StdinSource<R: Read> {
    reader: R,
}

impl StdinSource<std::io::Stdin> {
    /// Create a new StdinSource from stdin.
    ///
    /// # Errors
    ///
    /// Returns `InputError::NoInput` if stdin is a TTY (interactive terminal),
    /// so a forgotten pipe does not leave the process waiting for typing.
    pub fn new() -> Result<Self, InputError> {
        let stdin = std::io::stdin();
        if stdin.is_terminal() {
            return Err(InputError::NoInput);
        }
        Ok(Self { reader: stdin })
    }
}

impl<R: Read> StdinSource<R> {
    /// Create StdinSource from any reader, bypassing the TTY check.
    pub fn from_reader(reader: R) -> Self {
        Self { reader }
    }

    /// Read everything up to EOF as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns `InputError::Io` for I/O errors, including non-UTF-8 content.
    pub fn read_all(mut self) -> Result<String, InputError> {
        let mut contents = String::new();
        self.reader.read_to_string(&mut contents)?;
        debug!(bytes = contents.len(), "Read transcript from stdin");
        Ok(contents)
    }
}
