//! Error types for sselens.
//!
//! This module defines the error taxonomy using `thiserror`. Errors compose via `?` and
//! `From` conversions.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level error of the command-line shell
//!   - [`InputError`] - Input file/stdin reading failures (file not found, terminal stdin, IO)
//!   - [`ConfigError`] - Configuration file read/parse failures
//!   - [`LoggingError`] - Tracing subscriber setup failures
//!   - `std::io::Error` - Writing the report failed
//!   - `serde_json::Error` - Serializing the JSON report failed
//! - [`DecodeError`] - Payload-level decode failure, stored inside a failure marker
//!
//! # Error Recovery Strategy
//!
//! Nothing in the decoding pipeline is fatal. A payload that fails to decode becomes a
//! [`crate::model::MalformedPayload`] event in place and decoding continues with the next
//! frame; shape mismatches during reduction are ignored. Only the impure shell (reading
//! input, loading config, writing output) can fail, and those failures end the run.

use crate::config::ConfigError;
use crate::logging::LoggingError;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error encompassing all failure modes of the shell.
///
/// All domain-specific error types convert to `AppError` via `From`, so `main`
/// can propagate with `?`.
///
/// # Examples
///
/// ```no_run
/// use sselens::model::error::{AppError, InputError};
///
/// fn run_app() -> Result<(), AppError> {
///     // InputError automatically converts to AppError via From
///     let _input = read_transcript()?;
///     Ok(())
/// }
/// # fn read_transcript() -> Result<(), InputError> { Ok(()) }
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Failed to read the transcript from file or stdin.
    ///
    /// Fatal: there is nothing to decode without input.
    #[error("Failed to read input: {0}")]
    Input(#[from] InputError),

    /// A configuration file exists but could not be read or parsed.
    #[error("Failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    /// The tracing subscriber could not be installed.
    #[error("Failed to initialize logging: {0}")]
    Logging(#[from] LoggingError),

    /// Writing the report to stdout or stderr failed (e.g. broken pipe).
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),

    /// Serializing the JSON report failed.
    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors encountered when reading a transcript from a file or stdin.
///
/// # Recovery Patterns
///
/// - **FileNotFound**: Display error and exit (user provided invalid path)
/// - **NoInput**: Display usage help - user must provide a file path or pipe stdin
/// - **Io**: Generic I/O failures (permissions, disk errors) - display and exit
#[derive(Debug, Error)]
pub enum InputError {
    /// The specified transcript file does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use sselens::model::error::InputError;
    ///
    /// let err = InputError::FileNotFound {
    ///     path: PathBuf::from("/tmp/missing.sse")
    /// };
    /// assert!(err.to_string().contains("/tmp/missing.sse"));
    /// ```
    #[error("File not found: {path}")]
    FileNotFound {
        /// The filesystem path that was not found.
        path: PathBuf,
    },

    /// No input source was provided and stdin is an interactive terminal.
    ///
    /// The shell supports both invocation modes:
    /// - `sselens transcript.sse` (file mode)
    /// - `pbpaste | sselens` (stdin mode)
    ///
    /// # Examples
    ///
    /// ```
    /// use sselens::model::error::InputError;
    ///
    /// let err = InputError::NoInput;
    /// assert!(err.to_string().contains("file path or pipe data to stdin"));
    /// ```
    #[error("No input source: provide a file path or pipe data to stdin")]
    NoInput,

    /// Generic I/O error reading from the input source.
    ///
    /// Non-UTF-8 input surfaces here as `InvalidData`.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a single frame payload could not be decoded.
///
/// Never propagated as a failure: it is stored inside the
/// [`crate::model::MalformedPayload`] that replaces the event.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecodeError {
    /// The frame had `data:` lines but they were all empty.
    #[error("Empty payload")]
    EmptyPayload,

    /// The payload text is not valid JSON.
    ///
    /// # Examples
    ///
    /// ```
    /// use sselens::model::error::DecodeError;
    ///
    /// let err = DecodeError::InvalidJson {
    ///     line: 1,
    ///     column: 15,
    ///     message: "EOF while parsing an object at line 1 column 15".to_string(),
    /// };
    /// assert!(err.to_string().contains("EOF while parsing"));
    /// ```
    #[error("Invalid JSON payload: {message}")]
    InvalidJson {
        /// 1-based line within the payload where parsing failed.
        line: usize,
        /// 1-based column within the payload where parsing failed.
        column: usize,
        /// The JSON parser's message.
        message: String,
    },
}

impl DecodeError {
    /// Build from a `serde_json` failure, keeping its position.
    pub fn from_json(err: &serde_json::Error) -> Self {
        DecodeError::InvalidJson {
            line: err.line(),
            column: err.column(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn input_error_file_not_found_display() {
        let err = InputError::FileNotFound {
            path: PathBuf::from("/tmp/missing.sse"),
        };
        let msg = err.to_string();
        assert!(msg.contains("File not found"));
        assert!(msg.contains("/tmp/missing.sse"));
    }

    #[test]
    fn input_error_no_input_display() {
        let msg = InputError::NoInput.to_string();
        assert!(msg.contains("No input source"));
        assert!(msg.contains("file path or pipe data to stdin"));
    }

    #[test]
    fn input_error_io_conversion() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let input_err: InputError = io_err.into();
        let msg = input_err.to_string();
        assert!(msg.contains("IO error"));
        assert!(msg.contains("access denied"));
    }

    #[test]
    fn decode_error_from_json_keeps_position() {
        let err = serde_json::from_str::<serde_json::Value>("{\"a\":").unwrap_err();
        match DecodeError::from_json(&err) {
            DecodeError::InvalidJson {
                line,
                column,
                message,
            } => {
                assert_eq!(line, 1);
                assert!(column > 0);
                assert!(!message.is_empty());
            }
            other => panic!("Expected InvalidJson, got {:?}", other),
        }
    }

    #[test]
    fn decode_error_empty_payload_display() {
        assert_eq!(DecodeError::EmptyPayload.to_string(), "Empty payload");
    }

    #[test]
    fn app_error_from_input_error() {
        let app_err: AppError = InputError::NoInput.into();
        let msg = app_err.to_string();
        assert!(msg.contains("Failed to read input"));
        assert!(msg.contains("No input source"));
    }

    #[test]
    fn app_error_from_config_error() {
        let config_err = ConfigError::ParseError {
            path: PathBuf::from("/etc/sselens.toml"),
            reason: "expected `=`".to_string(),
        };
        let app_err: AppError = config_err.into();
        let msg = app_err.to_string();
        assert!(msg.contains("Failed to load configuration"));
        assert!(msg.contains("/etc/sselens.toml"));
    }

    #[test]
    fn app_error_from_io_error() {
        let io_err = io::Error::new(io::ErrorKind::BrokenPipe, "pipe broken");
        let app_err: AppError = io_err.into();
        let msg = app_err.to_string();
        assert!(msg.contains("Output error"));
        assert!(msg.contains("pipe broken"));
    }

    #[test]
    fn app_error_nested_io_through_input_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let input_err: InputError = io_err.into();
        let app_err: AppError = input_err.into();
        let msg = app_err.to_string();
        assert!(msg.contains("Failed to read input"));
        assert!(msg.contains("IO error"));
        assert!(msg.contains("file not found"));
    }
}
