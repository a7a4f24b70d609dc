//! Failure marker for frame payloads that could not be parsed.
//!
//! When a frame's payload is not valid JSON, the decoder keeps a
//! MalformedPayload in its place so the event list stays complete and
//! the failure can be shown inline.

use crate::model::DecodeError;
use serde::Serialize;

/// A frame payload that could not be decoded.
///
/// Decoding is frame-local: producing one of these never stops decoding
/// of the frames that follow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MalformedPayload {
    raw_payload: String,
    error: DecodeError,
}

impl MalformedPayload {
    /// Create a new malformed payload marker.
    ///
    /// # Arguments
    ///
    /// * `raw_payload` - The payload text exactly as it appeared in the frame
    /// * `error` - Why decoding failed
    pub fn new(raw_payload: impl Into<String>, error: DecodeError) -> Self {
        Self {
            raw_payload: raw_payload.into(),
            error,
        }
    }

    /// Get the original payload text.
    pub fn raw_payload(&self) -> &str {
        &self.raw_payload
    }

    /// Get the decode failure.
    pub fn error(&self) -> &DecodeError {
        &self.error
    }

    /// Get a human-readable error message.
    pub fn error_message(&self) -> String {
        self.error.to_string()
    }
}
