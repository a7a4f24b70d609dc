//! Diagnostics surfaced by strict reduction.
//!
//! Each diagnostic names an event the reducer tolerated without applying
//! (or applied out of protocol order). Collecting them never changes the
//! reconstructed state.

use crate::model::EventId;
use serde::Serialize;
use std::fmt;

/// A tolerated irregularity at a specific event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Event the irregularity was found at.
    pub event_id: EventId,
    /// What was irregular.
    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    /// Create a diagnostic for an event.
    pub fn new(event_id: EventId, kind: DiagnosticKind) -> Self {
        Self { event_id, kind }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "event {}: {}", self.event_id, self.kind)
    }
}

/// Kinds of tolerated irregularities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "diagnostic", rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// The payload was not valid JSON.
    MalformedPayload {
        /// Decoder message.
        message: String,
    },
    /// The payload had a known or missing `type` but the wrong shape.
    InvalidEvent {
        /// The payload's `type` tag, if any.
        kind: Option<String>,
        /// Why the shape was rejected.
        reason: String,
    },
    /// The payload's `type` tag is not a known kind.
    UnrecognizedKind {
        /// The unknown tag, if the payload had one.
        kind: Option<String>,
    },
    /// A block event addressed an index with no prior start.
    MissingBlock {
        /// Addressed index.
        index: usize,
        /// Event kind that addressed it.
        event: &'static str,
    },
    /// A delta's sub-kind does not belong to the addressed block's type.
    DeltaTypeMismatch {
        /// Addressed index.
        index: usize,
        /// Type of the block at that index.
        block_type: String,
        /// Delta sub-kind.
        delta_type: &'static str,
    },
    /// A delta arrived after the block was sealed; it was still appended.
    DeltaAfterStop {
        /// Addressed index.
        index: usize,
    },
    /// A block start replaced an existing block at the same index.
    DuplicateBlockStart {
        /// Reused index.
        index: usize,
    },
    /// An event arrived after `message_stop`; it was still folded.
    EventAfterStop {
        /// Kind of the late event.
        event: &'static str,
    },
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::MalformedPayload { message } => {
                write!(f, "malformed payload ignored: {message}")
            }
            DiagnosticKind::InvalidEvent { kind, reason } => write!(
                f,
                "invalid '{}' event ignored: {reason}",
                kind.as_deref().unwrap_or("<untyped>")
            ),
            DiagnosticKind::UnrecognizedKind { kind } => write!(
                f,
                "unrecognized event kind '{}' ignored",
                kind.as_deref().unwrap_or("<untyped>")
            ),
            DiagnosticKind::MissingBlock { index, event } => {
                write!(f, "{event} for index {index} with no started block ignored")
            }
            DiagnosticKind::DeltaTypeMismatch {
                index,
                block_type,
                delta_type,
            } => write!(
                f,
                "{delta_type} does not apply to {block_type} block at index {index}; ignored"
            ),
            DiagnosticKind::DeltaAfterStop { index } => {
                write!(f, "delta for sealed block at index {index} appended anyway")
            }
            DiagnosticKind::DuplicateBlockStart { index } => {
                write!(f, "block at index {index} restarted; previous content replaced")
            }
            DiagnosticKind::EventAfterStop { event } => {
                write!(f, "{event} after message_stop folded anyway")
            }
        }
    }
}
