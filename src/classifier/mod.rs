//! Input mode classification.
//!
//! Decides whether pasted input is a complete dialogue (a JSON object with
//! a `messages` array) or a streaming transcript, and runs the matching
//! path. Classification is recomputed on every call.

use crate::model::{Dialogue, SseEvent};
use crate::parser::parse_raw_sse;
use crate::reducer::{reconstruct_with, Reconstruction, Strictness};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// How an input should be processed.
#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    /// Complete conversation, passed on unchanged.
    Dialogue(Dialogue),
    /// Streaming transcript to decode and reconstruct.
    Transcript,
}

impl InputMode {
    /// Short lowercase label for reports.
    pub fn label(&self) -> &'static str {
        match self {
            InputMode::Dialogue(_) => "dialogue",
            InputMode::Transcript => "transcript",
        }
    }
}

/// Classify raw input.
///
/// Anything that is not a JSON object with an array-valued `messages`
/// field, including blank input and JSON of any other shape, is a
/// transcript.
///
/// # Examples
///
/// ```
/// use sselens::classifier::{classify_input, InputMode};
///
/// let mode = classify_input(r#"{"messages": []}"#);
/// assert!(matches!(mode, InputMode::Dialogue(_)));
///
/// let mode = classify_input("event: ping\ndata: {}\n\n");
/// assert_eq!(mode, InputMode::Transcript);
/// ```
pub fn classify_input(raw: &str) -> InputMode {
    if raw.trim().is_empty() {
        return InputMode::Transcript;
    }

    let mode = match serde_json::from_str::<Value>(raw) {
        Ok(value) => match Dialogue::from_value(value) {
            Ok(dialogue) => InputMode::Dialogue(dialogue),
            Err(_) => InputMode::Transcript,
        },
        Err(_) => InputMode::Transcript,
    };

    debug!(mode = mode.label(), input_bytes = raw.len(), "Classified input");
    mode
}

/// Result of running the path selected by [`classify_input`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Inspection {
    /// Complete conversation for the static visualizer.
    Dialogue {
        /// The unchanged conversation object.
        dialogue: Dialogue,
    },
    /// Decoded transcript and the message it reconstructs to.
    Transcript {
        /// Events in arrival order.
        events: Vec<SseEvent>,
        /// Reconstructed state and diagnostics.
        reconstruction: Reconstruction,
    },
}

impl Inspection {
    /// Diagnostics of a transcript run; always empty for dialogues.
    pub fn diagnostics(&self) -> &[crate::model::Diagnostic] {
        match self {
            Inspection::Dialogue { .. } => &[],
            Inspection::Transcript { reconstruction, .. } => &reconstruction.diagnostics,
        }
    }
}

/// Classify and process raw input in one step.
///
/// The transcript path is only run when the input is not a dialogue.
pub fn inspect(raw: &str, strictness: Strictness) -> Inspection {
    match classify_input(raw) {
        InputMode::Dialogue(dialogue) => Inspection::Dialogue { dialogue },
        InputMode::Transcript => {
            let events = parse_raw_sse(raw);
            let reconstruction = reconstruct_with(&events, strictness);
            Inspection::Transcript {
                events,
                reconstruction,
            }
        }
    }
}
