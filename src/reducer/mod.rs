//! Incremental message reducer.
//!
//! Folds an ordered event sequence into a [`MessageState`]. The fold is
//! total: unrecognized, malformed and out-of-order events degrade to no-ops
//! (or best-effort application) and never abort reconstruction.
//!
//! [`Strictness`] only decides whether those tolerated situations are
//! surfaced as [`Diagnostic`]s. The resulting state is identical in both
//! modes.

use crate::model::{
    BlockBody, ContentBlock, Diagnostic, DiagnosticKind, EventData, EventId, MessageState,
    SseEvent, StreamEvent,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

// ===== Strictness =====

/// Whether tolerated irregularities are reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    /// Irregularities are only logged at debug level.
    #[default]
    Lenient,
    /// Irregularities are also collected as diagnostics.
    Strict,
}

impl Strictness {
    /// Map a `--strict`-style flag to a mode.
    pub fn from_flag(strict: bool) -> Self {
        if strict {
            Strictness::Strict
        } else {
            Strictness::Lenient
        }
    }

    /// True for [`Strictness::Strict`].
    pub fn is_strict(self) -> bool {
        self == Strictness::Strict
    }
}

impl fmt::Display for Strictness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strictness::Lenient => write!(f, "lenient"),
            Strictness::Strict => write!(f, "strict"),
        }
    }
}

impl FromStr for Strictness {
    type Err = String;

    /// Accepts `lenient`/`strict` as well as boolean spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" | "true" | "1" | "yes" => Ok(Strictness::Strict),
            "lenient" | "false" | "0" | "no" => Ok(Strictness::Lenient),
            other => Err(format!("expected 'lenient' or 'strict', got '{other}'")),
        }
    }
}

// ===== Reconstruction =====

/// Outcome of a reduction run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Reconstruction {
    /// The reconstructed message.
    pub state: MessageState,
    /// Tolerated irregularities, in event order. Always empty when lenient.
    pub diagnostics: Vec<Diagnostic>,
}

impl Reconstruction {
    /// True when no diagnostics were collected.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

// ===== MessageReducer =====

/// Incremental reducer.
///
/// Feed events in arrival order with [`MessageReducer::apply`]; the
/// partial state is observable at any point through
/// [`MessageReducer::state`].
#[derive(Debug, Clone, Default)]
pub struct MessageReducer {
    strictness: Strictness,
    state: MessageState,
    diagnostics: Vec<Diagnostic>,
    message_stopped: bool,
}

impl MessageReducer {
    /// Create a reducer with an empty state.
    pub fn new(strictness: Strictness) -> Self {
        Self {
            strictness,
            ..Self::default()
        }
    }

    /// State reconstructed so far.
    pub fn state(&self) -> &MessageState {
        &self.state
    }

    /// Diagnostics collected so far.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// True once a `message_stop` has been folded.
    pub fn is_stopped(&self) -> bool {
        self.message_stopped
    }

    /// Fold one event into the state.
    ///
    /// Dispatch uses the payload's own `type` tag; the frame name is
    /// ignored.
    pub fn apply(&mut self, event: &SseEvent) {
        let id = event.id();

        let kind = match event.data() {
            EventData::Decoded { kind, .. } => kind,
            EventData::Malformed(marker) => {
                self.note(
                    id,
                    DiagnosticKind::MalformedPayload {
                        message: marker.error_message(),
                    },
                );
                return;
            }
        };

        if self.message_stopped && folds_state(kind) {
            self.note(
                id,
                DiagnosticKind::EventAfterStop {
                    event: kind.kind_name(),
                },
            );
        }

        match kind {
            StreamEvent::MessageStart { message } => {
                if let Some(message_id) = &message.id {
                    self.state.set_id(message_id.clone());
                }
                if let Some(role) = &message.role {
                    self.state.set_role(role.clone());
                }
                if let Some(model) = &message.model {
                    self.state.set_model(model.clone());
                }
                if let Some(usage) = &message.usage {
                    self.state.merge_usage(usage);
                }
            }
            StreamEvent::ContentBlockStart {
                index,
                content_block,
            } => {
                let block = ContentBlock::new(*index, BlockBody::from_start(content_block));
                if self.state.insert_block(block).is_some() {
                    self.note(id, DiagnosticKind::DuplicateBlockStart { index: *index });
                }
            }
            StreamEvent::ContentBlockDelta { index, delta } => {
                let outcome = match self.state.block_mut(*index) {
                    None => Some(DiagnosticKind::MissingBlock {
                        index: *index,
                        event: kind.kind_name(),
                    }),
                    Some(block) => {
                        let was_closed = block.is_closed();
                        if !block.append(delta) {
                            Some(DiagnosticKind::DeltaTypeMismatch {
                                index: *index,
                                block_type: block.type_name().to_string(),
                                delta_type: delta.kind_name(),
                            })
                        } else if was_closed {
                            Some(DiagnosticKind::DeltaAfterStop { index: *index })
                        } else {
                            None
                        }
                    }
                };
                if let Some(outcome) = outcome {
                    self.note(id, outcome);
                }
            }
            StreamEvent::ContentBlockStop { index } => match self.state.block_mut(*index) {
                Some(block) => block.close(),
                None => self.note(
                    id,
                    DiagnosticKind::MissingBlock {
                        index: *index,
                        event: kind.kind_name(),
                    },
                ),
            },
            StreamEvent::MessageDelta { delta, usage } => {
                if let Some(stop_reason) = &delta.stop_reason {
                    self.state.set_stop_reason(stop_reason.clone());
                }
                if let Some(stop_sequence) = &delta.stop_sequence {
                    self.state.set_stop_sequence(stop_sequence.clone());
                }
                if let Some(usage) = usage {
                    self.state.merge_usage(usage);
                }
            }
            StreamEvent::MessageStop => {
                self.message_stopped = true;
            }
            StreamEvent::Ping => {}
            StreamEvent::Error { error } => {
                self.state.set_error(error.clone());
            }
            StreamEvent::Invalid { kind: tag, reason } => {
                self.note(
                    id,
                    DiagnosticKind::InvalidEvent {
                        kind: tag.clone(),
                        reason: reason.clone(),
                    },
                );
            }
            StreamEvent::Unrecognized => {
                self.note(
                    id,
                    DiagnosticKind::UnrecognizedKind {
                        kind: event.type_tag().map(str::to_string),
                    },
                );
            }
        }
    }

    /// Consume the reducer, returning the state and any diagnostics.
    pub fn finish(self) -> Reconstruction {
        debug!(
            blocks = self.state.block_count(),
            diagnostics = self.diagnostics.len(),
            strictness = %self.strictness,
            "Reconstructed message"
        );
        Reconstruction {
            state: self.state,
            diagnostics: self.diagnostics,
        }
    }

    fn note(&mut self, event_id: EventId, kind: DiagnosticKind) {
        debug!(event_id = %event_id, "Tolerated stream irregularity: {}", kind);
        if self.strictness.is_strict() {
            self.diagnostics.push(Diagnostic::new(event_id, kind));
        }
    }
}

/// Kinds whose arrival after `message_stop` is worth reporting.
fn folds_state(kind: &StreamEvent) -> bool {
    matches!(
        kind,
        StreamEvent::MessageStart { .. }
            | StreamEvent::ContentBlockStart { .. }
            | StreamEvent::ContentBlockDelta { .. }
            | StreamEvent::ContentBlockStop { .. }
            | StreamEvent::MessageDelta { .. }
            | StreamEvent::MessageStop
            | StreamEvent::Error { .. }
    )
}

// ===== Entry points =====

/// Reconstruct the message described by an event sequence.
///
/// Never fails. An empty sequence yields a state with no model, no usage
/// and no blocks.
///
/// # Examples
///
/// ```
/// use sselens::parser::parse_raw_sse;
/// use sselens::reducer::reconstruct_message;
///
/// let raw = "data: {\"type\":\"content_block_start\",\"index\":0,\"content_block\":{\"type\":\"text\"}}\n\n\
///            data: {\"type\":\"content_block_delta\",\"index\":0,\"delta\":{\"type\":\"text_delta\",\"text\":\"hi\"}}\n\n";
/// let state = reconstruct_message(&parse_raw_sse(raw));
/// assert_eq!(state.block(0).and_then(|b| b.content()), Some("hi"));
/// ```
pub fn reconstruct_message(events: &[SseEvent]) -> MessageState {
    reconstruct_with(events, Strictness::Lenient).state
}

/// Reconstruct with an explicit [`Strictness`].
pub fn reconstruct_with(events: &[SseEvent], strictness: Strictness) -> Reconstruction {
    let mut reducer = MessageReducer::new(strictness);
    for event in events {
        reducer.apply(event);
    }
    reducer.finish()
}

#[cfg(test)]
#[path = "reducer_tests.rs"]
mod tests;
