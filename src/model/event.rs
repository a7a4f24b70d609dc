//! Protocol frames and decoded stream events.
//!
//! A [`Frame`] is the raw output of the splitter. An [`SseEvent`] is the
//! decoded form: its payload is either a structured value paired with its
//! typed interpretation ([`StreamEvent`]) or a [`MalformedPayload`] marker.

use crate::model::lenient;
use crate::model::{MalformedPayload, UsageInfo};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

// ===== EventId =====

/// Sequence ordinal assigned to each decoded event.
///
/// Identifiers are unique and increasing within one parse run. They carry
/// no protocol meaning and exist only as stable keys for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct EventId(u64);

impl EventId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw ordinal value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ===== Frame =====

/// One blank-line-delimited unit of a transcript.
///
/// The payload is the concatenation of every `data:` fragment in the frame,
/// not yet parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    event_name: String,
    payload_text: String,
}

impl Frame {
    /// Create a frame from its event name and payload text.
    pub fn new(event_name: impl Into<String>, payload_text: impl Into<String>) -> Self {
        Self {
            event_name: event_name.into(),
            payload_text: payload_text.into(),
        }
    }

    /// Name from the `event:` line, empty for anonymous frames.
    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    /// Concatenated `data:` fragments.
    pub fn payload_text(&self) -> &str {
        &self.payload_text
    }

    /// True when the frame had no `event:` line.
    pub fn is_anonymous(&self) -> bool {
        self.event_name.is_empty()
    }

    pub(crate) fn into_parts(self) -> (String, String) {
        (self.event_name, self.payload_text)
    }
}

// ===== SseEvent =====

/// A decoded frame.
///
/// Events are kept in arrival order; the sequence is never reordered or
/// deduplicated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SseEvent {
    id: EventId,
    name: String,
    data: EventData,
}

impl SseEvent {
    /// Create a new event.
    pub fn new(id: EventId, name: impl Into<String>, data: EventData) -> Self {
        Self {
            id,
            name: name.into(),
            data,
        }
    }

    /// Sequence identifier.
    pub fn id(&self) -> EventId {
        self.id
    }

    /// Frame name from the `event:` line (may be empty).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Decoded payload or failure marker.
    pub fn data(&self) -> &EventData {
        &self.data
    }

    /// Typed interpretation, `None` for malformed payloads.
    pub fn kind(&self) -> Option<&StreamEvent> {
        match &self.data {
            EventData::Decoded { kind, .. } => Some(kind),
            EventData::Malformed(_) => None,
        }
    }

    /// Parsed payload value, `None` for malformed payloads.
    pub fn value(&self) -> Option<&Value> {
        match &self.data {
            EventData::Decoded { value, .. } => Some(value),
            EventData::Malformed(_) => None,
        }
    }

    /// True when the payload failed to parse.
    pub fn is_malformed(&self) -> bool {
        matches!(self.data, EventData::Malformed(_))
    }

    /// The payload's own `type` tag, if it has one.
    ///
    /// The reducer dispatches on this tag rather than on [`SseEvent::name`].
    pub fn type_tag(&self) -> Option<&str> {
        self.value()?.get("type")?.as_str()
    }
}

/// Payload of an [`SseEvent`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EventData {
    /// Payload parsed as JSON.
    Decoded {
        /// The parsed value, unchanged.
        value: Value,
        /// Typed interpretation validated at decode time.
        #[serde(skip)]
        kind: StreamEvent,
    },
    /// Payload could not be parsed.
    Malformed(MalformedPayload),
}

// ===== StreamEvent =====

/// Closed set of protocol event kinds.
///
/// Produced once by the decoder so that the reducer can match exhaustively
/// instead of probing fields.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Opens the message and carries its metadata.
    MessageStart {
        /// Embedded message object.
        message: MessageStartBody,
    },
    /// Creates a content block at `index`.
    ContentBlockStart {
        /// Block index.
        index: usize,
        /// Declared block type.
        content_block: BlockStart,
    },
    /// Appends a fragment to the block at `index`.
    ContentBlockDelta {
        /// Block index.
        index: usize,
        /// Fragment and its sub-kind.
        delta: Delta,
    },
    /// Seals the block at `index`.
    ContentBlockStop {
        /// Block index.
        index: usize,
    },
    /// Incremental top-level update.
    MessageDelta {
        /// Top-level fields such as `stop_reason`.
        #[serde(default, deserialize_with = "lenient::or_default")]
        delta: MessageDeltaBody,
        /// Refined usage counters.
        #[serde(default, deserialize_with = "lenient::or_default")]
        usage: Option<UsageInfo>,
    },
    /// Terminal marker.
    MessageStop,
    /// Keep-alive.
    Ping,
    /// Error reported in-stream by the server.
    Error {
        /// Error details.
        error: StreamErrorInfo,
    },
    /// Known or absent `type` tag whose payload does not have the expected shape.
    #[serde(skip)]
    Invalid {
        /// The payload's `type` tag, if present.
        kind: Option<String>,
        /// Why the payload was rejected.
        reason: String,
    },
    /// `type` tag outside the protocol's known kinds.
    #[serde(other)]
    Unrecognized,
}

impl StreamEvent {
    /// Interpret a parsed payload value.
    ///
    /// Never fails: shape mismatches become [`StreamEvent::Invalid`].
    pub fn from_value(value: &Value) -> Self {
        match StreamEvent::deserialize(value) {
            Ok(kind) => kind,
            Err(e) => StreamEvent::Invalid {
                kind: value
                    .get("type")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                reason: e.to_string(),
            },
        }
    }

    /// Protocol name of this kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            StreamEvent::MessageStart { .. } => "message_start",
            StreamEvent::ContentBlockStart { .. } => "content_block_start",
            StreamEvent::ContentBlockDelta { .. } => "content_block_delta",
            StreamEvent::ContentBlockStop { .. } => "content_block_stop",
            StreamEvent::MessageDelta { .. } => "message_delta",
            StreamEvent::MessageStop => "message_stop",
            StreamEvent::Ping => "ping",
            StreamEvent::Error { .. } => "error",
            StreamEvent::Invalid { .. } => "invalid",
            StreamEvent::Unrecognized => "unrecognized",
        }
    }

    /// Block index addressed by this event, if any.
    pub fn block_index(&self) -> Option<usize> {
        match self {
            StreamEvent::ContentBlockStart { index, .. }
            | StreamEvent::ContentBlockDelta { index, .. }
            | StreamEvent::ContentBlockStop { index } => Some(*index),
            _ => None,
        }
    }
}

/// Message object embedded in `message_start`.
///
/// Only the fields the reducer consumes are modeled; `content`, `type` and
/// the rest are left in the raw value. A field of the wrong type is read as
/// absent without discarding its siblings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MessageStartBody {
    /// Message identifier.
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub id: Option<String>,
    /// Author role, normally `assistant`.
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub role: Option<String>,
    /// Model identifier.
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub model: Option<String>,
    /// Initial usage counters.
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub usage: Option<UsageInfo>,
}

/// Top-level fields carried by `message_delta`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MessageDeltaBody {
    /// Why generation stopped.
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub stop_reason: Option<String>,
    /// The stop sequence that matched, if any.
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub stop_sequence: Option<String>,
}

/// Error details from an in-stream `error` event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamErrorInfo {
    /// Error category (e.g. `overloaded_error`).
    #[serde(rename = "type", default, deserialize_with = "lenient::or_default")]
    pub error_type: String,
    /// Human-readable message.
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub message: String,
}

// ===== BlockStart =====

/// Declared type of a block opened by `content_block_start`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawBlockStart")]
pub enum BlockStart {
    /// Extended thinking block.
    Thinking,
    /// Visible text block.
    Text,
    /// Tool invocation.
    ToolUse {
        /// Tool use identifier.
        id: Option<String>,
        /// Tool name, copied verbatim.
        name: String,
    },
    /// Any other block type, kept so indices stay faithful.
    Other {
        /// The declared type tag.
        block_type: String,
    },
}

#[derive(Debug, Deserialize)]
struct RawBlockStart {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default, deserialize_with = "lenient::or_default")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    name: Option<String>,
}

impl From<RawBlockStart> for BlockStart {
    fn from(raw: RawBlockStart) -> Self {
        match raw.block_type.as_str() {
            "thinking" => BlockStart::Thinking,
            "text" => BlockStart::Text,
            "tool_use" => BlockStart::ToolUse {
                id: raw.id,
                name: raw.name.unwrap_or_default(),
            },
            _ => BlockStart::Other {
                block_type: raw.block_type,
            },
        }
    }
}

// ===== Delta =====

/// Fragment carried by `content_block_delta`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Delta {
    /// Fragment of visible text.
    TextDelta {
        /// Text to append.
        text: String,
    },
    /// Fragment of thinking text.
    ThinkingDelta {
        /// Thinking text to append.
        thinking: String,
    },
    /// Fragment of a tool's JSON arguments; not parseable on its own.
    InputJsonDelta {
        /// Raw JSON text to append.
        partial_json: String,
    },
    /// Fragment of a thinking block's signature.
    SignatureDelta {
        /// Signature text to append.
        signature: String,
    },
    /// Delta sub-kind outside the known set.
    #[serde(other)]
    Unrecognized,
}

impl Delta {
    /// Protocol name of this delta sub-kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Delta::TextDelta { .. } => "text_delta",
            Delta::ThinkingDelta { .. } => "thinking_delta",
            Delta::InputJsonDelta { .. } => "input_json_delta",
            Delta::SignatureDelta { .. } => "signature_delta",
            Delta::Unrecognized => "unrecognized",
        }
    }
}
