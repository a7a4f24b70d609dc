//! SSE transcript decoder.
//!
//! This module provides pure functions converting raw transcript text into
//! an ordered sequence of [`SseEvent`]s. Decoding never fails as a whole:
//! a frame whose payload cannot be parsed becomes a
//! [`MalformedPayload`] event in place and decoding continues.

mod frame;

pub use frame::split_frames;

use crate::model::{
    DecodeError, EventData, EventId, Frame, MalformedPayload, SseEvent, StreamEvent,
};
use serde_json::Value;
use tracing::debug;

/// Result of decoding a single payload with graceful error handling.
pub type DecodeResult = Result<(Value, StreamEvent), DecodeError>;

/// Decode a full transcript into events.
///
/// Events are returned in frame order with identifiers assigned
/// sequentially from 0. Text with no recognizable frames (including blank
/// input) yields an empty vec.
///
/// # Examples
///
/// ```
/// use sselens::parser::parse_raw_sse;
///
/// let events = parse_raw_sse("event: ping\ndata: {\"type\":\"ping\"}\n\n");
/// assert_eq!(events.len(), 1);
/// assert_eq!(events[0].name(), "ping");
/// assert_eq!(events[0].type_tag(), Some("ping"));
/// ```
pub fn parse_raw_sse(raw: &str) -> Vec<SseEvent> {
    let events: Vec<SseEvent> = split_frames(raw)
        .into_iter()
        .zip(0u64..)
        .map(|(frame, ordinal)| decode_frame(frame, EventId::new(ordinal)))
        .collect();

    let malformed = events.iter().filter(|e| e.is_malformed()).count();
    debug!(
        events = events.len(),
        malformed,
        input_bytes = raw.len(),
        "Decoded SSE transcript"
    );

    events
}

/// Decode one frame into an event with the given identifier.
///
/// Unlike [`decode_payload`], this never returns an error. A payload that
/// fails to parse is kept verbatim in a [`MalformedPayload`] marker so it
/// can be displayed inline.
pub fn decode_frame(frame: Frame, id: EventId) -> SseEvent {
    let (name, payload) = frame.into_parts();

    let data = match decode_payload(&payload) {
        Ok((value, kind)) => {
            if let StreamEvent::Invalid { kind: tag, reason } = &kind {
                debug!(event_id = %id, ?tag, %reason, "Payload has unexpected shape");
            }
            EventData::Decoded { value, kind }
        }
        Err(error) => {
            debug!(event_id = %id, name = %name, error = %error, "Malformed SSE payload");
            EventData::Malformed(MalformedPayload::new(payload, error))
        }
    };

    SseEvent::new(id, name, data)
}

/// Parse a payload and interpret it as a protocol event.
///
/// # Errors
///
/// Returns [`DecodeError::EmptyPayload`] when the payload is empty or
/// whitespace, and [`DecodeError::InvalidJson`] when it is not valid JSON.
/// Valid JSON of an unexpected shape is not an error here; it decodes to
/// [`StreamEvent::Invalid`] or [`StreamEvent::Unrecognized`].
pub fn decode_payload(payload: &str) -> DecodeResult {
    if payload.trim().is_empty() {
        return Err(DecodeError::EmptyPayload);
    }

    let value: Value = serde_json::from_str(payload).map_err(|e| DecodeError::from_json(&e))?;
    let kind = StreamEvent::from_value(&value);
    Ok((value, kind))
}
