//! Frame splitter for raw SSE transcripts.
//!
//! Splits buffered transcript text into blank-line-delimited frames. Text
//! before the first frame (an HTTP status line and headers, for instance)
//! is skipped without being validated.

use crate::model::Frame;

const FIELD_EVENT: &str = "event";
const FIELD_DATA: &str = "data";

/// Fields of the frame currently being assembled.
#[derive(Debug, Default)]
struct PendingFrame {
    event_name: Option<String>,
    payload: Option<String>,
}

impl PendingFrame {
    /// Finish the current frame, resetting for the next one.
    ///
    /// A frame without any `data:` line yields nothing.
    fn take(&mut self) -> Option<Frame> {
        let event_name = self.event_name.take().unwrap_or_default();
        let payload = self.payload.take()?;
        Some(Frame::new(event_name, payload))
    }
}

/// Split raw transcript text into ordered frames.
///
/// - `\n` and `\r\n` line endings are both accepted
/// - `data:` fragments are concatenated with no separator
/// - a frame without an `event:` line is anonymous (empty name)
/// - lines that are not `event:`/`data:` fields are ignored, which is what
///   discards a transport preamble
/// - the last frame is emitted even without a trailing blank line
///
/// Never fails; input without protocol structure yields an empty vec.
pub fn split_frames(raw: &str) -> Vec<Frame> {
    let mut frames = Vec::new();
    let mut pending = PendingFrame::default();

    for line in raw.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);

        if line.trim().is_empty() {
            frames.extend(pending.take());
            continue;
        }

        match parse_field(line) {
            Some((FIELD_EVENT, value)) => {
                pending.event_name = Some(value.trim().to_string());
            }
            Some((FIELD_DATA, value)) => {
                pending
                    .payload
                    .get_or_insert_with(String::new)
                    .push_str(value);
            }
            // Preamble, headers, id:/retry: fields and comments
            _ => {}
        }
    }

    frames.extend(pending.take());
    frames
}

/// Split `name: value` at the first colon, dropping one leading space.
fn parse_field(line: &str) -> Option<(&str, &str)> {
    let (field, value) = line.split_once(':')?;
    Some((field, value.strip_prefix(' ').unwrap_or(value)))
}
