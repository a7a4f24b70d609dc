//! Complete dialogue objects.
//!
//! A dialogue is an already-complete conversation (a request body with a
//! `messages` list). It is handed to the static visualizer unchanged; this
//! type only guards the shape and offers read-only accessors.

use serde::Serialize;
use serde_json::Value;

/// Key holding the ordered conversation messages.
pub const MESSAGES_KEY: &str = "messages";

/// A complete conversation object, kept exactly as parsed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Dialogue(Value);

impl Dialogue {
    /// Wrap a parsed value if it has a `messages` array.
    ///
    /// Returns the value back unchanged when the shape does not match.
    pub fn from_value(value: Value) -> Result<Self, Value> {
        if value.get(MESSAGES_KEY).is_some_and(Value::is_array) {
            Ok(Self(value))
        } else {
            Err(value)
        }
    }

    /// The untouched parsed value.
    pub fn value(&self) -> &Value {
        &self.0
    }

    /// Unwrap into the parsed value.
    pub fn into_value(self) -> Value {
        self.0
    }

    /// The ordered conversation entries.
    pub fn messages(&self) -> &[Value] {
        self.0
            .get(MESSAGES_KEY)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of conversation entries.
    pub fn message_count(&self) -> usize {
        self.messages().len()
    }

    /// Top-level `model` field, if present.
    pub fn model(&self) -> Option<&str> {
        self.0.get("model")?.as_str()
    }
}
