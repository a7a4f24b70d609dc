//! Domain model types (pure).
//!
//! All types in this module are pure data. Values that reach the reducer
//! have already been validated by the decoder; nothing here performs I/O.

pub mod diagnostic;
pub mod dialogue;
pub mod error;
pub mod event;
mod lenient;
pub mod malformed_payload;
pub mod state;
pub mod usage;

// Re-export for convenience
pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use dialogue::Dialogue;
pub use error::{AppError, DecodeError, InputError};
pub use event::{
    BlockStart, Delta, EventData, EventId, Frame, MessageDeltaBody, MessageStartBody, SseEvent,
    StreamErrorInfo, StreamEvent,
};
pub use malformed_payload::MalformedPayload;
pub use state::{BlockBody, ContentBlock, MessageState};
pub use usage::UsageInfo;
