//! SSE Lens (sselens)
//!
//! Inspector for captured streaming-message transcripts. Splits a raw SSE
//! transcript into frames, decodes each payload, and folds the event
//! sequence into the message it describes. Complete dialogue objects are
//! recognized and passed through unchanged.
//!
//! The library follows a Pure Core / Impure Shell split: `parser`,
//! `reducer`, `classifier` and `view` are pure; `source`, `config` and
//! `logging` touch the outside world and are used by the binary.
//!
//! ```
//! use sselens::classifier::{inspect, Inspection};
//! use sselens::reducer::Strictness;
//!
//! let raw = "event: message_start\n\
//!            data: {\"type\":\"message_start\",\"message\":{\"model\":\"claude-haiku-4-5-20251001\"}}\n\n";
//! match inspect(raw, Strictness::Lenient) {
//!     Inspection::Transcript { reconstruction, .. } => {
//!         assert_eq!(reconstruction.state.model(), Some("claude-haiku-4-5-20251001"));
//!     }
//!     Inspection::Dialogue { .. } => unreachable!(),
//! }
//! ```

pub mod classifier;
pub mod config;
pub mod logging;
pub mod model;
pub mod parser;
pub mod reducer;
pub mod source;
pub mod view;

pub use classifier::{classify_input, inspect, InputMode, Inspection};
pub use parser::parse_raw_sse;
pub use reducer::{reconstruct_message, reconstruct_with, MessageReducer, Reconstruction, Strictness};
