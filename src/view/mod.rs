//! Report rendering (pure).
//!
//! Turns an [`crate::classifier::Inspection`] into the text or JSON written
//! to stdout. Nothing here performs I/O.

mod helpers;
pub mod report;

pub use helpers::format_tokens;
pub use report::{
    render_diagnostics, render_dialogue_summary, render_events, render_json, render_report,
    render_state, ReportOptions,
};
