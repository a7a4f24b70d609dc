//! Plain-text and JSON reports.
//!
//! Each `render_*` function produces one section as a list of lines.
//! Sections are joined with a blank line between them.

use crate::classifier::Inspection;
use crate::config::ResolvedConfig;
use crate::model::{
    BlockBody, ContentBlock, Diagnostic, Dialogue, EventData, MessageState, SseEvent,
    StreamErrorInfo, StreamEvent, UsageInfo,
};
use crate::view::helpers::{
    format_tokens, indented_lines, key_value_line, BODY_INDENT, ENTRY_INDENT,
};
use serde_json::Value;

/// Shown in place of a stop reason while the stream is still open.
pub const STREAMING_PLACEHOLDER: &str = "streaming...";

/// Shown in place of a missing model.
pub const UNKNOWN_MODEL: &str = "unknown";

/// What the text report includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    /// List every decoded event.
    pub show_events: bool,
    /// Print thinking signatures.
    pub show_signature: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            show_events: false,
            show_signature: true,
        }
    }
}

impl From<&ResolvedConfig> for ReportOptions {
    fn from(config: &ResolvedConfig) -> Self {
        Self {
            show_events: config.show_events,
            show_signature: config.show_signature,
        }
    }
}

/// Render the full text report for an inspection.
pub fn render_report(inspection: &Inspection, options: &ReportOptions) -> String {
    let lines = match inspection {
        Inspection::Dialogue { dialogue } => render_dialogue_summary(dialogue),
        Inspection::Transcript {
            events,
            reconstruction,
        } => {
            let mut sections = state_sections(&reconstruction.state, options);
            if options.show_events {
                sections.push(render_events(events));
            }
            if !reconstruction.diagnostics.is_empty() {
                sections.push(render_diagnostics(&reconstruction.diagnostics));
            }
            join_sections(sections)
        }
    };

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Render the inspection as pretty-printed JSON.
///
/// # Errors
///
/// Returns the serializer error; with in-memory values this does not
/// happen in practice.
pub fn render_json(inspection: &Inspection) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(inspection)
}

/// Render the reconstructed message: metadata, usage, blocks and error.
pub fn render_state(state: &MessageState, options: &ReportOptions) -> Vec<String> {
    join_sections(state_sections(state, options))
}

fn state_sections(state: &MessageState, options: &ReportOptions) -> Vec<Vec<String>> {
    let mut sections = vec![render_message_header(state)];
    if let Some(usage) = state.usage() {
        sections.push(render_usage(usage));
    }
    if state.block_count() > 0 {
        sections.push(render_blocks(state, options));
    }
    if let Some(error) = state.error() {
        sections.push(render_error(error));
    }
    sections
}

fn render_message_header(state: &MessageState) -> Vec<String> {
    let mut lines = vec!["Message".to_string()];

    if state.is_empty() && state.usage().is_none() && state.error().is_none() {
        lines.push(format!("{ENTRY_INDENT}No message reconstructed."));
        return lines;
    }

    lines.push(key_value_line("model", state.model().unwrap_or(UNKNOWN_MODEL)));
    if let Some(id) = state.id() {
        lines.push(key_value_line("id", id));
    }
    if let Some(role) = state.role() {
        lines.push(key_value_line("role", role));
    }
    lines.push(key_value_line(
        "stop_reason",
        state.stop_reason().unwrap_or(STREAMING_PLACEHOLDER),
    ));
    if let Some(stop_sequence) = state.stop_sequence() {
        lines.push(key_value_line("stop_sequence", stop_sequence));
    }
    lines
}

/// Usage counters; unreported counters are omitted rather than shown as zero.
fn render_usage(usage: &UsageInfo) -> Vec<String> {
    let mut lines = vec!["Usage".to_string()];

    let counters = [
        ("input", usage.input_tokens),
        ("output", usage.output_tokens),
        ("cache creation", usage.cache_creation_input_tokens),
        ("cache read", usage.cache_read_input_tokens),
    ];
    for (key, value) in counters {
        if let Some(value) = value {
            lines.push(key_value_line(key, format_tokens(value)));
        }
    }

    if !usage.is_empty() {
        lines.push(key_value_line("total input", format_tokens(usage.total_input())));
        lines.push(key_value_line("total", format_tokens(usage.total())));
    }
    lines
}

fn render_blocks(state: &MessageState, options: &ReportOptions) -> Vec<String> {
    let mut lines = vec![format!("Content blocks ({})", state.block_count())];
    for block in state.blocks() {
        lines.extend(render_block(block, options));
    }
    lines
}

fn render_block(block: &ContentBlock, options: &ReportOptions) -> Vec<String> {
    let status = if block.is_closed() { "closed" } else { "open" };
    let mut lines = Vec::new();

    match block.body() {
        BlockBody::Thinking { content, signature } => {
            lines.push(format!("{ENTRY_INDENT}[{}] thinking ({status})", block.index()));
            lines.extend(indented_lines(content, BODY_INDENT));
            if options.show_signature && !signature.is_empty() {
                lines.push(format!("{BODY_INDENT}signature: {signature}"));
            }
        }
        BlockBody::Text { content } => {
            lines.push(format!("{ENTRY_INDENT}[{}] text ({status})", block.index()));
            lines.extend(indented_lines(content, BODY_INDENT));
        }
        BlockBody::ToolUse { id, name, input } => {
            lines.push(format!(
                "{ENTRY_INDENT}[{}] tool_use {name} ({status})",
                block.index()
            ));
            if let Some(id) = id {
                lines.push(format!("{BODY_INDENT}id: {id}"));
            }
            let input = if input.is_empty() { "{}" } else { input.as_str() };
            lines.push(format!("{BODY_INDENT}input: {input}"));
        }
        BlockBody::Other { block_type } => {
            lines.push(format!(
                "{ENTRY_INDENT}[{}] {block_type} ({status})",
                block.index()
            ));
        }
    }
    lines
}

fn render_error(error: &StreamErrorInfo) -> Vec<String> {
    vec![
        "Error".to_string(),
        format!("{ENTRY_INDENT}{}: {}", error.error_type, error.message),
    ]
}

/// One line per decoded event, in arrival order.
pub fn render_events(events: &[SseEvent]) -> Vec<String> {
    let mut lines = vec![format!("Events ({})", events.len())];

    for event in events {
        let name = if event.name().is_empty() {
            "(anonymous)"
        } else {
            event.name()
        };

        let annotation = match event.data() {
            EventData::Malformed(marker) => format!(" [malformed: {}]", marker.error_message()),
            EventData::Decoded {
                kind: StreamEvent::Invalid { .. },
                ..
            } => " [invalid]".to_string(),
            EventData::Decoded {
                kind: StreamEvent::Unrecognized,
                ..
            } => format!(" [unrecognized: {}]", event.type_tag().unwrap_or("?")),
            EventData::Decoded { .. } => match event.type_tag() {
                Some(tag) if tag != name => format!(" [type: {tag}]"),
                _ => String::new(),
            },
        };

        lines.push(format!("{ENTRY_INDENT}{} {name}{annotation}", event.id()));
    }
    lines
}

/// One line per diagnostic.
pub fn render_diagnostics(diagnostics: &[Diagnostic]) -> Vec<String> {
    let mut lines = vec![format!("Diagnostics ({})", diagnostics.len())];
    lines.extend(
        diagnostics
            .iter()
            .map(|diagnostic| format!("{ENTRY_INDENT}{diagnostic}")),
    );
    lines
}

/// Overview of a complete dialogue: model, count, and one line per entry.
pub fn render_dialogue_summary(dialogue: &Dialogue) -> Vec<String> {
    let mut lines = vec![
        "Dialogue".to_string(),
        key_value_line("model", dialogue.model().unwrap_or(UNKNOWN_MODEL)),
        key_value_line("messages", dialogue.message_count()),
    ];

    if dialogue.message_count() > 0 {
        lines.push(String::new());
        for (position, entry) in dialogue.messages().iter().enumerate() {
            lines.push(format!(
                "{ENTRY_INDENT}[{position}] {}: {}",
                entry_role(entry),
                entry_content_kinds(entry)
            ));
        }
    }
    lines
}

fn entry_role(entry: &Value) -> &str {
    entry
        .get("role")
        .and_then(Value::as_str)
        .unwrap_or("unknown")
}

fn entry_content_kinds(entry: &Value) -> String {
    match entry.get("content") {
        Some(Value::String(_)) => "text".to_string(),
        Some(Value::Array(blocks)) if !blocks.is_empty() => blocks
            .iter()
            .map(|block| block.get("type").and_then(Value::as_str).unwrap_or("unknown"))
            .collect::<Vec<_>>()
            .join(", "),
        _ => "no content".to_string(),
    }
}

fn join_sections(sections: Vec<Vec<String>>) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, section) in sections.into_iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.extend(section);
    }
    lines
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
