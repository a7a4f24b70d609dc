//! Reconstructed message state.
//!
//! [`MessageState`] is the fold result of one reduction run. Content blocks
//! live in a sparse map keyed by their protocol index, so a block is only
//! ever addressed by the index it was created at.

use crate::model::{BlockStart, Delta, StreamErrorInfo, UsageInfo};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

// ===== BlockBody =====

/// Type-specific accumulators of a content block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockBody {
    /// Extended thinking.
    Thinking {
        /// Accumulated thinking text.
        content: String,
        /// Accumulated opaque signature.
        signature: String,
    },
    /// Visible text.
    Text {
        /// Accumulated text.
        content: String,
    },
    /// Tool invocation.
    ToolUse {
        /// Tool use identifier from the start event.
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        /// Tool name.
        name: String,
        /// Accumulated raw JSON arguments; may be incomplete.
        input: String,
    },
    /// Block type without accumulators.
    Other {
        /// The declared type tag.
        block_type: String,
    },
}

impl BlockBody {
    /// Empty accumulators for a freshly started block.
    pub fn from_start(start: &BlockStart) -> Self {
        match start {
            BlockStart::Thinking => BlockBody::Thinking {
                content: String::new(),
                signature: String::new(),
            },
            BlockStart::Text => BlockBody::Text {
                content: String::new(),
            },
            BlockStart::ToolUse { id, name } => BlockBody::ToolUse {
                id: id.clone(),
                name: name.clone(),
                input: String::new(),
            },
            BlockStart::Other { block_type } => BlockBody::Other {
                block_type: block_type.clone(),
            },
        }
    }

    /// Append a delta fragment to the matching accumulator.
    ///
    /// Returns `false`, leaving the body untouched, when the delta sub-kind
    /// does not belong to this block type.
    pub(crate) fn append(&mut self, delta: &Delta) -> bool {
        match (self, delta) {
            (BlockBody::Thinking { content, .. }, Delta::ThinkingDelta { thinking }) => {
                content.push_str(thinking);
            }
            (BlockBody::Thinking { signature, .. }, Delta::SignatureDelta { signature: s }) => {
                signature.push_str(s);
            }
            (BlockBody::Text { content }, Delta::TextDelta { text }) => {
                content.push_str(text);
            }
            (BlockBody::ToolUse { input, .. }, Delta::InputJsonDelta { partial_json }) => {
                input.push_str(partial_json);
            }
            _ => return false,
        }
        true
    }

    /// Protocol type tag of this block.
    pub fn type_name(&self) -> &str {
        match self {
            BlockBody::Thinking { .. } => "thinking",
            BlockBody::Text { .. } => "text",
            BlockBody::ToolUse { .. } => "tool_use",
            BlockBody::Other { block_type } => block_type,
        }
    }
}

// ===== ContentBlock =====

/// An index-addressed unit of message content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentBlock {
    index: usize,
    #[serde(flatten)]
    body: BlockBody,
    closed: bool,
}

impl ContentBlock {
    /// Create an open block.
    pub fn new(index: usize, body: BlockBody) -> Self {
        Self {
            index,
            body,
            closed: false,
        }
    }

    /// Index assigned at creation.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Type-specific accumulators.
    pub fn body(&self) -> &BlockBody {
        &self.body
    }

    /// Protocol type tag.
    pub fn type_name(&self) -> &str {
        self.body.type_name()
    }

    /// True once a `content_block_stop` was seen for this block.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Accumulated text of a thinking or text block.
    pub fn content(&self) -> Option<&str> {
        match &self.body {
            BlockBody::Thinking { content, .. } | BlockBody::Text { content } => Some(content),
            _ => None,
        }
    }

    /// Accumulated signature of a thinking block.
    pub fn signature(&self) -> Option<&str> {
        match &self.body {
            BlockBody::Thinking { signature, .. } => Some(signature),
            _ => None,
        }
    }

    /// Tool name of a tool_use block.
    pub fn tool_name(&self) -> Option<&str> {
        match &self.body {
            BlockBody::ToolUse { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Raw accumulated JSON arguments of a tool_use block.
    pub fn input_json(&self) -> Option<&str> {
        match &self.body {
            BlockBody::ToolUse { input, .. } => Some(input),
            _ => None,
        }
    }

    /// Parse the accumulated tool arguments.
    ///
    /// The reducer never parses this itself; the text may be incomplete for
    /// a truncated stream. Empty input parses as an empty object.
    pub fn parsed_input(&self) -> Option<Result<serde_json::Value, serde_json::Error>> {
        let input = self.input_json()?;
        if input.is_empty() {
            return Some(Ok(serde_json::Value::Object(serde_json::Map::new())));
        }
        Some(serde_json::from_str(input))
    }

    pub(crate) fn append(&mut self, delta: &Delta) -> bool {
        self.body.append(delta)
    }

    pub(crate) fn close(&mut self) {
        self.closed = true;
    }
}

// ===== MessageState =====

/// Message reconstructed from an ordered event sequence.
///
/// Invariant: blocks only grow. Once a block exists at an index it is never
/// removed; it can only be appended to, sealed, or replaced by a later
/// start at the same index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MessageState {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop_sequence: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    usage: Option<UsageInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<StreamErrorInfo>,
    #[serde(serialize_with = "serialize_blocks")]
    blocks: BTreeMap<usize, ContentBlock>,
}

fn serialize_blocks<S: Serializer>(
    blocks: &BTreeMap<usize, ContentBlock>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(blocks.values())
}

impl MessageState {
    /// Empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Message identifier from `message_start`.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Author role from `message_start`.
    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    /// Model identifier.
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    /// Stop reason; `None` while the stream is still open.
    pub fn stop_reason(&self) -> Option<&str> {
        self.stop_reason.as_deref()
    }

    /// Matched stop sequence.
    pub fn stop_sequence(&self) -> Option<&str> {
        self.stop_sequence.as_deref()
    }

    /// Usage counters; `None` until a usage object is seen.
    pub fn usage(&self) -> Option<&UsageInfo> {
        self.usage.as_ref()
    }

    /// In-stream error, if the server reported one.
    pub fn error(&self) -> Option<&StreamErrorInfo> {
        self.error.as_ref()
    }

    /// Blocks in index order.
    pub fn blocks(&self) -> impl Iterator<Item = &ContentBlock> {
        self.blocks.values()
    }

    /// Block at `index`.
    pub fn block(&self, index: usize) -> Option<&ContentBlock> {
        self.blocks.get(&index)
    }

    /// Indices of all blocks, ascending.
    pub fn block_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.blocks.keys().copied()
    }

    /// Number of blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// True when nothing has been reconstructed yet.
    pub fn is_empty(&self) -> bool {
        self.model.is_none() && self.blocks.is_empty()
    }

    pub(crate) fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }

    pub(crate) fn set_role(&mut self, role: String) {
        self.role = Some(role);
    }

    pub(crate) fn set_model(&mut self, model: String) {
        self.model = Some(model);
    }

    pub(crate) fn set_stop_reason(&mut self, stop_reason: String) {
        self.stop_reason = Some(stop_reason);
    }

    pub(crate) fn set_stop_sequence(&mut self, stop_sequence: String) {
        self.stop_sequence = Some(stop_sequence);
    }

    pub(crate) fn set_error(&mut self, error: StreamErrorInfo) {
        self.error = Some(error);
    }

    pub(crate) fn merge_usage(&mut self, update: &UsageInfo) {
        self.usage.get_or_insert_with(UsageInfo::default).merge(update);
    }

    /// Insert a block, returning the block it replaced.
    pub(crate) fn insert_block(&mut self, block: ContentBlock) -> Option<ContentBlock> {
        self.blocks.insert(block.index(), block)
    }

    pub(crate) fn block_mut(&mut self, index: usize) -> Option<&mut ContentBlock> {
        self.blocks.get_mut(&index)
    }
}
