//! Token usage counters.

use crate::model::lenient;
use serde::{Deserialize, Serialize};

/// Token usage accounting attached to a message.
///
/// Every field is independently optional: a counter that was never reported
/// stays `None` rather than defaulting to zero. A JSON `null`, or a value
/// that is not a non-negative integer, is read as "not reported".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageInfo {
    /// Uncached input tokens.
    #[serde(
        default,
        deserialize_with = "lenient::or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub input_tokens: Option<u64>,
    /// Generated output tokens.
    #[serde(
        default,
        deserialize_with = "lenient::or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub output_tokens: Option<u64>,
    /// Input tokens written to the prompt cache.
    #[serde(
        default,
        deserialize_with = "lenient::or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub cache_creation_input_tokens: Option<u64>,
    /// Input tokens served from the prompt cache.
    #[serde(
        default,
        deserialize_with = "lenient::or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub cache_read_input_tokens: Option<u64>,
}

impl UsageInfo {
    /// Merge a later report into this one, field by field.
    ///
    /// Fields present in `update` overwrite; fields absent from `update` keep
    /// their current value. A present field never regresses to `None`.
    pub fn merge(&mut self, update: &UsageInfo) {
        merge_field(&mut self.input_tokens, update.input_tokens);
        merge_field(&mut self.output_tokens, update.output_tokens);
        merge_field(
            &mut self.cache_creation_input_tokens,
            update.cache_creation_input_tokens,
        );
        merge_field(
            &mut self.cache_read_input_tokens,
            update.cache_read_input_tokens,
        );
    }

    /// All input tokens, cached or not. Unreported counters count as zero.
    ///
    /// Saturates at `u64::MAX`.
    pub fn total_input(&self) -> u64 {
        self.input_tokens
            .unwrap_or(0)
            .saturating_add(self.cache_creation_input_tokens.unwrap_or(0))
            .saturating_add(self.cache_read_input_tokens.unwrap_or(0))
    }

    /// Input plus output tokens. Unreported counters count as zero.
    ///
    /// Saturates at `u64::MAX`.
    pub fn total(&self) -> u64 {
        self.total_input().saturating_add(self.output_tokens.unwrap_or(0))
    }

    /// True when no counter has been reported.
    pub fn is_empty(&self) -> bool {
        *self == UsageInfo::default()
    }
}

fn merge_field(current: &mut Option<u64>, update: Option<u64>) {
    if update.is_some() {
        *current = update;
    }
}
