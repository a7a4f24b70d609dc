//! Tolerant field deserializers.
//!
//! A nested field of the wrong JSON type degrades to its default instead of
//! rejecting the enclosing event, so valid sibling fields still apply.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserialize a field, falling back to `T::default()` when the value does
/// not have the expected shape.
pub(crate) fn or_default<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: DeserializeOwned + Default,
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}
