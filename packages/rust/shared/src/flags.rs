//! Boolean coercion for string-valued configuration flags.

use serde_json::Value;

use crate::types::Metadata;

/// Interpret a configuration string as a boolean.
///
/// Only `yes`, `true`, `t`, `1` and `on` (case-insensitive) are true.
/// Every other input, including surrounding whitespace, is false.
pub fn str2bool(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "yes" | "true" | "t" | "1" | "on"
    )
}

/// Replace a string metadata value with its [`str2bool`] interpretation.
///
/// Absent keys and values that are not strings are left untouched.
pub fn coerce_flag(metadata: &mut Metadata, key: &str) {
    if let Some(Value::String(raw)) = metadata.get(key) {
        let flag = str2bool(raw);
        tracing::debug!(key, raw = %raw, flag, "coerced metadata flag");
        metadata.insert(key.to_string(), Value::Bool(flag));
    }
}
