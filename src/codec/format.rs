//! Type-aware text formatting for composite key values
//!
//! Output is stable: the same value always formats to the same text, so
//! composite values compare correctly as opaque strings.

use serde_json::{Number, Value};

/// Formats a bound value as key text.
///
/// - booleans: `true` / `false`
/// - numbers: plain decimal, never exponent notation
/// - strings: verbatim
/// - arrays (multi-valued types): elements formatted and comma-joined
/// - null: `null`; objects: compact JSON with sorted keys
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(format_value).collect::<Vec<_>>().join(","),
        Value::Object(_) => value.to_string(),
    }
}

fn format_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        // -0 and 0 must produce the same key
        Some(f) if f == 0.0 => "0".to_string(),
        // f64 Display is shortest round-trip decimal without an exponent
        Some(f) => format!("{}", f),
        None => n.to_string(),
    }
}
