//! Composite key codec
//!
//! A composite key joins its parts with `#`: literal parts contribute their
//! text, reference parts contribute the attribute name (for the key name) or
//! the formatted bound value (for the key value). There is no decoder; the
//! store compares composite values as opaque strings.
//!
//! Splitting a key value on `#` recovers the per-part text only when no
//! literal or bound value itself contains `#`.

use serde_json::Value;

use super::format::format_value;
use crate::schema::KeyPart;

/// Separator between composite key parts
pub const KEY_SEPARATOR: char = '#';

/// Source of equality-bound values for key parts.
pub trait KeySource {
    /// Value bound by equality to `attribute`, if any
    fn equality_value(&self, attribute: &str) -> Option<&Value>;
}

impl KeySource for std::collections::HashMap<String, Value> {
    fn equality_value(&self, attribute: &str) -> Option<&Value> {
        self.get(attribute)
    }
}

impl KeySource for std::collections::BTreeMap<String, Value> {
    fn equality_value(&self, attribute: &str) -> Option<&Value> {
        self.get(attribute)
    }
}

/// Schema-level name of the key attribute.
///
/// A single part is named by its own text; several parts are joined in
/// declaration order. Deterministic for a given part sequence.
pub fn key_name(parts: &[KeyPart]) -> String {
    match parts {
        [single] => single.text().to_string(),
        _ => parts
            .iter()
            .map(KeyPart::text)
            .collect::<Vec<_>>()
            .join(&KEY_SEPARATOR.to_string()),
    }
}

/// Key value for the given bindings, or None if some reference part is unbound.
pub fn key_value<S: KeySource + ?Sized>(parts: &[KeyPart], source: &S) -> Option<String> {
    let mut segments = Vec::with_capacity(parts.len());
    for part in parts {
        match part {
            KeyPart::Literal(text) => segments.push(text.clone()),
            KeyPart::Reference(name) => segments.push(format_value(source.equality_value(name)?)),
        }
    }
    Some(segments.join(&KEY_SEPARATOR.to_string()))
}

/// True iff every reference part has an equality-bound value.
pub fn all_parts_bound<S: KeySource + ?Sized>(parts: &[KeyPart], source: &S) -> bool {
    parts
        .iter()
        .filter_map(KeyPart::attribute)
        .all(|name| source.equality_value(name).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn reference(name: &str) -> KeyPart {
        KeyPart::Reference(name.to_string())
    }

    fn literal(text: &str) -> KeyPart {
        KeyPart::Literal(text.to_string())
    }

    fn bindings(pairs: &[(&str, Value)]) -> HashMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_key_name_single_part_has_no_separator() {
        assert_eq!(key_name(&[reference("status")]), "status");
    }

    #[test]
    fn test_key_name_joins_in_order() {
        let parts = [reference("category"), reference("is_published")];
        assert_eq!(key_name(&parts), "category#is_published");

        let with_literal = [literal("POST"), reference("category")];
        assert_eq!(key_name(&with_literal), "POST#category");
    }

    #[test]
    fn test_key_name_is_deterministic() {
        let parts = [reference("a"), literal("x"), reference("b")];
        let first = key_name(&parts);
        for _ in 0..100 {
            assert_eq!(key_name(&parts), first);
        }
    }

    #[test]
    fn test_key_value_formats_by_type() {
        let parts = [reference("category"), reference("is_published")];
        let b = bindings(&[("category", json!("tech")), ("is_published", json!(true))]);
        assert_eq!(key_value(&parts, &b).as_deref(), Some("tech#true"));
    }

    #[test]
    fn test_key_value_with_literal_and_number() {
        let parts = [literal("v2"), reference("year"), reference("tags")];
        let b = bindings(&[("year", json!(2024)), ("tags", json!(["a", "b"]))]);
        assert_eq!(key_value(&parts, &b).as_deref(), Some("v2#2024#a,b"));
    }

    #[test]
    fn test_key_value_unbound_part() {
        let parts = [reference("category"), reference("is_published")];
        let b = bindings(&[("category", json!("tech"))]);
        assert_eq!(key_value(&parts, &b), None);
        assert!(!all_parts_bound(&parts, &b));
    }

    #[test]
    fn test_all_parts_bound_ignores_literals() {
        let parts = [literal("v1"), reference("category")];
        let b = bindings(&[("category", json!("tech"))]);
        assert!(all_parts_bound(&parts, &b));
    }

    #[test]
    fn test_resplit_recovers_parts() {
        let parts = [reference("a"), literal("mid"), reference("b")];
        let b = bindings(&[("a", json!("left")), ("b", json!(7))]);
        let value = key_value(&parts, &b).unwrap();
        let split: Vec<&str> = value.split(KEY_SEPARATOR).collect();
        assert_eq!(split, vec!["left", "mid", "7"]);
    }
}
