//! Structural validation of table schemas
//!
//! Rules enforced (all FATAL):
//! - Table hash/range keys name declared attributes
//! - Attribute and index names are unique
//! - Every key reference resolves; composite keys reference at least one
//!   attribute and contain no empty segment
//! - Local indexes reuse the table hash key, declare a range key, and carry
//!   no capacity
//! - Global indexes declare a non-empty hash key
//! - INCLUDE projection iff included attributes are present, all declared
//! - Refined numeric kinds only annotate NUMBER / NUMBER_SET

use std::collections::HashSet;

use super::errors::{SchemaError, SchemaResult};
use super::types::{IndexDescriptor, IndexKey, IndexKind, KeyPart, Projection, TableSchema};

/// Validates the schema structure itself. Deterministic: errors are reported
/// for the first offending item in declaration order.
pub fn validate_structure(schema: &TableSchema) -> SchemaResult<()> {
    let mut seen = HashSet::new();
    for attr in schema.attributes() {
        if !seen.insert(attr.name.as_str()) {
            return Err(SchemaError::duplicate_attribute(&attr.name));
        }
        if attr.refined_kind.is_some() && !attr.declared_type.is_numeric() {
            return Err(SchemaError::invalid_subtype(
                &attr.name,
                format!("not allowed on {}", attr.declared_type),
            ));
        }
    }

    if schema.attribute(schema.hash_key()).is_none() {
        return Err(SchemaError::unknown_attribute(schema.hash_key(), "table hash key"));
    }
    if let Some(range) = schema.range_key() {
        if schema.attribute(range).is_none() {
            return Err(SchemaError::unknown_attribute(range, "table range key"));
        }
    }

    let mut names = HashSet::new();
    for index in schema.indexes() {
        if !names.insert(index.name.as_str()) {
            return Err(SchemaError::duplicate_index(&index.name));
        }
        validate_index(schema, index)?;
    }

    Ok(())
}

fn validate_index(schema: &TableSchema, index: &IndexDescriptor) -> SchemaResult<()> {
    match index.kind {
        IndexKind::Local => {
            if index.hash_key.as_simple() != Some(schema.hash_key()) {
                return Err(SchemaError::local_index_invalid(
                    &index.name,
                    format!(
                        "hash key must be the table hash key '{}', found '{}'",
                        schema.hash_key(),
                        index.hash_key
                    ),
                ));
            }
            if index.capacity.is_some() {
                return Err(SchemaError::local_index_invalid(
                    &index.name,
                    "capacity cannot be declared on a local index",
                ));
            }
            if index.range_key.is_none() {
                return Err(SchemaError::local_index_invalid(
                    &index.name,
                    "a range key is required",
                ));
            }
        }
        IndexKind::Global => {
            if is_empty_key(&index.hash_key) {
                return Err(SchemaError::global_index_invalid(
                    &index.name,
                    "a hash key is required",
                ));
            }
        }
    }

    validate_key(schema, &index.hash_key, "hash key").map_err(|e| e.in_index(&index.name))?;
    if let Some(range) = &index.range_key {
        validate_key(schema, range, "range key").map_err(|e| e.in_index(&index.name))?;
    }

    match (index.projection, index.included_attributes.is_empty()) {
        (Projection::Include, true) => {
            return Err(SchemaError::projection_mismatch(
                &index.name,
                "INCLUDE requires at least one included attribute",
            ));
        }
        (Projection::All | Projection::KeysOnly, false) => {
            return Err(SchemaError::projection_mismatch(
                &index.name,
                format!("included attributes require INCLUDE, found {}", index.projection.as_str()),
            ));
        }
        _ => {}
    }
    for included in &index.included_attributes {
        if schema.attribute(included).is_none() {
            return Err(
                SchemaError::unknown_attribute(included, "projection").in_index(&index.name)
            );
        }
    }

    Ok(())
}

fn is_empty_key(key: &IndexKey) -> bool {
    match key {
        IndexKey::Attribute(name) => name.is_empty(),
        IndexKey::Composite(parts) => parts.is_empty(),
    }
}

fn validate_key(schema: &TableSchema, key: &IndexKey, role: &str) -> SchemaResult<()> {
    match key {
        IndexKey::Attribute(name) => {
            if schema.attribute(name).is_none() {
                return Err(SchemaError::unknown_attribute(name, role));
            }
        }
        IndexKey::Composite(parts) => {
            if parts.is_empty() {
                return Err(SchemaError::invalid_key(key.to_string(), "no parts"));
            }
            if parts.iter().all(|p| p.attribute().is_none()) {
                return Err(SchemaError::invalid_key(
                    key.to_string(),
                    "must reference at least one attribute",
                ));
            }
            for part in parts {
                match part {
                    KeyPart::Literal(text) if text.is_empty() => {
                        return Err(SchemaError::invalid_key(key.to_string(), "empty segment"));
                    }
                    KeyPart::Reference(name) if schema.attribute(name).is_none() => {
                        return Err(SchemaError::unknown_attribute(name, role));
                    }
                    _ => {}
                }
            }
        }
    }
    Ok(())
}
