//! Schema loader
//!
//! Reads a JSON schema definition and turns it into a validated `TableSchema`.
//! Composite keys are written as attribute names joined with `#`; a segment
//! that does not name a declared attribute becomes a literal part.
//!
//! Any failure here is FATAL for the caller: the schema is never partially
//! loaded.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::{SchemaError, SchemaResult};
use super::types::{
    Attribute, AttributeType, Capacity, IndexDescriptor, IndexKey, IndexKind, KeyPart,
    Projection, RefinedKind, TableSchema,
};
use crate::codec::KEY_SEPARATOR;
use crate::observability::{log_event, Event};

/// Attribute entry of a schema file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub attr_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
}

/// Secondary index entry of a schema file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDefinition {
    pub name: String,
    /// "GSI" (default) or "LSI"
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub index_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_key: Option<String>,
    #[serde(default = "default_projection")]
    pub projection_type: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub non_key_attributes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_capacity: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_capacity: Option<u64>,
}

fn default_projection() -> String {
    "ALL".to_string()
}

/// Complete schema file contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDefinition {
    pub table_name: String,
    pub hash_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_key: Option<String>,
    pub attributes: Vec<AttributeDefinition>,
    #[serde(default)]
    pub secondary_indexes: Vec<IndexDefinition>,
}

/// Builds `TableSchema` values from schema definitions.
pub struct SchemaLoader;

impl SchemaLoader {
    /// Loads and validates a schema file.
    pub fn load_file(path: &Path) -> SchemaResult<TableSchema> {
        let content = fs::read_to_string(path).map_err(|e| {
            SchemaError::malformed(path.display().to_string(), format!("Failed to read file: {}", e))
        })?;
        Self::load_str(&content, &path.display().to_string())
    }

    /// Parses and validates schema JSON. `source` names the input in errors.
    pub fn load_str(content: &str, source: &str) -> SchemaResult<TableSchema> {
        let definition: SchemaDefinition = serde_json::from_str(content)
            .map_err(|e| SchemaError::malformed(source, format!("Invalid JSON: {}", e)))?;
        Self::from_definition(&definition)
    }

    /// Converts an already-parsed definition into a validated schema.
    pub fn from_definition(definition: &SchemaDefinition) -> SchemaResult<TableSchema> {
        let attributes = definition
            .attributes
            .iter()
            .map(build_attribute)
            .collect::<SchemaResult<Vec<_>>>()?;

        let declared: HashSet<&str> = attributes.iter().map(|a| a.name.as_str()).collect();

        let indexes = definition
            .secondary_indexes
            .iter()
            .map(|idx| build_index(idx, &definition.hash_key, &declared))
            .collect::<SchemaResult<Vec<_>>>()?;

        let schema = TableSchema::validated(
            definition.table_name.clone(),
            definition.hash_key.clone(),
            definition.range_key.clone(),
            attributes,
            indexes,
        )?;

        let index_count = schema.indexes().len().to_string();
        log_event(
            Event::SchemaLoaded,
            &[("table", schema.name()), ("indexes", index_count.as_str())],
        );

        Ok(schema)
    }
}

fn build_attribute(def: &AttributeDefinition) -> SchemaResult<Attribute> {
    let mut attr = Attribute::new(&def.name, AttributeType::from_tag(&def.attr_type));
    if let Some(tag) = &def.subtype {
        let kind = RefinedKind::from_tag(tag)
            .ok_or_else(|| SchemaError::invalid_subtype(&def.name, format!("unknown subtype '{}'", tag)))?;
        attr = attr.with_refined_kind(kind);
    }
    Ok(attr)
}

fn build_index(
    def: &IndexDefinition,
    table_hash_key: &str,
    declared: &HashSet<&str>,
) -> SchemaResult<IndexDescriptor> {
    let kind = match def.index_type.as_deref().map(str::to_ascii_uppercase).as_deref() {
        None | Some("GSI") => IndexKind::Global,
        Some("LSI") => IndexKind::Local,
        Some(other) => {
            return Err(SchemaError::malformed(
                &def.name,
                format!("unknown index type '{}'", other),
            ))
        }
    };

    let projection = Projection::from_tag(&def.projection_type).ok_or_else(|| {
        SchemaError::malformed(
            &def.name,
            format!("unknown projection type '{}'", def.projection_type),
        )
    })?;

    let capacity = match (def.read_capacity, def.write_capacity) {
        (Some(read), Some(write)) => Some(Capacity { read, write }),
        (None, None) => None,
        _ => {
            return Err(SchemaError::malformed(
                &def.name,
                "read_capacity and write_capacity must be declared together",
            ))
        }
    };

    let hash_key = match kind {
        IndexKind::Local => {
            if let Some(own) = def.hash_key.as_deref() {
                return Err(SchemaError::local_index_invalid(
                    &def.name,
                    format!("cannot declare a hash key '{}'", own),
                ));
            }
            IndexKey::attribute(table_hash_key)
        }
        IndexKind::Global => match def.hash_key.as_deref() {
            Some(text) if !text.trim().is_empty() => {
                parse_key(text, declared).map_err(|e| e.in_index(&def.name))?
            }
            _ => {
                return Err(SchemaError::global_index_invalid(
                    &def.name,
                    "a hash key is required",
                ))
            }
        },
    };

    let range_key = def
        .range_key
        .as_deref()
        .map(|text| parse_key(text, declared))
        .transpose()
        .map_err(|e| e.in_index(&def.name))?;

    Ok(IndexDescriptor {
        name: def.name.clone(),
        kind,
        hash_key,
        range_key,
        projection,
        included_attributes: def.non_key_attributes.clone(),
        capacity,
    })
}

/// Parses key text. A single segment is a bare attribute key; several
/// segments form a composite key.
pub fn parse_key(text: &str, declared: &HashSet<&str>) -> SchemaResult<IndexKey> {
    let segments: Vec<&str> = text.split(KEY_SEPARATOR).collect();
    if segments.len() == 1 {
        return Ok(IndexKey::attribute(text));
    }

    let mut parts = Vec::with_capacity(segments.len());
    for segment in segments {
        if segment.is_empty() {
            return Err(SchemaError::invalid_key(text, "empty segment"));
        }
        if declared.contains(segment) {
            parts.push(KeyPart::Reference(segment.to_string()));
        } else {
            parts.push(KeyPart::Literal(segment.to_string()));
        }
    }
    Ok(IndexKey::composite(parts))
}
