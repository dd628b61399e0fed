//! Schema model for a hash/range table
//!
//! A `TableSchema` is built once at load time and never mutated afterwards.
//! Planner and binding calls borrow it; sharing across threads is safe.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::condition::{allowed_operators, Operator, OperatorSet};

/// Declared attribute types.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeType {
    String,
    Number,
    Boolean,
    StringSet,
    NumberSet,
    BinarySet,
    List,
    Map,
    Null,
    /// Type tag the loader did not recognise
    Unknown(String),
}

impl AttributeType {
    /// Parses a schema type tag (case-insensitive). Never fails.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_uppercase().as_str() {
            "S" | "STRING" => AttributeType::String,
            "N" | "NUMBER" => AttributeType::Number,
            "BOOL" | "BOOLEAN" => AttributeType::Boolean,
            "SS" | "STRING_SET" => AttributeType::StringSet,
            "NS" | "NUMBER_SET" => AttributeType::NumberSet,
            "BS" | "BINARY_SET" => AttributeType::BinarySet,
            "L" | "LIST" => AttributeType::List,
            "M" | "MAP" => AttributeType::Map,
            "NULL" => AttributeType::Null,
            _ => AttributeType::Unknown(tag.to_string()),
        }
    }

    /// Returns the type name for error messages
    pub fn type_name(&self) -> &str {
        match self {
            AttributeType::String => "STRING",
            AttributeType::Number => "NUMBER",
            AttributeType::Boolean => "BOOLEAN",
            AttributeType::StringSet => "STRING_SET",
            AttributeType::NumberSet => "NUMBER_SET",
            AttributeType::BinarySet => "BINARY_SET",
            AttributeType::List => "LIST",
            AttributeType::Map => "MAP",
            AttributeType::Null => "NULL",
            AttributeType::Unknown(tag) => tag,
        }
    }

    /// Returns true if a refined numeric kind may annotate this type
    pub fn is_numeric(&self) -> bool {
        matches!(self, AttributeType::Number | AttributeType::NumberSet)
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// Refined numeric kinds for NUMBER and NUMBER_SET attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefinedKind {
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float32,
    Float64,
}

impl RefinedKind {
    /// Parses a subtype tag, returning None for unknown tags
    pub fn from_tag(tag: &str) -> Option<Self> {
        let kind = match tag.trim().to_ascii_lowercase().as_str() {
            "int" => RefinedKind::Int,
            "int8" => RefinedKind::Int8,
            "int16" => RefinedKind::Int16,
            "int32" => RefinedKind::Int32,
            "int64" => RefinedKind::Int64,
            "uint8" => RefinedKind::Uint8,
            "uint16" => RefinedKind::Uint16,
            "uint32" => RefinedKind::Uint32,
            "uint64" => RefinedKind::Uint64,
            "float32" => RefinedKind::Float32,
            "float64" => RefinedKind::Float64,
            _ => return None,
        };
        Some(kind)
    }

    /// Inclusive integer bounds, or None for floating point kinds.
    fn integer_bounds(&self) -> Option<(i128, i128)> {
        match self {
            RefinedKind::Int | RefinedKind::Int64 => Some((i64::MIN as i128, i64::MAX as i128)),
            RefinedKind::Int8 => Some((i8::MIN as i128, i8::MAX as i128)),
            RefinedKind::Int16 => Some((i16::MIN as i128, i16::MAX as i128)),
            RefinedKind::Int32 => Some((i32::MIN as i128, i32::MAX as i128)),
            RefinedKind::Uint8 => Some((0, u8::MAX as i128)),
            RefinedKind::Uint16 => Some((0, u16::MAX as i128)),
            RefinedKind::Uint32 => Some((0, u32::MAX as i128)),
            RefinedKind::Uint64 => Some((0, u64::MAX as i128)),
            RefinedKind::Float32 | RefinedKind::Float64 => None,
        }
    }

    /// Checks whether a JSON number fits this kind
    pub fn accepts(&self, number: &serde_json::Number) -> bool {
        let Some((min, max)) = self.integer_bounds() else {
            return match self {
                RefinedKind::Float32 => number
                    .as_f64()
                    .map_or(false, |f| f.abs() <= f32::MAX as f64),
                _ => true,
            };
        };
        let value = if let Some(i) = number.as_i64() {
            i as i128
        } else if let Some(u) = number.as_u64() {
            u as i128
        } else {
            return false;
        };
        value >= min && value <= max
    }
}

/// A declared attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub declared_type: AttributeType,
    /// Only present for NUMBER / NUMBER_SET
    pub refined_kind: Option<RefinedKind>,
}

impl Attribute {
    pub fn new(name: impl Into<String>, declared_type: AttributeType) -> Self {
        Self {
            name: name.into(),
            declared_type,
            refined_kind: None,
        }
    }

    /// Attaches a refined numeric kind
    pub fn with_refined_kind(mut self, kind: RefinedKind) -> Self {
        self.refined_kind = Some(kind);
        self
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, AttributeType::String)
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, AttributeType::Number)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, AttributeType::Boolean)
    }
}

/// One segment of an index key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyPart {
    /// Constant text embedded in the key
    Literal(String),
    /// Reference to a declared attribute
    Reference(String),
}

impl KeyPart {
    /// Text used when naming the key
    pub fn text(&self) -> &str {
        match self {
            KeyPart::Literal(text) | KeyPart::Reference(text) => text,
        }
    }

    /// Attribute name if this part references one
    pub fn attribute(&self) -> Option<&str> {
        match self {
            KeyPart::Reference(name) => Some(name),
            KeyPart::Literal(_) => None,
        }
    }
}

/// An index (or table) key: either a bare attribute or an ordered part list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndexKey {
    Attribute(String),
    Composite(Vec<KeyPart>),
}

impl IndexKey {
    pub fn attribute(name: impl Into<String>) -> Self {
        IndexKey::Attribute(name.into())
    }

    pub fn composite(parts: Vec<KeyPart>) -> Self {
        IndexKey::Composite(parts)
    }

    /// Returns the parts in declaration order
    pub fn parts(&self) -> Vec<KeyPart> {
        match self {
            IndexKey::Attribute(name) => vec![KeyPart::Reference(name.clone())],
            IndexKey::Composite(parts) => parts.clone(),
        }
    }

    /// Attribute name when the key is a single attribute reference,
    /// in either of its two spellings.
    pub fn as_simple(&self) -> Option<&str> {
        match self {
            IndexKey::Attribute(name) => Some(name),
            IndexKey::Composite(parts) => match parts.as_slice() {
                [KeyPart::Reference(name)] => Some(name),
                _ => None,
            },
        }
    }

    /// Number of parts, used as the key's contribution to index specificity
    pub fn part_count(&self) -> usize {
        match self {
            IndexKey::Attribute(_) => 1,
            IndexKey::Composite(parts) => parts.len(),
        }
    }

    /// Names of all referenced attributes, in order
    pub fn referenced_attributes(&self) -> Vec<&str> {
        match self {
            IndexKey::Attribute(name) => vec![name.as_str()],
            IndexKey::Composite(parts) => parts.iter().filter_map(KeyPart::attribute).collect(),
        }
    }
}

impl fmt::Display for IndexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", crate::codec::key_name(&self.parts()))
    }
}

/// Secondary index kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndexKind {
    #[serde(rename = "GSI")]
    Global,
    #[serde(rename = "LSI")]
    Local,
}

impl IndexKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexKind::Global => "GSI",
            IndexKind::Local => "LSI",
        }
    }
}

/// Which attributes an index projects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Projection {
    All,
    KeysOnly,
    Include,
}

impl Projection {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_uppercase().as_str() {
            "ALL" => Some(Projection::All),
            "KEYS_ONLY" => Some(Projection::KeysOnly),
            "INCLUDE" => Some(Projection::Include),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Projection::All => "ALL",
            Projection::KeysOnly => "KEYS_ONLY",
            Projection::Include => "INCLUDE",
        }
    }
}

/// Provisioned throughput; only global indexes may declare it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Capacity {
    pub read: u64,
    pub write: u64,
}

/// Secondary index description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDescriptor {
    pub name: String,
    pub kind: IndexKind,
    pub hash_key: IndexKey,
    pub range_key: Option<IndexKey>,
    pub projection: Projection,
    pub included_attributes: Vec<String>,
    pub capacity: Option<Capacity>,
}

impl IndexDescriptor {
    /// Creates a global index with ALL projection
    pub fn global(name: impl Into<String>, hash_key: IndexKey, range_key: Option<IndexKey>) -> Self {
        Self {
            name: name.into(),
            kind: IndexKind::Global,
            hash_key,
            range_key,
            projection: Projection::All,
            included_attributes: Vec::new(),
            capacity: None,
        }
    }

    /// Creates a local index sharing the table's hash key
    pub fn local(name: impl Into<String>, table_hash_key: impl Into<String>, range_key: IndexKey) -> Self {
        Self {
            name: name.into(),
            kind: IndexKind::Local,
            hash_key: IndexKey::Attribute(table_hash_key.into()),
            range_key: Some(range_key),
            projection: Projection::All,
            included_attributes: Vec::new(),
            capacity: None,
        }
    }

    /// Sets the projection
    pub fn with_projection(mut self, projection: Projection, included: Vec<String>) -> Self {
        self.projection = projection;
        self.included_attributes = included;
        self
    }

    /// Sets provisioned capacity
    pub fn with_capacity(mut self, read: u64, write: u64) -> Self {
        self.capacity = Some(Capacity { read, write });
        self
    }

    /// Hash parts plus range parts
    pub fn specificity(&self) -> usize {
        self.hash_key.part_count() + self.range_key.as_ref().map_or(0, IndexKey::part_count)
    }

    /// Simple range key attribute, if any
    pub fn simple_range_attribute(&self) -> Option<&str> {
        self.range_key.as_ref().and_then(IndexKey::as_simple)
    }
}

/// Immutable table schema with a precomputed operator cache.
#[derive(Debug, Clone)]
pub struct TableSchema {
    name: String,
    hash_key: String,
    range_key: Option<String>,
    attributes: Vec<Attribute>,
    indexes: Vec<IndexDescriptor>,
    attribute_positions: HashMap<String, usize>,
    operators_by_attribute: HashMap<String, OperatorSet>,
}

impl TableSchema {
    /// Assembles a schema without structural validation.
    ///
    /// Use `SchemaLoader` or `TableSchema::validated` for checked construction.
    pub fn new(
        name: impl Into<String>,
        hash_key: impl Into<String>,
        range_key: Option<String>,
        attributes: Vec<Attribute>,
        indexes: Vec<IndexDescriptor>,
    ) -> Self {
        let mut attribute_positions = HashMap::with_capacity(attributes.len());
        let mut operators_by_attribute = HashMap::with_capacity(attributes.len());
        for (pos, attr) in attributes.iter().enumerate() {
            attribute_positions.entry(attr.name.clone()).or_insert(pos);
            operators_by_attribute
                .entry(attr.name.clone())
                .or_insert_with(|| allowed_operators(&attr.declared_type));
        }

        Self {
            name: name.into(),
            hash_key: hash_key.into(),
            range_key,
            attributes,
            indexes,
            attribute_positions,
            operators_by_attribute,
        }
    }

    /// Assembles and validates a schema
    pub fn validated(
        name: impl Into<String>,
        hash_key: impl Into<String>,
        range_key: Option<String>,
        attributes: Vec<Attribute>,
        indexes: Vec<IndexDescriptor>,
    ) -> super::SchemaResult<Self> {
        let schema = Self::new(name, hash_key, range_key, attributes, indexes);
        super::validator::validate_structure(&schema)?;
        Ok(schema)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hash_key(&self) -> &str {
        &self.hash_key
    }

    pub fn range_key(&self) -> Option<&str> {
        self.range_key.as_deref()
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn indexes(&self) -> &[IndexDescriptor] {
        &self.indexes
    }

    /// Looks up an attribute by name in O(1)
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attribute_positions
            .get(name)
            .map(|&pos| &self.attributes[pos])
    }

    /// Looks up an index by name
    pub fn index(&self, name: &str) -> Option<&IndexDescriptor> {
        self.indexes.iter().find(|idx| idx.name == name)
    }

    /// Operators legal against an attribute, from the precomputed cache
    pub fn operators_for(&self, attribute: &str) -> Option<OperatorSet> {
        self.operators_by_attribute.get(attribute).copied()
    }

    /// Returns true if `op` may be applied to `attribute`.
    ///
    /// Unknown attributes are never valid.
    pub fn validate_operator(&self, attribute: &str, op: Operator) -> bool {
        self.operators_for(attribute)
            .is_some_and(|ops| ops.contains(op))
    }
}
