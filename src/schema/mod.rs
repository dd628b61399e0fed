//! Schema model for keyplan
//!
//! A table is described once, at load time, and is read-only afterwards:
//! primary key, attribute catalog, and secondary indexes (global and local).
//!
//! # Design Principles
//!
//! - Immutable after construction; safe to share across planning calls
//! - O(1) attribute and operator lookup through a precomputed cache
//! - Malformed schemas are FATAL and never partially loaded

mod errors;
mod loader;
mod types;
mod validator;

pub use errors::{SchemaError, SchemaErrorCode, SchemaResult, Severity};
pub use loader::{parse_key, AttributeDefinition, IndexDefinition, SchemaDefinition, SchemaLoader};
pub use types::{
    Attribute, AttributeType, Capacity, IndexDescriptor, IndexKey, IndexKind, KeyPart, Projection,
    RefinedKind, TableSchema,
};
pub use validator::validate_structure;
