//! Schema Invariant Tests
//!
//! Tests for schema loading and structural validation:
//! - Every invalid schema fails at load time with a FATAL code
//! - Composite keys resolve references and keep literals
//! - The operator cache matches the compatibility table
//! - Loading is deterministic

use std::io::Write;

use keyplan::condition::{allowed_operators, Operator};
use keyplan::schema::{
    AttributeType, IndexKey, KeyPart, SchemaErrorCode, SchemaLoader, Severity, TableSchema,
};
use serde_json::{json, Value};
use tempfile::NamedTempFile;

// =============================================================================
// Helper Functions
// =============================================================================

fn base_definition() -> Value {
    json!({
        "table_name": "orders",
        "hash_key": "customer_id",
        "range_key": "order_id",
        "attributes": [
            {"name": "customer_id", "type": "S"},
            {"name": "order_id", "type": "S"},
            {"name": "status", "type": "S"},
            {"name": "region", "type": "S"},
            {"name": "total", "type": "N", "subtype": "float64"},
            {"name": "placed_at", "type": "N", "subtype": "int64"},
            {"name": "gift", "type": "BOOLEAN"},
            {"name": "items", "type": "L"},
            {"name": "labels", "type": "NS"},
            {"name": "extra", "type": "uuid"}
        ],
        "secondary_indexes": [
            {"name": "by_status", "hash_key": "status#region", "range_key": "placed_at"},
            {"name": "by_total", "type": "LSI", "range_key": "total",
             "projection_type": "KEYS_ONLY"},
            {"name": "by_order_tag", "hash_key": "ORDER#order_id"}
        ]
    })
}

fn load(definition: &Value) -> Result<TableSchema, keyplan::schema::SchemaError> {
    SchemaLoader::load_str(&definition.to_string(), "orders.json")
}

fn with_index(index: Value) -> Value {
    let mut definition = base_definition();
    definition["secondary_indexes"]
        .as_array_mut()
        .unwrap()
        .push(index);
    definition
}

fn expect_code(definition: &Value, code: SchemaErrorCode) {
    let err = load(definition).unwrap_err();
    assert_eq!(err.code(), code, "unexpected error: {}", err);
    assert_eq!(err.severity(), Severity::Fatal);
}

// =============================================================================
// Successful Load Tests
// =============================================================================

/// The base schema loads with every key form resolved.
#[test]
fn test_load_valid_schema() {
    let schema = load(&base_definition()).unwrap();

    assert_eq!(schema.name(), "orders");
    assert_eq!(schema.hash_key(), "customer_id");
    assert_eq!(schema.range_key(), Some("order_id"));

    let by_status = schema.index("by_status").unwrap();
    assert_eq!(by_status.specificity(), 3);
    assert_eq!(by_status.hash_key.to_string(), "status#region");

    let by_total = schema.index("by_total").unwrap();
    assert_eq!(by_total.hash_key, IndexKey::attribute("customer_id"));

    let tagged = schema.index("by_order_tag").unwrap();
    assert_eq!(
        tagged.hash_key,
        IndexKey::composite(vec![
            KeyPart::Literal("ORDER".into()),
            KeyPart::Reference("order_id".into()),
        ])
    );
}

/// Unrecognized type tags become Unknown and get the conservative operators.
#[test]
fn test_unknown_type_is_conservative() {
    let schema = load(&base_definition()).unwrap();
    let extra = schema.attribute("extra").unwrap();
    assert_eq!(extra.declared_type, AttributeType::Unknown("uuid".into()));

    assert!(schema.validate_operator("extra", Operator::Eq));
    assert!(schema.validate_operator("extra", Operator::NotExists));
    assert!(!schema.validate_operator("extra", Operator::Gt));
}

/// The cached operator sets agree with the compatibility table.
#[test]
fn test_operator_cache_matches_table() {
    let schema = load(&base_definition()).unwrap();
    for attr in schema.attributes() {
        let expected = allowed_operators(&attr.declared_type);
        assert_eq!(schema.operators_for(&attr.name), Some(expected));
        for op in Operator::ALL {
            assert_eq!(
                schema.validate_operator(&attr.name, op),
                expected.contains(op),
                "{} {}",
                attr.name,
                op
            );
        }
    }
    assert!(!schema.validate_operator("nope", Operator::Eq));
}

/// Schema files load from disk.
#[test]
fn test_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(base_definition().to_string().as_bytes())
        .unwrap();

    let schema = SchemaLoader::load_file(file.path()).unwrap();
    assert_eq!(schema.indexes().len(), 3);
}

/// Loading twice gives the same structure.
#[test]
fn test_load_is_deterministic() {
    let first = load(&base_definition()).unwrap();
    for _ in 0..20 {
        let again = load(&base_definition()).unwrap();
        assert_eq!(again.indexes(), first.indexes());
        assert_eq!(again.attributes(), first.attributes());
    }
}

// =============================================================================
// Table Key Tests
// =============================================================================

/// Undeclared table hash key is rejected.
#[test]
fn test_undeclared_hash_key() {
    let mut definition = base_definition();
    definition["hash_key"] = json!("tenant");
    expect_code(&definition, SchemaErrorCode::UnknownAttribute);
}

/// Undeclared table range key is rejected.
#[test]
fn test_undeclared_range_key() {
    let mut definition = base_definition();
    definition["range_key"] = json!("sequence");
    expect_code(&definition, SchemaErrorCode::UnknownAttribute);
}

/// Duplicate attribute names are rejected.
#[test]
fn test_duplicate_attribute() {
    let mut definition = base_definition();
    definition["attributes"]
        .as_array_mut()
        .unwrap()
        .push(json!({"name": "status", "type": "N"}));
    expect_code(&definition, SchemaErrorCode::DuplicateAttribute);
}

/// Subtypes only annotate numbers and must be known.
#[test]
fn test_subtype_rules() {
    let mut definition = base_definition();
    definition["attributes"][2] = json!({"name": "status", "type": "S", "subtype": "int8"});
    expect_code(&definition, SchemaErrorCode::InvalidSubtype);

    let mut definition = base_definition();
    definition["attributes"][4] = json!({"name": "total", "type": "N", "subtype": "decimal"});
    expect_code(&definition, SchemaErrorCode::InvalidSubtype);
}

// =============================================================================
// Index Tests
// =============================================================================

/// Duplicate index names are rejected.
#[test]
fn test_duplicate_index() {
    let definition = with_index(json!({"name": "by_status", "hash_key": "region"}));
    expect_code(&definition, SchemaErrorCode::DuplicateIndex);
}

/// A local index cannot name a different hash key.
#[test]
fn test_local_index_own_hash_key() {
    let definition = with_index(json!({
        "name": "by_region", "type": "LSI", "hash_key": "region", "range_key": "placed_at"
    }));
    expect_code(&definition, SchemaErrorCode::LocalIndexInvalid);
}

/// A local index cannot declare a hash key, not even the table's.
#[test]
fn test_local_index_declares_table_hash_key() {
    let definition = with_index(json!({
        "name": "by_placed", "type": "LSI", "hash_key": "customer_id", "range_key": "placed_at"
    }));
    let err = load(&definition).unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::LocalIndexInvalid);
    assert_eq!(err.index(), Some("by_placed"));

    let definition = with_index(json!({
        "name": "by_placed", "type": "LSI", "range_key": "placed_at"
    }));
    let schema = load(&definition).unwrap();
    assert_eq!(
        schema.index("by_placed").unwrap().hash_key,
        IndexKey::attribute("customer_id")
    );
}

/// A local index cannot carry capacity and needs a range key.
#[test]
fn test_local_index_capacity_and_range() {
    let definition = with_index(json!({
        "name": "by_placed", "type": "LSI", "range_key": "placed_at",
        "read_capacity": 1, "write_capacity": 1
    }));
    expect_code(&definition, SchemaErrorCode::LocalIndexInvalid);

    let definition = with_index(json!({"name": "by_nothing", "type": "LSI"}));
    expect_code(&definition, SchemaErrorCode::LocalIndexInvalid);
}

/// A global index needs a hash key.
#[test]
fn test_global_index_requires_hash_key() {
    let definition = with_index(json!({"name": "by_range_only", "range_key": "placed_at"}));
    expect_code(&definition, SchemaErrorCode::GlobalIndexInvalid);
}

/// Key references must resolve; composites need a reference and no empty segment.
#[test]
fn test_key_resolution() {
    let definition = with_index(json!({"name": "by_ghost", "hash_key": "ghost"}));
    let err = load(&definition).unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::UnknownAttribute);
    assert_eq!(err.index(), Some("by_ghost"));

    let definition = with_index(json!({"name": "by_literals", "hash_key": "A#B"}));
    expect_code(&definition, SchemaErrorCode::InvalidKey);

    let definition = with_index(json!({"name": "by_gap", "hash_key": "status##region"}));
    expect_code(&definition, SchemaErrorCode::InvalidKey);
}

/// INCLUDE and included attributes go together.
#[test]
fn test_projection_rules() {
    let definition = with_index(json!({
        "name": "by_region", "hash_key": "region", "projection_type": "INCLUDE"
    }));
    expect_code(&definition, SchemaErrorCode::ProjectionMismatch);

    let definition = with_index(json!({
        "name": "by_region", "hash_key": "region", "non_key_attributes": ["total"]
    }));
    expect_code(&definition, SchemaErrorCode::ProjectionMismatch);

    let definition = with_index(json!({
        "name": "by_region", "hash_key": "region", "projection_type": "INCLUDE",
        "non_key_attributes": ["weight"]
    }));
    expect_code(&definition, SchemaErrorCode::UnknownAttribute);

    let definition = with_index(json!({
        "name": "by_region", "hash_key": "region", "projection_type": "INCLUDE",
        "non_key_attributes": ["total", "gift"]
    }));
    assert!(load(&definition).is_ok());
}

/// Malformed input is rejected before validation.
#[test]
fn test_malformed_input() {
    let err = SchemaLoader::load_str("[]", "list.json").unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::Malformed);

    let definition = with_index(json!({"name": "by_region", "type": "XSI", "hash_key": "region"}));
    expect_code(&definition, SchemaErrorCode::Malformed);

    let definition = with_index(json!({
        "name": "by_region", "hash_key": "region", "read_capacity": 5
    }));
    expect_code(&definition, SchemaErrorCode::Malformed);
}
