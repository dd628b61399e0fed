//! CLI Command Tests
//!
//! Tests for the command layer without a process boundary:
//! - Config loading and schema path resolution
//! - Request parsing into bindings
//! - Plan and explain responses
//! - Error codes surfaced from each layer

use std::fs;

use keyplan::cli::{
    describe_schema, error_envelope, handle_explain, handle_plan, parse_request,
    response_envelope, validate_schema, CliErrorCode, Config, PlanRequest,
};
use keyplan::schema::TableSchema;
use serde_json::{json, Value};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

const SCHEMA: &str = r#"{
    "table_name": "posts",
    "hash_key": "user_id",
    "range_key": "post_id",
    "attributes": [
        {"name": "user_id", "type": "S"},
        {"name": "post_id", "type": "S"},
        {"name": "title", "type": "S"},
        {"name": "category", "type": "S"},
        {"name": "is_published", "type": "BOOL"},
        {"name": "created_at", "type": "N"}
    ],
    "secondary_indexes": [
        {"name": "by_category", "hash_key": "category#is_published",
         "range_key": "created_at", "projection_type": "KEYS_ONLY"}
    ]
}"#;

fn setup(config: Value) -> (TempDir, Config, TableSchema) {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("posts.schema.json"), SCHEMA).unwrap();
    let config_path = tmp.path().join("keyplan.json");
    fs::write(&config_path, config.to_string()).unwrap();

    let config = Config::load(&config_path).unwrap();
    let schema = config.load_schema().unwrap();
    (tmp, config, schema)
}

fn default_setup() -> (TempDir, Config, TableSchema) {
    setup(json!({"schema_path": "posts.schema.json", "default_limit": 25}))
}

// =============================================================================
// Config Tests
// =============================================================================

/// Relative schema paths resolve next to the config file.
#[test]
fn test_schema_path_relative_to_config() {
    let (tmp, config, schema) = default_setup();
    assert_eq!(config.schema_file(), tmp.path().join("posts.schema.json"));
    assert_eq!(schema.name(), "posts");
}

/// A broken schema file surfaces its schema error code.
#[test]
fn test_invalid_schema_code() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("bad.json"), r#"{"table_name": "t", "hash_key": "k", "attributes": []}"#)
        .unwrap();
    let config_path = tmp.path().join("keyplan.json");
    fs::write(&config_path, json!({"schema_path": "bad.json"}).to_string()).unwrap();

    let config = Config::load(&config_path).unwrap();
    let err = config.load_schema().unwrap_err();
    assert_eq!(err.code_str(), "KEYPLAN_SCHEMA_UNKNOWN_ATTRIBUTE");
    assert!(matches!(err.code(), CliErrorCode::Schema(_)));
}

/// Unknown config fields are rejected.
#[test]
fn test_unknown_config_field() {
    let tmp = TempDir::new().unwrap();
    let config_path = tmp.path().join("keyplan.json");
    fs::write(&config_path, r#"{"schema_path": "s.json", "verbose": true}"#).unwrap();

    let err = Config::load(&config_path).unwrap_err();
    assert_eq!(err.code(), CliErrorCode::ConfigError);
}

/// A missing or broken config still produces an error envelope.
#[test]
fn test_config_error_envelope() {
    let tmp = TempDir::new().unwrap();

    let missing = validate_schema(&tmp.path().join("absent.json"));
    let envelope = response_envelope(&missing);
    assert_eq!(envelope["status"], "error");
    assert_eq!(envelope["code"], "KEYPLAN_CLI_CONFIG_ERROR");
    assert!(missing.is_err());

    let config_path = tmp.path().join("keyplan.json");
    fs::write(&config_path, r#"{"schema_path": "s.json", "log_level": "loud"}"#).unwrap();
    let envelope = response_envelope(&validate_schema(&config_path));
    assert_eq!(envelope["status"], "error");
    assert_eq!(envelope["code"], "KEYPLAN_CLI_CONFIG_ERROR");
}

// =============================================================================
// Validate Tests
// =============================================================================

/// Schema summary lists keys and indexes.
#[test]
fn test_describe_schema() {
    let (_tmp, _config, schema) = default_setup();
    let summary = describe_schema(&schema);

    assert_eq!(summary["table"], "posts");
    assert_eq!(summary["range_key"], "post_id");
    assert_eq!(summary["attributes"], 6);
    assert_eq!(summary["indexes"][0]["hash_key"], "category#is_published");
    assert_eq!(summary["indexes"][0]["kind"], "GSI");
    assert_eq!(summary["indexes"][0]["projection"], "KEYS_ONLY");
}

/// Validate through the config file wraps the summary in an ok envelope.
#[test]
fn test_validate_schema_envelope() {
    let (tmp, _config, _schema) = default_setup();
    let envelope = response_envelope(&validate_schema(&tmp.path().join("keyplan.json")));
    assert_eq!(envelope["status"], "ok");
    assert_eq!(envelope["data"]["table"], "posts");
}

// =============================================================================
// Plan Tests
// =============================================================================

/// A full request plans against the composite index.
#[test]
fn test_plan_request() {
    let (_tmp, config, schema) = default_setup();
    let request = parse_request(
        r#"{
            "key": [
                {"attribute": "category", "op": "EQ", "values": ["tech"]},
                {"attribute": "is_published", "op": "EQ", "values": [true]},
                {"attribute": "created_at", "op": "BETWEEN", "values": [100, 200]}
            ],
            "order_by": {"attribute": "created_at", "descending": true},
            "cursor": {"post_id": "p1"}
        }"#,
    )
    .unwrap();

    let plan = handle_plan(&schema, config.default_limit, request).unwrap();

    assert_eq!(plan["table_name"], "posts");
    assert_eq!(plan["index_name"], "by_category");
    assert_eq!(plan["index_kind"], "GSI");
    assert_eq!(plan["projection"], "KEYS_ONLY");
    assert_eq!(plan["limit"], 25);
    assert_eq!(plan["sort_descending"], true);
    assert_eq!(plan["page_cursor"], json!({"post_id": "p1"}));
    assert_eq!(plan["filter_condition"], Value::Null);

    let key = &plan["key_condition"]["and"];
    assert_eq!(key[0]["predicate"]["attribute"], "category#is_published");
    assert_eq!(key[0]["predicate"]["operand"], "tech#true");
    assert_eq!(key[1]["predicate"]["operator"], "BETWEEN");
    assert_eq!(key[1]["predicate"]["operand"], json!({"start": 100, "end": 200}));
}

/// Plan output and the schema summary spell index kinds the same way.
#[test]
fn test_index_kind_spelling_matches_summary() {
    let (_tmp, config, schema) = default_setup();
    let request = json!({"key": [
        {"attribute": "category", "op": "EQ", "values": ["news"]},
        {"attribute": "is_published", "op": "EQ", "values": [false]}
    ]});

    let plan = handle_plan(&schema, config.default_limit, request).unwrap();
    let summary = describe_schema(&schema);
    assert_eq!(plan["index_kind"], summary["indexes"][0]["kind"]);

    let table_plan = handle_plan(
        &schema,
        None,
        json!({"key": [{"attribute": "user_id", "op": "EQ", "values": ["u1"]}]}),
    )
    .unwrap();
    assert_eq!(table_plan["index_kind"], Value::Null);
}

/// Request limit overrides the configured default.
#[test]
fn test_request_limit_overrides_default() {
    let (_tmp, config, schema) = default_setup();
    let request = json!({
        "key": [{"attribute": "user_id", "op": "EQ", "values": ["u1"]}],
        "filter": [{"attribute": "title", "op": "EXISTS"}],
        "limit": 3
    });

    let plan = handle_plan(&schema, config.default_limit, request).unwrap();
    assert_eq!(plan["index_name"], Value::Null);
    assert_eq!(plan["projection"], "ALL");
    assert_eq!(plan["limit"], 3);
    assert_eq!(plan["filter_condition"]["predicate"]["operator"], "EXISTS");
}

/// An invalid binding fails the whole request.
#[test]
fn test_rejected_binding_fails_request() {
    let (_tmp, config, schema) = default_setup();
    let request = json!({
        "key": [
            {"attribute": "user_id", "op": "EQ", "values": ["u1"]},
            {"attribute": "is_published", "op": "BEGINS_WITH", "values": ["t"]}
        ]
    });

    let err = handle_plan(&schema, config.default_limit, request).unwrap_err();
    assert_eq!(err.code(), CliErrorCode::InvalidRequest);
    assert!(err.message().contains("OPERATOR_NOT_ALLOWED"));
}

/// Unknown request fields and operators are rejected.
#[test]
fn test_malformed_request() {
    let (_tmp, config, schema) = default_setup();

    let err = handle_plan(&schema, config.default_limit, json!({"where": []})).unwrap_err();
    assert_eq!(err.code_str(), "KEYPLAN_CLI_INVALID_REQUEST");

    let bad_op = json!({"key": [{"attribute": "user_id", "op": "LIKE", "values": ["u"]}]});
    assert!(handle_plan(&schema, config.default_limit, bad_op).is_err());
}

/// Planning failure carries the planner's code.
#[test]
fn test_no_access_path_code() {
    let (_tmp, config, schema) = default_setup();
    let request = json!({"filter": [{"attribute": "title", "op": "EQ", "values": ["x"]}]});

    let err = handle_plan(&schema, config.default_limit, request).unwrap_err();
    assert_eq!(err.code_str(), "KEYPLAN_PLAN_NO_ACCESS_PATH");

    let envelope = error_envelope(err.code_str(), err.message());
    assert_eq!(envelope["status"], "error");
}

/// The request type deserializes with every field optional.
#[test]
fn test_empty_request_deserializes() {
    let request: PlanRequest = serde_json::from_value(json!({})).unwrap();
    assert!(request.key.is_empty());
    assert!(request.filter.is_empty());
    assert!(request.limit.is_none());
}

// =============================================================================
// Explain Tests
// =============================================================================

/// Explain succeeds even when planning is rejected.
#[test]
fn test_explain_rejected() {
    let (_tmp, config, schema) = default_setup();
    let request = json!({"key": [{"attribute": "category", "op": "EQ", "values": ["tech"]}]});

    let data = handle_explain(&schema, config.default_limit, request).unwrap();
    assert_eq!(data["plan"]["accepted"], false);
    assert_eq!(data["plan"]["rejection_code"], "KEYPLAN_PLAN_NO_ACCESS_PATH");
    assert_eq!(data["plan"]["candidates"][0]["index"], "by_category");
    assert!(data["text"].as_str().unwrap().contains("is_published"));
}

/// Explain text for an accepted plan names the access path.
#[test]
fn test_explain_accepted() {
    let (_tmp, config, schema) = default_setup();
    let request = json!({"key": [{"attribute": "user_id", "op": "EQ", "values": ["u1"]}]});

    let data = handle_explain(&schema, config.default_limit, request).unwrap();
    let text = data["text"].as_str().unwrap();
    assert!(text.contains("Status: ACCEPTED"));
    assert!(text.contains("Access Path: TABLE"));
    assert!(text.contains("Limit: 25"));
}
