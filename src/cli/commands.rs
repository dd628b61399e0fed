//! CLI command implementations
//!
//! Every command loads the config, applies its log level, then loads and
//! validates the schema. `plan` and `explain` read one request from stdin.
//!
//! Request format:
//!
//! ```json
//! {
//!   "key": [{"attribute": "user_id", "op": "EQ", "values": ["u1"]}],
//!   "filter": [{"attribute": "title", "op": "BEGINS_WITH", "values": ["Hello"]}],
//!   "order_by": {"attribute": "created_at", "descending": true},
//!   "limit": 20,
//!   "cursor": {"user_id": "u1", "post_id": "p9"}
//! }
//! ```

use std::path::Path;

use serde::Deserialize;
use serde_json::{json, Value};

use super::args::{Cli, Command};
use super::config::Config;
use super::errors::CliResult;
use super::io::{error_envelope, ok_envelope, read_request, write_envelope};
use crate::condition::Comparison;
use crate::planner::{BindingSet, ExplainPlan, IndexSelector};
use crate::schema::TableSchema;

/// One binding in a request
#[derive(Debug, Clone, Deserialize)]
pub struct BindingRequest {
    pub attribute: String,
    #[serde(flatten)]
    pub comparison: Comparison,
}

/// Preferred sort key in a request
#[derive(Debug, Clone, Deserialize)]
pub struct OrderByRequest {
    pub attribute: String,
    #[serde(default)]
    pub descending: bool,
}

/// A query as read from stdin
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanRequest {
    #[serde(default)]
    pub key: Vec<BindingRequest>,
    #[serde(default)]
    pub filter: Vec<BindingRequest>,
    #[serde(default)]
    pub order_by: Option<OrderByRequest>,
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub cursor: Option<Value>,
}

impl PlanRequest {
    /// Builds a binding set; unlike the fluent API, the first rejected
    /// binding fails the request.
    pub fn into_bindings(
        self,
        schema: &TableSchema,
        default_limit: Option<u64>,
    ) -> CliResult<BindingSet> {
        let mut bindings = BindingSet::new();

        for binding in self.key {
            bindings.try_bind_key(schema, &binding.attribute, binding.comparison)?;
        }
        for binding in self.filter {
            bindings.try_bind_filter(schema, &binding.attribute, binding.comparison)?;
        }
        if let Some(order) = self.order_by {
            bindings.try_order_by(schema, &order.attribute, order.descending)?;
        }
        if let Some(limit) = self.limit.or(default_limit) {
            bindings.try_set_limit(limit)?;
        }
        if let Some(cursor) = self.cursor {
            bindings.start_from(cursor);
        }

        Ok(bindings)
    }
}

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Validate { config } => validate(&config),
        Command::Plan { config } => plan(&config),
        Command::Explain { config } => explain(&config),
    }
}

/// Load the schema and print a summary of it
pub fn validate(config_path: &Path) -> CliResult<()> {
    respond(validate_schema(config_path))
}

/// Plan a single query and exit
pub fn plan(config_path: &Path) -> CliResult<()> {
    respond(prepare(config_path).and_then(|(config, schema)| {
        let request = read_request()?;
        handle_plan(&schema, config.default_limit, request)
    }))
}

/// Explain a single query and exit
pub fn explain(config_path: &Path) -> CliResult<()> {
    respond(prepare(config_path).and_then(|(config, schema)| {
        let request = read_request()?;
        handle_explain(&schema, config.default_limit, request)
    }))
}

/// Summary returned by `validate`
pub fn validate_schema(config_path: &Path) -> CliResult<Value> {
    let (_, schema) = prepare(config_path)?;
    Ok(describe_schema(&schema))
}

/// Envelope written to stdout for a command result
pub fn response_envelope(result: &CliResult<Value>) -> Value {
    match result {
        Ok(data) => ok_envelope(data.clone()),
        Err(err) => error_envelope(err.code_str(), err.message()),
    }
}

fn prepare(config_path: &Path) -> CliResult<(Config, TableSchema)> {
    let config = Config::load(config_path)?;
    config.apply_logging()?;
    let schema = config.load_schema()?;
    Ok((config, schema))
}

/// Writes the result envelope; errors are also returned for the exit status.
fn respond(result: CliResult<Value>) -> CliResult<()> {
    write_envelope(&response_envelope(&result))?;
    result.map(|_| ())
}

/// Plans a request against a loaded schema
pub fn handle_plan(
    schema: &TableSchema,
    default_limit: Option<u64>,
    request: Value,
) -> CliResult<Value> {
    let request: PlanRequest = serde_json::from_value(request)?;
    let bindings = request.into_bindings(schema, default_limit)?;
    let plan = IndexSelector::new(schema).plan(&bindings)?;
    Ok(serde_json::to_value(&plan)?)
}

/// Explains a request against a loaded schema. A rejected plan is still a
/// successful explanation.
pub fn handle_explain(
    schema: &TableSchema,
    default_limit: Option<u64>,
    request: Value,
) -> CliResult<Value> {
    let request: PlanRequest = serde_json::from_value(request)?;
    let bindings = request.into_bindings(schema, default_limit)?;
    let explain = ExplainPlan::build(&IndexSelector::new(schema), &bindings);
    Ok(json!({
        "plan": serde_json::to_value(&explain)?,
        "text": explain.to_string(),
    }))
}

/// Summary of a validated schema
pub fn describe_schema(schema: &TableSchema) -> Value {
    let indexes: Vec<Value> = schema
        .indexes()
        .iter()
        .map(|index| {
            json!({
                "name": index.name,
                "kind": index.kind.as_str(),
                "hash_key": index.hash_key.to_string(),
                "range_key": index.range_key.as_ref().map(ToString::to_string),
                "projection": index.projection.as_str(),
            })
        })
        .collect();

    json!({
        "table": schema.name(),
        "hash_key": schema.hash_key(),
        "range_key": schema.range_key(),
        "attributes": schema.attributes().len(),
        "indexes": indexes,
    })
}
