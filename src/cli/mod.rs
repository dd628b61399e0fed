//! CLI module for keyplan
//!
//! Provides command-line interface for:
//! - validate: Load and check a schema definition
//! - plan: One-shot query planning
//! - explain: One-shot index selection report

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{
    describe_schema, explain, handle_explain, handle_plan, plan, response_envelope, run,
    run_command, validate, validate_schema, BindingRequest, OrderByRequest, PlanRequest,
};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{error_envelope, ok_envelope, parse_request, read_request, write_envelope};
