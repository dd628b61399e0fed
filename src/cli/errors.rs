//! CLI-specific error types
//!
//! Schema and planner failures keep their own codes when they surface
//! through the CLI.

use std::fmt;
use std::io;

use crate::condition::BindingRejection;
use crate::planner::{PlannerError, PlannerErrorCode};
use crate::schema::{SchemaError, SchemaErrorCode};

/// CLI error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdin/stdout)
    IoError,
    /// Request JSON is malformed or names an invalid binding
    InvalidRequest,
    /// Schema failed to load or validate
    Schema(SchemaErrorCode),
    /// Planner rejected the query
    Plan(PlannerErrorCode),
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "KEYPLAN_CLI_CONFIG_ERROR",
            Self::IoError => "KEYPLAN_CLI_IO_ERROR",
            Self::InvalidRequest => "KEYPLAN_CLI_INVALID_REQUEST",
            Self::Schema(code) => code.code(),
            Self::Plan(code) => code.code(),
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Invalid request
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidRequest, msg)
    }

    /// Get the error code
    pub fn code(&self) -> CliErrorCode {
        self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::invalid_request(format!("JSON error: {}", e))
    }
}

impl From<SchemaError> for CliError {
    fn from(e: SchemaError) -> Self {
        Self::new(CliErrorCode::Schema(e.code()), e.to_string())
    }
}

impl From<PlannerError> for CliError {
    fn from(e: PlannerError) -> Self {
        Self::new(CliErrorCode::Plan(e.code()), e.message())
    }
}

impl From<BindingRejection> for CliError {
    fn from(e: BindingRejection) -> Self {
        Self::invalid_request(format!("{}: {}", e.code(), e))
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapped_codes_pass_through() {
        let err: CliError = PlannerError::no_access_path("posts", "user_id", 0).into();
        assert_eq!(err.code_str(), "KEYPLAN_PLAN_NO_ACCESS_PATH");

        let err: CliError = SchemaError::duplicate_index("by_x").into();
        assert_eq!(err.code_str(), SchemaErrorCode::DuplicateIndex.code());
    }

    #[test]
    fn test_rejection_is_invalid_request() {
        let err: CliError = BindingRejection::UnknownAttribute("ghost".into()).into();
        assert_eq!(err.code(), CliErrorCode::InvalidRequest);
        assert!(err.message().contains("UNKNOWN_ATTRIBUTE"));
    }
}
