//! Planner error types
//!
//! Planning has exactly one failure: no secondary index is admissible and
//! the table's hash key is not bound by equality. The error carries no
//! partial plan.
//!
//! Error codes:
//! - KEYPLAN_PLAN_NO_ACCESS_PATH (REJECT)

use std::fmt;

/// Severity levels for planner errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Query rejected; caller may rebind and retry
    Reject,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
        }
    }
}

/// Planner-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannerErrorCode {
    /// No index admissible and table hash key unbound
    NoAccessPath,
}

impl PlannerErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            PlannerErrorCode::NoAccessPath => "KEYPLAN_PLAN_NO_ACCESS_PATH",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Reject
    }
}

impl fmt::Display for PlannerErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Planner error type with full context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerError {
    /// Error code
    code: PlannerErrorCode,
    /// Human-readable message
    message: String,
    /// Table the query targeted
    table: String,
    /// Hash key that would have made the table admissible
    hash_key: String,
}

impl PlannerError {
    /// Create a no-access-path error
    pub fn no_access_path(
        table: impl Into<String>,
        hash_key: impl Into<String>,
        indexes_considered: usize,
    ) -> Self {
        let table = table.into();
        let hash_key = hash_key.into();
        Self {
            code: PlannerErrorCode::NoAccessPath,
            message: format!(
                "No access path for table '{}': none of {} index(es) is admissible and hash key '{}' is not bound by equality",
                table, indexes_considered, hash_key
            ),
            table,
            hash_key,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> PlannerErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the table name
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Returns the unbound table hash key
    pub fn hash_key(&self) -> &str {
        &self.hash_key
    }
}

impl fmt::Display for PlannerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )
    }
}

impl std::error::Error for PlannerError {}

/// Result type for planner operations
pub type PlannerResult<T> = Result<T, PlannerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            PlannerErrorCode::NoAccessPath.code(),
            "KEYPLAN_PLAN_NO_ACCESS_PATH"
        );
        assert_eq!(PlannerErrorCode::NoAccessPath.severity(), Severity::Reject);
    }

    #[test]
    fn test_error_display() {
        let err = PlannerError::no_access_path("posts", "user_id", 2);
        let display = format!("{}", err);
        assert!(display.contains("REJECT"));
        assert!(display.contains("KEYPLAN_PLAN_NO_ACCESS_PATH"));
        assert!(display.contains("user_id"));
        assert_eq!(err.table(), "posts");
        assert_eq!(err.hash_key(), "user_id");
    }
}
