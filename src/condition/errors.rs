//! Binding rejection reasons
//!
//! A rejected binding is dropped without raising; these values explain why to
//! callers that use the `try_*` binding API.

use thiserror::Error;

use super::operator::Operator;

/// Result type for binding operations
pub type BindingResult<T> = Result<T, BindingRejection>;

/// Why a binding was not recorded
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingRejection {
    #[error("Attribute '{0}' is not declared")]
    UnknownAttribute(String),

    #[error("Operator {operator} is not allowed on '{attribute}' of type {attribute_type}")]
    OperatorNotAllowed {
        attribute: String,
        operator: Operator,
        attribute_type: String,
    },

    #[error("Operator {operator} takes {expected} operand(s), got {actual}")]
    Arity {
        operator: Operator,
        expected: &'static str,
        actual: usize,
    },

    #[error("Operand {value} does not fit '{attribute}' of type {attribute_type}")]
    OperandType {
        attribute: String,
        attribute_type: String,
        value: String,
    },

    #[error("Limit must be greater than zero")]
    ZeroLimit,
}

impl BindingRejection {
    /// Stable code for logs
    pub fn code(&self) -> &'static str {
        match self {
            BindingRejection::UnknownAttribute(_) => "UNKNOWN_ATTRIBUTE",
            BindingRejection::OperatorNotAllowed { .. } => "OPERATOR_NOT_ALLOWED",
            BindingRejection::Arity { .. } => "ARITY",
            BindingRejection::OperandType { .. } => "OPERAND_TYPE",
            BindingRejection::ZeroLimit => "ZERO_LIMIT",
        }
    }
}
