//! Schema error types
//!
//! Every schema error is FATAL: a malformed schema is rejected at load time
//! and never recovered locally.
//!
//! Error codes:
//! - KEYPLAN_SCHEMA_MALFORMED
//! - KEYPLAN_SCHEMA_UNKNOWN_ATTRIBUTE
//! - KEYPLAN_SCHEMA_DUPLICATE_ATTRIBUTE
//! - KEYPLAN_SCHEMA_DUPLICATE_INDEX
//! - KEYPLAN_SCHEMA_INVALID_KEY
//! - KEYPLAN_SCHEMA_LOCAL_INDEX_INVALID
//! - KEYPLAN_SCHEMA_GLOBAL_INDEX_INVALID
//! - KEYPLAN_SCHEMA_PROJECTION_MISMATCH
//! - KEYPLAN_SCHEMA_INVALID_SUBTYPE

use std::fmt;

/// Severity levels for schema errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Schema cannot be used; load must abort
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Schema input could not be read or parsed
    Malformed,
    /// A key or projection references an undeclared attribute
    UnknownAttribute,
    /// Two attributes share a name
    DuplicateAttribute,
    /// Two indexes share a name
    DuplicateIndex,
    /// Key text is empty, has empty segments, or references nothing
    InvalidKey,
    /// LSI declares its own hash key or capacity, or lacks a range key
    LocalIndexInvalid,
    /// GSI lacks a hash key
    GlobalIndexInvalid,
    /// INCLUDE projection without attributes, or attributes without INCLUDE
    ProjectionMismatch,
    /// Subtype unknown or contradicting the declared type
    InvalidSubtype,
}

impl SchemaErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::Malformed => "KEYPLAN_SCHEMA_MALFORMED",
            SchemaErrorCode::UnknownAttribute => "KEYPLAN_SCHEMA_UNKNOWN_ATTRIBUTE",
            SchemaErrorCode::DuplicateAttribute => "KEYPLAN_SCHEMA_DUPLICATE_ATTRIBUTE",
            SchemaErrorCode::DuplicateIndex => "KEYPLAN_SCHEMA_DUPLICATE_INDEX",
            SchemaErrorCode::InvalidKey => "KEYPLAN_SCHEMA_INVALID_KEY",
            SchemaErrorCode::LocalIndexInvalid => "KEYPLAN_SCHEMA_LOCAL_INDEX_INVALID",
            SchemaErrorCode::GlobalIndexInvalid => "KEYPLAN_SCHEMA_GLOBAL_INDEX_INVALID",
            SchemaErrorCode::ProjectionMismatch => "KEYPLAN_SCHEMA_PROJECTION_MISMATCH",
            SchemaErrorCode::InvalidSubtype => "KEYPLAN_SCHEMA_INVALID_SUBTYPE",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Fatal
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Schema error type with full context
#[derive(Debug, Clone)]
pub struct SchemaError {
    /// Error code
    code: SchemaErrorCode,
    /// Human-readable message
    message: String,
    /// Index name if applicable
    index: Option<String>,
    /// Attribute name if applicable
    attribute: Option<String>,
}

impl SchemaError {
    fn new(code: SchemaErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            index: None,
            attribute: None,
        }
    }

    fn on_index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    fn on_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    /// Create an error for unreadable or unparsable schema input
    pub fn malformed(source: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(
            SchemaErrorCode::Malformed,
            format!("Malformed schema '{}': {}", source.into(), reason.into()),
        )
    }

    /// Create an unknown attribute error; `context` says where it was referenced
    pub fn unknown_attribute(attribute: impl Into<String>, context: impl Into<String>) -> Self {
        let attr = attribute.into();
        Self::new(
            SchemaErrorCode::UnknownAttribute,
            format!("Attribute '{}' referenced by {} is not declared", attr, context.into()),
        )
        .on_attribute(attr)
    }

    /// Create a duplicate attribute error
    pub fn duplicate_attribute(attribute: impl Into<String>) -> Self {
        let attr = attribute.into();
        Self::new(
            SchemaErrorCode::DuplicateAttribute,
            format!("Attribute '{}' is declared more than once", attr),
        )
        .on_attribute(attr)
    }

    /// Create a duplicate index error
    pub fn duplicate_index(index: impl Into<String>) -> Self {
        let name = index.into();
        Self::new(
            SchemaErrorCode::DuplicateIndex,
            format!("Index '{}' is declared more than once", name),
        )
        .on_index(name)
    }

    /// Create an invalid key error
    pub fn invalid_key(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(
            SchemaErrorCode::InvalidKey,
            format!("Invalid key '{}': {}", key.into(), reason.into()),
        )
    }

    /// Create an invalid local index error
    pub fn local_index_invalid(index: impl Into<String>, reason: impl Into<String>) -> Self {
        let name = index.into();
        Self::new(
            SchemaErrorCode::LocalIndexInvalid,
            format!("Local index '{}': {}", name, reason.into()),
        )
        .on_index(name)
    }

    /// Create an invalid global index error
    pub fn global_index_invalid(index: impl Into<String>, reason: impl Into<String>) -> Self {
        let name = index.into();
        Self::new(
            SchemaErrorCode::GlobalIndexInvalid,
            format!("Global index '{}': {}", name, reason.into()),
        )
        .on_index(name)
    }

    /// Create a projection mismatch error
    pub fn projection_mismatch(index: impl Into<String>, reason: impl Into<String>) -> Self {
        let name = index.into();
        Self::new(
            SchemaErrorCode::ProjectionMismatch,
            format!("Index '{}' projection: {}", name, reason.into()),
        )
        .on_index(name)
    }

    /// Create an invalid subtype error
    pub fn invalid_subtype(attribute: impl Into<String>, reason: impl Into<String>) -> Self {
        let attr = attribute.into();
        Self::new(
            SchemaErrorCode::InvalidSubtype,
            format!("Attribute '{}' subtype: {}", attr, reason.into()),
        )
        .on_attribute(attr)
    }

    /// Attaches the index the error was found in
    pub fn in_index(self, index: impl Into<String>) -> Self {
        self.on_index(index)
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
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

    /// Returns the index name if applicable
    pub fn index(&self) -> Option<&str> {
        self.index.as_deref()
    }

    /// Returns the attribute name if applicable
    pub fn attribute(&self) -> Option<&str> {
        self.attribute.as_deref()
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code.severity(), self.code.code(), self.message)?;
        if let Some(index) = &self.index {
            write!(f, " (index '{}')", index)?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
