//! Access plans

use serde::Serialize;
use serde_json::Value;

use crate::condition::Condition;
use crate::schema::{IndexKind, Projection};

/// Immutable description of how to execute one query.
///
/// `index_name` is None when the query runs against the table's primary
/// key. The key condition is never empty; the filter is None when every
/// binding was consumed by the key condition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccessPlan {
    pub table_name: String,
    pub index_name: Option<String>,
    pub index_kind: Option<IndexKind>,
    /// Projection of the chosen index; ALL for the table itself
    pub projection: Projection,
    pub key_condition: Condition,
    pub filter_condition: Option<Condition>,
    pub page_cursor: Option<Value>,
    pub limit: Option<u64>,
    pub sort_descending: bool,
}

impl AccessPlan {
    /// Returns true if the plan reads the table's primary key
    pub fn uses_primary_table(&self) -> bool {
        self.index_name.is_none()
    }

    /// Name of the access path: the index name, or the table name
    pub fn access_path(&self) -> &str {
        self.index_name.as_deref().unwrap_or(&self.table_name)
    }

    /// Key attribute names appearing in the key condition, in order
    pub fn key_attributes(&self) -> Vec<&str> {
        self.key_condition.attributes()
    }
}
