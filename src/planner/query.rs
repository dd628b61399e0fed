//! Fluent query builder over a schema and a binding set.

use serde_json::Value;

use crate::condition::Comparison;
use crate::schema::TableSchema;

use super::binding::BindingSet;
use super::errors::PlannerResult;
use super::explain::ExplainPlan;
use super::plan::AccessPlan;
use super::selector::IndexSelector;

/// Builder that owns a `BindingSet` for one schema.
///
/// ```ignore
/// let plan = schema
///     .query()
///     .key("category", Comparison::eq("tech"))
///     .key("is_published", Comparison::eq(true))
///     .key("created_at", Comparison::between(100, 200))
///     .plan()?;
/// ```
#[derive(Debug, Clone)]
pub struct Query<'a> {
    schema: &'a TableSchema,
    bindings: BindingSet,
}

impl<'a> Query<'a> {
    pub fn new(schema: &'a TableSchema) -> Self {
        Self {
            schema,
            bindings: BindingSet::new(),
        }
    }

    pub fn key(mut self, attribute: &str, comparison: Comparison) -> Self {
        self.bindings.bind_key(self.schema, attribute, comparison);
        self
    }

    pub fn filter(mut self, attribute: &str, comparison: Comparison) -> Self {
        self.bindings.bind_filter(self.schema, attribute, comparison);
        self
    }

    pub fn order_by(mut self, attribute: &str, descending: bool) -> Self {
        self.bindings.order_by(self.schema, attribute, descending);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.bindings.set_limit(limit);
        self
    }

    pub fn start_from(mut self, cursor: Value) -> Self {
        self.bindings.start_from(cursor);
        self
    }

    pub fn bindings(&self) -> &BindingSet {
        &self.bindings
    }

    pub fn into_bindings(self) -> BindingSet {
        self.bindings
    }

    pub fn plan(&self) -> PlannerResult<AccessPlan> {
        IndexSelector::new(self.schema).plan(&self.bindings)
    }

    pub fn explain(&self) -> ExplainPlan {
        ExplainPlan::build(&IndexSelector::new(self.schema), &self.bindings)
    }
}

impl TableSchema {
    /// Starts a query against this schema
    pub fn query(&self) -> Query<'_> {
        Query::new(self)
    }
}
