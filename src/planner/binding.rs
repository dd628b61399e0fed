//! Binding set: the per-query accumulator of attribute bindings
//!
//! Two generic primitives record bindings: `bind_key` (a candidate for key
//! conditions, routed to the filter when the chosen access path does not use
//! it) and `bind_filter` (always a filter). Both validate against the schema
//! and drop rejected bindings without raising, so chained calls compose; the
//! `try_*` forms return the rejection instead.
//!
//! Rebinding an attribute with `bind_key` replaces the earlier binding.
//! A `BindingSet` belongs to one query; clone it to branch variants.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

use crate::codec::KeySource;
use crate::condition::{build_predicate, BindingRejection, BindingResult, Comparison, Operand, Predicate};
use crate::observability::{log_event, Event};
use crate::schema::TableSchema;

/// The value recorded for a key binding
#[derive(Debug, Clone, PartialEq)]
pub enum BoundValue {
    /// Single operand (equality, ordering, prefix, membership test)
    Value(Value),
    /// Range operand
    Range { start: Value, end: Value },
    /// Candidate list for IN / NOT_IN
    List(Vec<Value>),
    /// Existence tests carry no value
    Presence,
}

impl From<&Operand> for BoundValue {
    fn from(operand: &Operand) -> Self {
        match operand {
            Operand::None => BoundValue::Presence,
            Operand::Single(v) => BoundValue::Value(v.clone()),
            Operand::Range { start, end } => BoundValue::Range {
                start: start.clone(),
                end: end.clone(),
            },
            Operand::List(values) => BoundValue::List(values.clone()),
        }
    }
}

/// Mutable per-query binding state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindingSet {
    bound_values: BTreeMap<String, BoundValue>,
    key_conditions: BTreeMap<String, Predicate>,
    filter_conditions: Vec<Predicate>,
    /// Attributes bound by equality; only these can satisfy hash keys and
    /// composite key parts
    consumed_attributes: BTreeSet<String>,
    preferred_sort_key: Option<String>,
    sort_descending: bool,
    limit: Option<u64>,
    page_cursor: Option<Value>,
}

impl BindingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a key-candidate binding, or returns why it was rejected.
    pub fn try_bind_key(
        &mut self,
        schema: &TableSchema,
        attribute: &str,
        comparison: Comparison,
    ) -> BindingResult<()> {
        let predicate = build_predicate(schema, attribute, comparison)?;

        if predicate.is_equality() {
            self.consumed_attributes.insert(attribute.to_string());
        } else {
            self.consumed_attributes.remove(attribute);
        }
        self.bound_values
            .insert(attribute.to_string(), BoundValue::from(&predicate.operand));
        self.key_conditions.insert(attribute.to_string(), predicate);
        Ok(())
    }

    /// Records a key-candidate binding; rejected bindings are dropped.
    pub fn bind_key(
        &mut self,
        schema: &TableSchema,
        attribute: &str,
        comparison: Comparison,
    ) -> &mut Self {
        if let Err(rejection) = self.try_bind_key(schema, attribute, comparison) {
            log_rejection("key", attribute, &rejection);
        }
        self
    }

    /// Records a filter binding, or returns why it was rejected.
    pub fn try_bind_filter(
        &mut self,
        schema: &TableSchema,
        attribute: &str,
        comparison: Comparison,
    ) -> BindingResult<()> {
        let predicate = build_predicate(schema, attribute, comparison)?;
        self.filter_conditions.push(predicate);
        Ok(())
    }

    /// Records a filter binding; rejected bindings are dropped.
    pub fn bind_filter(
        &mut self,
        schema: &TableSchema,
        attribute: &str,
        comparison: Comparison,
    ) -> &mut Self {
        if let Err(rejection) = self.try_bind_filter(schema, attribute, comparison) {
            log_rejection("filter", attribute, &rejection);
        }
        self
    }

    /// Sets the preferred sort key and direction, or returns why not.
    pub fn try_order_by(
        &mut self,
        schema: &TableSchema,
        attribute: &str,
        descending: bool,
    ) -> BindingResult<()> {
        if schema.attribute(attribute).is_none() {
            return Err(BindingRejection::UnknownAttribute(attribute.to_string()));
        }
        self.preferred_sort_key = Some(attribute.to_string());
        self.sort_descending = descending;
        Ok(())
    }

    /// Sets the preferred sort key and direction; unknown attributes are dropped.
    pub fn order_by(&mut self, schema: &TableSchema, attribute: &str, descending: bool) -> &mut Self {
        if let Err(rejection) = self.try_order_by(schema, attribute, descending) {
            log_rejection("order_by", attribute, &rejection);
        }
        self
    }

    /// Sets the sort direction without naming a sort key
    pub fn descending(&mut self, descending: bool) -> &mut Self {
        self.sort_descending = descending;
        self
    }

    /// Sets the page size, or returns why not.
    pub fn try_set_limit(&mut self, limit: u64) -> BindingResult<()> {
        if limit == 0 {
            return Err(BindingRejection::ZeroLimit);
        }
        self.limit = Some(limit);
        Ok(())
    }

    /// Sets the page size; zero is dropped.
    pub fn set_limit(&mut self, limit: u64) -> &mut Self {
        if let Err(rejection) = self.try_set_limit(limit) {
            log_rejection("limit", "", &rejection);
        }
        self
    }

    /// Sets the opaque pagination cursor, passed through to the plan unchanged
    pub fn start_from(&mut self, cursor: Value) -> &mut Self {
        self.page_cursor = Some(cursor);
        self
    }

    /// Value recorded for a key binding
    pub fn bound_value(&self, attribute: &str) -> Option<&BoundValue> {
        self.bound_values.get(attribute)
    }

    /// Returns true if `attribute` has a key binding
    pub fn is_bound(&self, attribute: &str) -> bool {
        self.bound_values.contains_key(attribute)
    }

    /// Predicate recorded for a key binding
    pub fn key_condition(&self, attribute: &str) -> Option<&Predicate> {
        self.key_conditions.get(attribute)
    }

    /// Key bindings ordered by attribute name
    pub fn key_conditions(&self) -> impl Iterator<Item = (&str, &Predicate)> {
        self.key_conditions.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Filter bindings in the order they were made
    pub fn filter_conditions(&self) -> &[Predicate] {
        &self.filter_conditions
    }

    pub fn consumed_attributes(&self) -> &BTreeSet<String> {
        &self.consumed_attributes
    }

    pub fn preferred_sort_key(&self) -> Option<&str> {
        self.preferred_sort_key.as_deref()
    }

    pub fn sort_descending(&self) -> bool {
        self.sort_descending
    }

    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    pub fn page_cursor(&self) -> Option<&Value> {
        self.page_cursor.as_ref()
    }

    /// Returns true if nothing has been bound
    pub fn is_empty(&self) -> bool {
        self.key_conditions.is_empty() && self.filter_conditions.is_empty()
    }
}

impl KeySource for BindingSet {
    fn equality_value(&self, attribute: &str) -> Option<&Value> {
        if !self.consumed_attributes.contains(attribute) {
            return None;
        }
        self.key_conditions
            .get(attribute)
            .and_then(Predicate::equality_value)
    }
}

fn log_rejection(kind: &str, attribute: &str, rejection: &BindingRejection) {
    let reason = rejection.to_string();
    log_event(
        Event::BindingRejected,
        &[
            ("attribute", attribute),
            ("binding", kind),
            ("code", rejection.code()),
            ("reason", reason.as_str()),
        ],
    );
}
