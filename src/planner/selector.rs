//! Index selection
//!
//! Secondary indexes are tried in priority order:
//! 1. An index whose simple range key is the preferred sort key
//! 2. Higher specificity (hash parts plus range parts)
//! 3. Declaration order
//!
//! The first admissible index wins. If none is, the table's own key is used
//! when its hash key is bound by equality; otherwise planning fails.
//!
//! Admissibility:
//! - Every hash key part is bound by equality
//! - A composite range key has every part bound by equality
//! - A simple range key may be unbound; when bound with a key operator its
//!   predicate becomes the range condition, otherwise it stays in the filter

use std::collections::BTreeSet;

use crate::codec::{all_parts_bound, key_name, key_value, KeySource};
use crate::condition::{key_equality, Condition, Predicate};
use crate::observability::{log_event, Event};
use crate::schema::{IndexDescriptor, IndexKey, Projection, TableSchema};

use super::binding::BindingSet;
use super::errors::{PlannerError, PlannerResult};
use super::plan::AccessPlan;

/// Key condition an access path can serve for a binding set
#[derive(Debug, Clone, PartialEq)]
pub struct KeyAccess {
    pub hash: Predicate,
    pub range: Option<Predicate>,
    /// Bound attributes the key condition accounts for
    pub consumed: BTreeSet<String>,
}

impl KeyAccess {
    /// Hash equality, followed by the range predicate if any
    pub fn condition(&self) -> Condition {
        match &self.range {
            Some(range) => Condition::And(vec![self.hash.clone().into(), range.clone().into()]),
            None => self.hash.clone().into(),
        }
    }
}

/// Outcome of testing one index against a binding set
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Admissible(KeyAccess),
    /// Hash key parts without an equality binding
    HashKeyUnbound(Vec<String>),
    /// Composite range key parts without an equality binding
    RangeKeyUnbound(Vec<String>),
}

impl Verdict {
    pub fn is_admissible(&self) -> bool {
        matches!(self, Verdict::Admissible(_))
    }

    /// Why the index was skipped, if it was
    pub fn reason(&self) -> Option<String> {
        match self {
            Verdict::Admissible(_) => None,
            Verdict::HashKeyUnbound(missing) => {
                Some(format!("hash key part(s) not bound by equality: {}", missing.join(", ")))
            }
            Verdict::RangeKeyUnbound(missing) => {
                Some(format!("range key part(s) not bound by equality: {}", missing.join(", ")))
            }
        }
    }
}

/// One index in priority order with its verdict
#[derive(Debug, Clone)]
pub struct Candidate<'a> {
    pub index: &'a IndexDescriptor,
    pub verdict: Verdict,
}

/// Chooses an access path for binding sets against one schema.
///
/// Holds only a shared reference; any number of selectors may plan
/// concurrently against the same schema.
#[derive(Debug, Clone, Copy)]
pub struct IndexSelector<'a> {
    schema: &'a TableSchema,
}

impl<'a> IndexSelector<'a> {
    pub fn new(schema: &'a TableSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &'a TableSchema {
        self.schema
    }

    /// All secondary indexes in priority order, each with its verdict.
    pub fn rank(&self, bindings: &BindingSet) -> Vec<Candidate<'a>> {
        let preferred = bindings.preferred_sort_key();
        let mut ordered: Vec<&'a IndexDescriptor> = self.schema.indexes().iter().collect();

        // sort_by is stable: declaration order breaks ties
        ordered.sort_by(|a, b| {
            let a_pref = prefers(a, preferred);
            let b_pref = prefers(b, preferred);
            b_pref
                .cmp(&a_pref)
                .then_with(|| b.specificity().cmp(&a.specificity()))
        });

        ordered
            .into_iter()
            .map(|index| Candidate {
                index,
                verdict: evaluate(&index.hash_key, index.range_key.as_ref(), bindings),
            })
            .collect()
    }

    /// Plans the query: first admissible index, else the table, else an error.
    pub fn plan(&self, bindings: &BindingSet) -> PlannerResult<AccessPlan> {
        let candidates = self.rank(bindings);

        for candidate in &candidates {
            match &candidate.verdict {
                Verdict::Admissible(access) => {
                    let plan = self.assemble(Some(candidate.index), access, bindings);
                    log_event(
                        Event::PlanSelected,
                        &[
                            ("table", self.schema.name()),
                            ("index", candidate.index.name.as_str()),
                        ],
                    );
                    return Ok(plan);
                }
                skipped => {
                    let reason = skipped.reason().unwrap_or_default();
                    log_event(
                        Event::IndexSkipped,
                        &[
                            ("index", candidate.index.name.as_str()),
                            ("reason", reason.as_str()),
                        ],
                    );
                }
            }
        }

        match self.table_verdict(bindings) {
            Verdict::Admissible(access) => {
                log_event(
                    Event::PlanFallbackPrimary,
                    &[("table", self.schema.name())],
                );
                Ok(self.assemble(None, &access, bindings))
            }
            _ => {
                let err = PlannerError::no_access_path(
                    self.schema.name(),
                    self.schema.hash_key(),
                    candidates.len(),
                );
                log_event(
                    Event::PlanFailed,
                    &[("table", self.schema.name()), ("code", err.code().code())],
                );
                Err(err)
            }
        }
    }

    /// Verdict for the table's own primary key
    pub fn table_verdict(&self, bindings: &BindingSet) -> Verdict {
        let hash = IndexKey::attribute(self.schema.hash_key());
        let range = self.schema.range_key().map(IndexKey::attribute);
        evaluate(&hash, range.as_ref(), bindings)
    }

    fn assemble(
        &self,
        index: Option<&IndexDescriptor>,
        access: &KeyAccess,
        bindings: &BindingSet,
    ) -> AccessPlan {
        AccessPlan {
            table_name: self.schema.name().to_string(),
            index_name: index.map(|i| i.name.clone()),
            index_kind: index.map(|i| i.kind),
            projection: index.map_or(Projection::All, |i| i.projection),
            key_condition: access.condition(),
            filter_condition: residual_filter(&access.consumed, bindings),
            page_cursor: bindings.page_cursor().cloned(),
            limit: bindings.limit(),
            sort_descending: bindings.sort_descending(),
        }
    }
}

fn prefers(index: &IndexDescriptor, preferred: Option<&str>) -> bool {
    match (index.simple_range_attribute(), preferred) {
        (Some(range), Some(preferred)) => range == preferred,
        _ => false,
    }
}

fn evaluate(hash_key: &IndexKey, range_key: Option<&IndexKey>, bindings: &BindingSet) -> Verdict {
    let mut consumed = BTreeSet::new();

    let hash = match equality_condition(hash_key, bindings, &mut consumed) {
        Ok(predicate) => predicate,
        Err(missing) => return Verdict::HashKeyUnbound(missing),
    };

    let range = match range_key {
        None => None,
        Some(key) => match key.as_simple() {
            Some(attribute) => match bindings.key_condition(attribute) {
                Some(predicate) if predicate.operator.is_key_operator() => {
                    consumed.insert(attribute.to_string());
                    Some(predicate.clone())
                }
                _ => None,
            },
            None => match equality_condition(key, bindings, &mut consumed) {
                Ok(predicate) => Some(predicate),
                Err(missing) => return Verdict::RangeKeyUnbound(missing),
            },
        },
    };

    Verdict::Admissible(KeyAccess {
        hash,
        range,
        consumed,
    })
}

/// Equality on a simple or composite key, or the unbound reference parts.
fn equality_condition(
    key: &IndexKey,
    bindings: &BindingSet,
    consumed: &mut BTreeSet<String>,
) -> Result<Predicate, Vec<String>> {
    if let Some(attribute) = key.as_simple() {
        return match bindings.equality_value(attribute) {
            Some(value) => {
                consumed.insert(attribute.to_string());
                Ok(key_equality(attribute, value.clone()))
            }
            None => Err(vec![attribute.to_string()]),
        };
    }

    let parts = key.parts();
    if !all_parts_bound(&parts, bindings) {
        return Err(key
            .referenced_attributes()
            .into_iter()
            .filter(|a| bindings.equality_value(a).is_none())
            .map(str::to_string)
            .collect());
    }
    let value = key_value(&parts, bindings).ok_or_else(Vec::new)?;
    consumed.extend(key.referenced_attributes().into_iter().map(str::to_string));
    Ok(key_equality(key_name(&parts), value.into()))
}

/// Unconsumed key bindings (by attribute name), then explicit filters.
fn residual_filter(consumed: &BTreeSet<String>, bindings: &BindingSet) -> Option<Condition> {
    let leftovers = bindings
        .key_conditions()
        .filter(|(attribute, _)| !consumed.contains(*attribute))
        .map(|(_, predicate)| Condition::from(predicate.clone()));
    let filters = bindings
        .filter_conditions()
        .iter()
        .cloned()
        .map(Condition::from);
    Condition::all(leftovers.chain(filters))
}
