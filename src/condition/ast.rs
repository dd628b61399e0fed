//! Predicate and condition values
//!
//! A `Predicate` is one operator applied to one attribute. A `Condition` is a
//! predicate or a conjunction of conditions; key and filter conditions are
//! both expressed this way.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::operator::Operator;

/// Operand of a predicate, shaped by the operator's arity
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Operand {
    None,
    Single(Value),
    Range { start: Value, end: Value },
    List(Vec<Value>),
}

/// One operator applied to one attribute
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Predicate {
    pub attribute: String,
    pub operator: Operator,
    pub operand: Operand,
}

impl Predicate {
    /// Equality predicate; no schema validation
    pub fn eq(attribute: impl Into<String>, value: Value) -> Self {
        Self {
            attribute: attribute.into(),
            operator: Operator::Eq,
            operand: Operand::Single(value),
        }
    }

    pub fn is_equality(&self) -> bool {
        self.operator == Operator::Eq
    }

    /// The equality value, if this is an equality predicate
    pub fn equality_value(&self) -> Option<&Value> {
        match (&self.operator, &self.operand) {
            (Operator::Eq, Operand::Single(v)) => Some(v),
            _ => None,
        }
    }
}

fn join_values(values: &[Value]) -> String {
    values
        .iter()
        .map(Value::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let attr = &self.attribute;
        match (&self.operator, &self.operand) {
            (Operator::Exists, _) => write!(f, "attribute_exists({})", attr),
            (Operator::NotExists, _) => write!(f, "attribute_not_exists({})", attr),
            (Operator::Between, Operand::Range { start, end }) => {
                write!(f, "{} BETWEEN {} AND {}", attr, start, end)
            }
            (Operator::In, Operand::List(values)) => {
                write!(f, "{} IN ({})", attr, join_values(values))
            }
            (Operator::NotIn, Operand::List(values)) => {
                write!(f, "NOT {} IN ({})", attr, join_values(values))
            }
            (Operator::Contains, Operand::Single(v)) => write!(f, "contains({}, {})", attr, v),
            (Operator::NotContains, Operand::Single(v)) => {
                write!(f, "NOT contains({}, {})", attr, v)
            }
            (Operator::BeginsWith, Operand::Single(v)) => write!(f, "begins_with({}, {})", attr, v),
            (op, Operand::Single(v)) => {
                let symbol = match op {
                    Operator::Eq => "=",
                    Operator::Ne => "<>",
                    Operator::Gt => ">",
                    Operator::Gte => ">=",
                    Operator::Lt => "<",
                    Operator::Lte => "<=",
                    other => other.as_str(),
                };
                write!(f, "{} {} {}", attr, symbol, v)
            }
            (op, operand) => write!(f, "{} {} {:?}", attr, op, operand),
        }
    }
}

/// Predicate tree combined with AND
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Predicate(Predicate),
    And(Vec<Condition>),
}

impl Condition {
    /// Combines conditions with AND, flattening nested conjunctions.
    ///
    /// Returns None for an empty input and the condition itself for one.
    pub fn all(conditions: impl IntoIterator<Item = Condition>) -> Option<Condition> {
        let mut flat = Vec::new();
        for condition in conditions {
            match condition {
                Condition::And(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        match flat.len() {
            0 => None,
            1 => flat.pop(),
            _ => Some(Condition::And(flat)),
        }
    }

    /// Leaf predicates in order
    pub fn predicates(&self) -> Vec<&Predicate> {
        match self {
            Condition::Predicate(p) => vec![p],
            Condition::And(inner) => inner.iter().flat_map(Condition::predicates).collect(),
        }
    }

    /// Attributes referenced by the leaf predicates
    pub fn attributes(&self) -> Vec<&str> {
        self.predicates()
            .into_iter()
            .map(|p| p.attribute.as_str())
            .collect()
    }
}

impl From<Predicate> for Condition {
    fn from(predicate: Predicate) -> Self {
        Condition::Predicate(predicate)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Predicate(p) => write!(f, "{}", p),
            Condition::And(inner) => {
                for (i, c) in inner.iter().enumerate() {
                    if i > 0 {
                        write!(f, " AND ")?;
                    }
                    write!(f, "{}", c)?;
                }
                Ok(())
            }
        }
    }
}

/// An operator with its unvalidated operand values, as a caller writes it
/// before binding it to an attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    #[serde(rename = "op")]
    pub operator: Operator,
    #[serde(default)]
    pub values: Vec<Value>,
}

impl Comparison {
    pub fn new(operator: Operator, values: Vec<Value>) -> Self {
        Self { operator, values }
    }

    pub fn eq(value: impl Into<Value>) -> Self {
        Self::new(Operator::Eq, vec![value.into()])
    }

    pub fn ne(value: impl Into<Value>) -> Self {
        Self::new(Operator::Ne, vec![value.into()])
    }

    pub fn gt(value: impl Into<Value>) -> Self {
        Self::new(Operator::Gt, vec![value.into()])
    }

    pub fn gte(value: impl Into<Value>) -> Self {
        Self::new(Operator::Gte, vec![value.into()])
    }

    pub fn lt(value: impl Into<Value>) -> Self {
        Self::new(Operator::Lt, vec![value.into()])
    }

    pub fn lte(value: impl Into<Value>) -> Self {
        Self::new(Operator::Lte, vec![value.into()])
    }

    /// Inclusive range; start <= end is left to the store
    pub fn between(start: impl Into<Value>, end: impl Into<Value>) -> Self {
        Self::new(Operator::Between, vec![start.into(), end.into()])
    }

    pub fn begins_with(prefix: impl Into<String>) -> Self {
        Self::new(Operator::BeginsWith, vec![Value::String(prefix.into())])
    }

    pub fn contains(value: impl Into<Value>) -> Self {
        Self::new(Operator::Contains, vec![value.into()])
    }

    pub fn not_contains(value: impl Into<Value>) -> Self {
        Self::new(Operator::NotContains, vec![value.into()])
    }

    pub fn is_in<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Self {
        Self::new(Operator::In, values.into_iter().map(Into::into).collect())
    }

    pub fn not_in<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Self {
        Self::new(Operator::NotIn, values.into_iter().map(Into::into).collect())
    }

    pub fn exists() -> Self {
        Self::new(Operator::Exists, Vec::new())
    }

    pub fn not_exists() -> Self {
        Self::new(Operator::NotExists, Vec::new())
    }
}
