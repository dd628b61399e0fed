//! Operator vocabulary and operator sets

use serde::{Deserialize, Serialize};
use std::fmt;

/// Condition operators, as named on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    Between,
    Contains,
    NotContains,
    BeginsWith,
    In,
    NotIn,
    Exists,
    NotExists,
}

/// How many operands an operator takes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// No operand (existence tests)
    Nullary,
    /// Exactly one operand
    Unary,
    /// Exactly two operands (range)
    Binary,
    /// One or more operands (membership in a list)
    Variadic,
}

impl Arity {
    /// Human-readable operand count for error messages
    pub fn describe(&self) -> &'static str {
        match self {
            Arity::Nullary => "no",
            Arity::Unary => "exactly 1",
            Arity::Binary => "exactly 2",
            Arity::Variadic => "at least 1",
        }
    }

    /// Returns true if `count` operands satisfy this arity
    pub fn accepts(&self, count: usize) -> bool {
        match self {
            Arity::Nullary => count == 0,
            Arity::Unary => count == 1,
            Arity::Binary => count == 2,
            Arity::Variadic => count >= 1,
        }
    }
}

impl Operator {
    /// Every operator in declaration order
    pub const ALL: [Operator; 14] = [
        Operator::Eq,
        Operator::Ne,
        Operator::Gt,
        Operator::Gte,
        Operator::Lt,
        Operator::Lte,
        Operator::Between,
        Operator::Contains,
        Operator::NotContains,
        Operator::BeginsWith,
        Operator::In,
        Operator::NotIn,
        Operator::Exists,
        Operator::NotExists,
    ];

    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "EQ",
            Operator::Ne => "NE",
            Operator::Gt => "GT",
            Operator::Gte => "GTE",
            Operator::Lt => "LT",
            Operator::Lte => "LTE",
            Operator::Between => "BETWEEN",
            Operator::Contains => "CONTAINS",
            Operator::NotContains => "NOT_CONTAINS",
            Operator::BeginsWith => "BEGINS_WITH",
            Operator::In => "IN",
            Operator::NotIn => "NOT_IN",
            Operator::Exists => "EXISTS",
            Operator::NotExists => "NOT_EXISTS",
        }
    }

    pub fn arity(&self) -> Arity {
        match self {
            Operator::Exists | Operator::NotExists => Arity::Nullary,
            Operator::Between => Arity::Binary,
            Operator::In | Operator::NotIn => Arity::Variadic,
            _ => Arity::Unary,
        }
    }

    /// Returns true if the store accepts this operator in a range-key condition
    pub fn is_key_operator(&self) -> bool {
        matches!(
            self,
            Operator::Eq
                | Operator::Lt
                | Operator::Lte
                | Operator::Gt
                | Operator::Gte
                | Operator::Between
                | Operator::BeginsWith
        )
    }

    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Compact set of operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct OperatorSet(u16);

impl OperatorSet {
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn all() -> Self {
        Self::of(&Operator::ALL)
    }

    pub fn of(ops: &[Operator]) -> Self {
        Self(ops.iter().fold(0, |acc, op| acc | op.bit()))
    }

    pub fn contains(&self, op: Operator) -> bool {
        self.0 & op.bit() != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Members in declaration order
    pub fn iter(&self) -> impl Iterator<Item = Operator> + '_ {
        Operator::ALL.into_iter().filter(move |op| self.contains(*op))
    }
}
