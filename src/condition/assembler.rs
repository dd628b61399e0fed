//! Condition assembler
//!
//! Turns an attribute name plus a `Comparison` into a schema-checked
//! `Predicate`, and builds the key-condition predicates the selector needs.
//!
//! Checks, in order:
//! 1. The attribute is declared
//! 2. The operator is legal for the attribute's declared type
//! 3. The operand count matches the operator
//! 4. Every operand fits the declared type (and refined numeric kind)
//!
//! Range bounds are not ordered here; the store rejects inverted ranges.

use serde_json::Value;

use super::ast::{Comparison, Operand, Predicate};
use super::errors::{BindingRejection, BindingResult};
use super::operator::{Arity, Operator};
use crate::schema::{Attribute, AttributeType, TableSchema};

/// Builds a validated predicate for `attribute`.
pub fn build_predicate(
    schema: &TableSchema,
    attribute: &str,
    comparison: Comparison,
) -> BindingResult<Predicate> {
    let attr = schema
        .attribute(attribute)
        .ok_or_else(|| BindingRejection::UnknownAttribute(attribute.to_string()))?;

    let Comparison { operator, values } = comparison;

    if !schema.validate_operator(attribute, operator) {
        return Err(BindingRejection::OperatorNotAllowed {
            attribute: attribute.to_string(),
            operator,
            attribute_type: attr.declared_type.to_string(),
        });
    }

    let arity = operator.arity();
    if !arity.accepts(values.len()) {
        return Err(BindingRejection::Arity {
            operator,
            expected: arity.describe(),
            actual: values.len(),
        });
    }

    for value in &values {
        if !operand_fits(attr, operator, value) {
            return Err(BindingRejection::OperandType {
                attribute: attribute.to_string(),
                attribute_type: attr.declared_type.to_string(),
                value: value.to_string(),
            });
        }
    }

    Ok(Predicate {
        attribute: attribute.to_string(),
        operator,
        operand: shape_operand(arity, values),
    })
}

fn shape_operand(arity: Arity, mut values: Vec<Value>) -> Operand {
    match arity {
        Arity::Nullary => Operand::None,
        Arity::Unary => values.pop().map_or(Operand::None, Operand::Single),
        Arity::Binary => {
            let end = values.pop().unwrap_or(Value::Null);
            let start = values.pop().unwrap_or(Value::Null);
            Operand::Range { start, end }
        }
        Arity::Variadic => Operand::List(values),
    }
}

/// Checks one operand against the attribute. Set membership operands are
/// element scalars; prefix tests always need text.
fn operand_fits(attr: &Attribute, operator: Operator, value: &Value) -> bool {
    if operator == Operator::BeginsWith {
        return value.is_string();
    }
    match &attr.declared_type {
        AttributeType::String => value.is_string(),
        AttributeType::Number => number_fits(attr, value),
        AttributeType::Boolean => value.is_boolean(),
        AttributeType::StringSet | AttributeType::BinarySet => value.is_string(),
        AttributeType::NumberSet => number_fits(attr, value),
        AttributeType::List | AttributeType::Map | AttributeType::Null => false,
        AttributeType::Unknown(_) => true,
    }
}

fn number_fits(attr: &Attribute, value: &Value) -> bool {
    match (value, attr.refined_kind) {
        (Value::Number(n), Some(kind)) => kind.accepts(n),
        (Value::Number(_), None) => true,
        _ => false,
    }
}

/// Key-condition equality on a synthetic or plain key attribute.
pub fn key_equality(key_name: impl Into<String>, value: Value) -> Predicate {
    Predicate::eq(key_name, value)
}
