//! Operator compatibility table
//!
//! Maps a declared attribute type to the operators legal against it. The
//! match is exhaustive, so a new attribute type needs a rule here.

use super::operator::{Operator, OperatorSet};
use crate::schema::AttributeType;

use Operator::*;

/// Operators legal against attributes of `declared_type`.
pub fn allowed_operators(declared_type: &AttributeType) -> OperatorSet {
    match declared_type {
        AttributeType::String => OperatorSet::all(),
        AttributeType::Number => OperatorSet::of(&[
            Eq, Ne, Gt, Gte, Lt, Lte, Between, In, NotIn, Exists, NotExists,
        ]),
        AttributeType::Boolean => OperatorSet::of(&[Eq, Ne, Exists, NotExists]),
        // Set membership, not scalar IN lists
        AttributeType::StringSet | AttributeType::NumberSet | AttributeType::BinarySet => {
            OperatorSet::of(&[Contains, NotContains, Exists, NotExists])
        }
        AttributeType::List | AttributeType::Map | AttributeType::Null => {
            OperatorSet::of(&[Exists, NotExists])
        }
        AttributeType::Unknown(_) => OperatorSet::of(&[Eq, Ne, Exists, NotExists]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_allows_everything() {
        assert_eq!(allowed_operators(&AttributeType::String), OperatorSet::all());
    }

    #[test]
    fn test_number_excludes_substring() {
        let ops = allowed_operators(&AttributeType::Number);
        assert!(ops.contains(Between));
        assert!(ops.contains(In));
        assert!(!ops.contains(BeginsWith));
        assert!(!ops.contains(Contains));
        assert!(!ops.contains(NotContains));
    }

    #[test]
    fn test_boolean_has_no_ordering() {
        let ops = allowed_operators(&AttributeType::Boolean);
        assert_eq!(ops.len(), 4);
        assert!(!ops.contains(Gt));
        assert!(!ops.contains(Between));
    }

    #[test]
    fn test_sets_use_membership_not_in_lists() {
        for ty in [
            AttributeType::StringSet,
            AttributeType::NumberSet,
            AttributeType::BinarySet,
        ] {
            let ops = allowed_operators(&ty);
            assert!(ops.contains(Contains));
            assert!(ops.contains(NotContains));
            assert!(!ops.contains(In));
            assert!(!ops.contains(NotIn));
            assert!(!ops.contains(Eq));
        }
    }

    #[test]
    fn test_documents_only_existence() {
        for ty in [AttributeType::List, AttributeType::Map, AttributeType::Null] {
            assert_eq!(
                allowed_operators(&ty).iter().collect::<Vec<_>>(),
                vec![Exists, NotExists]
            );
        }
    }

    #[test]
    fn test_unknown_type_is_conservative() {
        let ops = allowed_operators(&AttributeType::Unknown("uuid".into()));
        assert_eq!(ops, OperatorSet::of(&[Eq, Ne, Exists, NotExists]));
    }
}
