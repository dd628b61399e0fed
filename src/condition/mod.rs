//! Condition algebra for keyplan
//!
//! Operators, the per-type operator compatibility table, predicate and
//! condition values, and the assembler that validates bindings into
//! predicates.

mod assembler;
mod ast;
mod compat;
mod errors;
mod operator;

pub use assembler::{build_predicate, key_equality};
pub use ast::{Comparison, Condition, Operand, Predicate};
pub use compat::allowed_operators;
pub use errors::{BindingRejection, BindingResult};
pub use operator::{Arity, Operator, OperatorSet};
