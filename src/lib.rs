//! keyplan - access-pattern planner and composite-key codec for hash/range
//! key-value stores
//!
//! A `TableSchema` is loaded once and shared read-only. Each query builds a
//! `BindingSet`, and the `IndexSelector` turns it into an `AccessPlan`: the
//! index (or table) to read, its key condition, and the residual filter.

pub mod cli;
pub mod codec;
pub mod condition;
pub mod observability;
pub mod planner;
pub mod schema;
