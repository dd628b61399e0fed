//! Access-pattern planner
//!
//! Turns a `BindingSet` into an `AccessPlan` against one `TableSchema`:
//! which index (or the table itself) to read, the key condition it serves,
//! and the residual filter.
//!
//! # Design Principles
//!
//! - Deterministic: same schema and bindings produce the same plan
//! - Lossless: every valid binding lands in the key condition or the filter
//! - Explicit: the only failure is an unbound table hash key
//!
//! # Index Selection Priority (strict order)
//!
//! 1. Simple range key equal to the preferred sort key
//! 2. Higher specificity
//! 3. Declaration order
//!
//! The primary table is used only when no secondary index is admissible.

mod binding;
mod errors;
mod explain;
mod plan;
mod query;
mod selector;

pub use binding::{BindingSet, BoundValue};
pub use errors::{PlannerError, PlannerErrorCode, PlannerResult, Severity};
pub use explain::{CandidateSummary, ExplainPlan};
pub use plan::AccessPlan;
pub use query::Query;
pub use selector::{Candidate, IndexSelector, KeyAccess, Verdict};
