//! Explain output
//!
//! Produces deterministic, human-readable and JSON descriptions of a
//! planning decision, including every index considered and why it was
//! skipped.

use std::fmt;

use serde::Serialize;

use super::binding::BindingSet;
use super::errors::PlannerError;
use super::plan::AccessPlan;
use super::selector::{Candidate, IndexSelector};

/// One index as the selector saw it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateSummary {
    pub index: String,
    pub kind: &'static str,
    pub specificity: usize,
    pub admissible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped_because: Option<String>,
}

impl From<&Candidate<'_>> for CandidateSummary {
    fn from(candidate: &Candidate<'_>) -> Self {
        Self {
            index: candidate.index.name.clone(),
            kind: candidate.index.kind.as_str(),
            specificity: candidate.index.specificity(),
            admissible: candidate.verdict.is_admissible(),
            skipped_because: candidate.verdict.reason(),
        }
    }
}

/// Explain plan output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExplainPlan {
    /// Whether planning succeeded
    pub accepted: bool,
    pub table: String,
    /// Index name, or None for the table's primary key
    pub index: Option<String>,
    pub key_condition: Option<String>,
    pub filter_condition: Option<String>,
    pub projection: Option<String>,
    pub sort: String,
    pub limit: Option<u64>,
    /// Secondary indexes in the order they were tried
    pub candidates: Vec<CandidateSummary>,
    pub rejection_reason: Option<String>,
    pub rejection_code: Option<String>,
}

impl ExplainPlan {
    /// Plans `bindings` and explains the outcome.
    pub fn build(selector: &IndexSelector<'_>, bindings: &BindingSet) -> Self {
        let candidates: Vec<CandidateSummary> = selector
            .rank(bindings)
            .iter()
            .map(CandidateSummary::from)
            .collect();

        let explain = match selector.plan(bindings) {
            Ok(plan) => Self::from_plan(&plan),
            Err(err) => Self::from_error(&err, bindings.sort_descending()),
        };
        explain.with_candidates(candidates)
    }

    /// Creates an explain plan from a successful access plan
    pub fn from_plan(plan: &AccessPlan) -> Self {
        Self {
            accepted: true,
            table: plan.table_name.clone(),
            index: plan.index_name.clone(),
            key_condition: Some(plan.key_condition.to_string()),
            filter_condition: plan.filter_condition.as_ref().map(ToString::to_string),
            projection: Some(plan.projection.as_str().to_string()),
            sort: sort_label(plan.sort_descending).to_string(),
            limit: plan.limit,
            candidates: Vec::new(),
            rejection_reason: None,
            rejection_code: None,
        }
    }

    /// Creates an explain plan from a planning error
    pub fn from_error(err: &PlannerError, descending: bool) -> Self {
        Self {
            accepted: false,
            table: err.table().to_string(),
            index: None,
            key_condition: None,
            filter_condition: None,
            projection: None,
            sort: sort_label(descending).to_string(),
            limit: None,
            candidates: Vec::new(),
            rejection_reason: Some(err.message().to_string()),
            rejection_code: Some(err.code().code().to_string()),
        }
    }

    pub fn with_candidates(mut self, candidates: Vec<CandidateSummary>) -> Self {
        self.candidates = candidates;
        self
    }
}

fn sort_label(descending: bool) -> &'static str {
    if descending {
        "DESC"
    } else {
        "ASC"
    }
}

impl fmt::Display for ExplainPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== EXPLAIN PLAN ===")?;
        writeln!(f, "Table: {}", self.table)?;

        if self.accepted {
            writeln!(f, "Status: ACCEPTED")?;
            match &self.index {
                Some(index) => writeln!(f, "Access Path: INDEX {}", index)?,
                None => writeln!(f, "Access Path: TABLE")?,
            }
            if let Some(key) = &self.key_condition {
                writeln!(f, "Key Condition: {}", key)?;
            }
            if let Some(filter) = &self.filter_condition {
                writeln!(f, "Filter: {}", filter)?;
            }
            if let Some(projection) = &self.projection {
                writeln!(f, "Projection: {}", projection)?;
            }
            writeln!(f, "Sort: {}", self.sort)?;
            if let Some(limit) = self.limit {
                writeln!(f, "Limit: {}", limit)?;
            }
        } else {
            writeln!(f, "Status: REJECTED")?;
            if let Some(code) = &self.rejection_code {
                writeln!(f, "Error Code: {}", code)?;
            }
            if let Some(reason) = &self.rejection_reason {
                writeln!(f, "Reason: {}", reason)?;
            }
        }

        if !self.candidates.is_empty() {
            writeln!(f, "Candidates:")?;
            for c in &self.candidates {
                match &c.skipped_because {
                    None => writeln!(f, "  - {} ({}, specificity {}): admissible", c.index, c.kind, c.specificity)?,
                    Some(reason) => writeln!(
                        f,
                        "  - {} ({}, specificity {}): skipped, {}",
                        c.index, c.kind, c.specificity, reason
                    )?,
                }
            }
        }

        Ok(())
    }
}
