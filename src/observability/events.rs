//! Observable events for keyplan
//!
//! Events are explicit and typed; each carries its default severity.

use std::fmt;

use super::logger::Severity;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration file loaded
    ConfigLoaded,
    /// Table schema loaded and validated
    SchemaLoaded,

    // Binding
    /// A binding was dropped by validation
    BindingRejected,

    // Planning
    /// An index was passed over during selection
    IndexSkipped,
    /// A secondary index was chosen
    PlanSelected,
    /// No index was admissible; primary table used
    PlanFallbackPrimary,
    /// No access path exists
    PlanFailed,
}

impl Event {
    /// Returns the event name used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SchemaLoaded => "SCHEMA_LOADED",
            Event::BindingRejected => "BINDING_REJECTED",
            Event::IndexSkipped => "INDEX_SKIPPED",
            Event::PlanSelected => "PLAN_SELECTED",
            Event::PlanFallbackPrimary => "PLAN_FALLBACK_PRIMARY",
            Event::PlanFailed => "PLAN_FAILED",
        }
    }

    /// Default severity for this event
    pub fn severity(&self) -> Severity {
        match self {
            Event::ConfigLoaded | Event::SchemaLoaded => Severity::Info,
            Event::PlanFailed => Severity::Warn,
            Event::BindingRejected
            | Event::IndexSkipped
            | Event::PlanSelected
            | Event::PlanFallbackPrimary => Severity::Trace,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
