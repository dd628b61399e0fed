//! Observability for keyplan
//!
//! Structured JSON logging of typed events. Observability is read-only: it
//! never changes a planning result, and a failed write is ignored.
//!
//! # Usage
//!
//! ```ignore
//! use keyplan::observability::{log_event, Event, Logger, Severity};
//!
//! Logger::set_min_severity(Severity::Trace);
//! log_event(Event::PlanSelected, &[("index", "by_category")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log an event at its default severity
pub fn log_event(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
