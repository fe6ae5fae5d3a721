//! Observability subsystem for nodelink
//!
//! This module provides:
//! - Structured logging (JSON, one line per event)
//! - Per-request query counters
//! - Typed resolution events
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on resolution results
//! 3. No background threads
//!
//! # Usage
//!
//! ```ignore
//! use nodelink::observability::{log_event_with_fields, Event, QueryStats};
//!
//! log_event_with_fields(Event::RunQuery, &[("type", "MarkdownRemark")]);
//!
//! let stats = QueryStats::new();
//! stats.increment_run_query();
//! ```

mod events;
mod logger;
mod stats;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use stats::{QueryStats, QueryStatsSnapshot};

/// Log a resolution event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event_with_fields() {
        log_event_with_fields(Event::NodesLoaded, &[("count", "3")]);
    }
}
