//! Observability for chirpstore
//!
//! - Structured logging (one JSON object per line)
//! - Typed lifecycle events
//! - Atomic counters
//!
//! Observability is read-only: nothing here affects the outcome of a
//! store or auth operation, and logging failures are swallowed.
//!
//! ```ignore
//! use chirpstore::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::PostCreated, &[("post_id", "1")]);
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
