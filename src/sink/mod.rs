//! Batch sinks and the subscription registry
//!
//! A sink receives the lifecycle of every closed batch: one start, each
//! command in order, then one end. Sinks never see delimiter lines.
//!
//! # Sinks
//!
//! - **`ConsoleSink`**: writes `bulk: ...` lines to stdout (or any writer)
//! - **`FileSink`**: writes the same line into one `bulk<micros>.log` file per batch
//!
//! New sinks only need to implement [`Sink`]; the processor does not change.

mod console;
mod error;
mod file;

pub use console::ConsoleSink;
pub use error::{Result, SinkError};
pub use file::FileSink;

use chrono::{DateTime, Utc};
use tracing::warn;

/// Consumer of batch lifecycle events
pub trait Sink {
    /// Short name used in diagnostics
    fn name(&self) -> &str {
        "sink"
    }

    /// A new batch started; `started_at` is its identity stamp
    fn on_batch_start(&mut self, started_at: DateTime<Utc>);

    /// A command was appended to the current batch
    fn on_command(&mut self, command: &str);

    /// The current batch closed
    ///
    /// # Errors
    ///
    /// Returns `SinkError` if the batch could not be emitted.
    fn on_batch_end(&mut self) -> Result<()>;
}

/// Subscribed sinks, notified in registration order
///
/// The registry borrows its sinks rather than owning them, so the caller
/// keeps each sink and can inspect it once processing is done.
#[derive(Default)]
pub struct Registry<'a> {
    sinks: Vec<&'a mut dyn Sink>,
}

impl<'a> Registry<'a> {
    /// Create an empty registry
    #[must_use]
    pub const fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    /// Add a sink; it will be notified after all earlier ones
    pub fn subscribe(&mut self, sink: &'a mut dyn Sink) {
        self.sinks.push(sink);
    }

    /// Number of subscribed sinks
    #[must_use]
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// Whether no sink is subscribed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Notify every sink that a batch started
    pub fn batch_start(&mut self, started_at: DateTime<Utc>) {
        for sink in &mut self.sinks {
            sink.on_batch_start(started_at);
        }
    }

    /// Deliver one command to every sink
    pub fn command(&mut self, command: &str) {
        for sink in &mut self.sinks {
            sink.on_command(command);
        }
    }

    /// Notify every sink that the batch closed
    ///
    /// A failing sink is reported as a warning and does not keep the
    /// remaining sinks from being notified. Returns the number of failures.
    pub fn batch_end(&mut self) -> usize {
        let mut failures = 0;
        for sink in &mut self.sinks {
            if let Err(e) = sink.on_batch_end() {
                failures += 1;
                warn!(sink = sink.name(), error = %e, "failed to emit batch");
            }
        }
        failures
    }
}

impl std::fmt::Debug for Registry<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.sinks.iter().map(|sink| sink.name()))
            .finish()
    }
}
