//! Bulk - groups a stream of commands into batches
//!
//! This library reads commands one line at a time and closes a batch when it
//! reaches the configured size, when a dynamic `{ ... }` block ends, or when
//! input runs out. Closed batches are delivered to every subscribed sink.

use thiserror::Error;

pub mod batch;
pub mod cli;
pub mod clock;
pub mod config;
pub mod driver;
pub mod logging;
pub mod processor;
pub mod sink;

#[cfg(test)]
pub mod testing;

pub use batch::{Batch, Line, format_bulk};
pub use clock::{Clock, ManualClock, SystemClock};
pub use processor::{BatchProcessor, Boundary, RunSummary};
pub use sink::{ConsoleSink, FileSink, Registry, Sink, SinkError};

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum BulkError {
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ::config::ConfigError),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
