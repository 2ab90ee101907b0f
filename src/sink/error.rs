//! Sink-specific error types
//!
//! Errors raised while delivering a closed batch. Batch delivery treats them
//! as warnings: a failing sink never stops the other sinks or the input loop.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while a sink emits a batch
#[derive(Debug, Error)]
pub enum SinkError {
    /// Failed to write a batch log file
    #[error("Failed to write {}: {source}", path.display())]
    WriteError {
        /// File the sink tried to create
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Failed to write to an output stream
    #[error("Output stream error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for sink operations
pub type Result<T> = std::result::Result<T, SinkError>;
