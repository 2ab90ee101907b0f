//! Batch boundary state machine
//!
//! The processor consumes one line at a time and decides where batches
//! begin and end. Outside a dynamic block (depth 0) a batch closes once it
//! holds `max_size` commands. Inside a block, fixed-size batching is
//! suspended and the batch closes only when the outermost block closes.
//!
//! # Boundaries
//!
//! - **`FixedSize`**: the batch reached `max_size` at depth 0
//! - **`DynamicOpen`**: a `{` line preempts a partially filled batch
//! - **`DynamicClose`**: the outermost `}` closes the block's batch
//! - **`EndOfInput`**: `terminate` flushes what remains at depth 0
//!
//! A block still open at end of input is dropped without a batch end.

use std::fmt;
use std::num::NonZeroUsize;

use tracing::{debug, trace};

use crate::batch::{Batch, Line};
use crate::clock::{Clock, SystemClock};
use crate::sink::{Registry, Sink};

/// Reason a batch closed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// Batch reached the configured size
    FixedSize,
    /// A dynamic block opened while commands were pending
    DynamicOpen,
    /// The outermost dynamic block closed
    DynamicClose,
    /// Input ended outside any dynamic block
    EndOfInput,
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FixedSize => "fixed-size",
            Self::DynamicOpen => "dynamic-open",
            Self::DynamicClose => "dynamic-close",
            Self::EndOfInput => "end-of-input",
        };
        f.write_str(name)
    }
}

/// Totals for one processing run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Non-empty batches delivered to sinks
    pub batches: usize,
    /// Commands inside delivered batches
    pub commands: usize,
    /// Commands discarded with an unterminated dynamic block
    pub dropped: usize,
    /// Sink failures reported while closing batches
    pub sink_failures: usize,
}

/// Groups incoming lines into batches and notifies subscribed sinks
///
/// # Examples
///
/// ```
/// use std::num::NonZeroUsize;
/// use bulk::{BatchProcessor, ConsoleSink};
///
/// let mut console = ConsoleSink::with_writer(Vec::new());
/// let mut processor = BatchProcessor::new(NonZeroUsize::new(2).unwrap());
/// processor.subscribe(&mut console);
///
/// for line in ["cmd1", "cmd2", "cmd3"] {
///     processor.on_line(line);
/// }
/// let summary = processor.terminate();
///
/// assert_eq!(summary.batches, 2);
/// assert_eq!(console.into_inner(), b"bulk: cmd1, cmd2\nbulk: cmd3\n");
/// ```
pub struct BatchProcessor<'a, C: Clock = SystemClock> {
    max_size: NonZeroUsize,
    depth: usize,
    batch: Batch,
    clock: C,
    sinks: Registry<'a>,
    summary: RunSummary,
}

impl<'a> BatchProcessor<'a> {
    /// Create a processor stamping batches with wall-clock time
    #[must_use]
    pub fn new(max_size: NonZeroUsize) -> Self {
        Self::with_clock(max_size, SystemClock)
    }
}

impl<'a, C: Clock> BatchProcessor<'a, C> {
    /// Create a processor with an explicit clock
    #[must_use]
    pub fn with_clock(max_size: NonZeroUsize, clock: C) -> Self {
        Self {
            max_size,
            depth: 0,
            batch: Batch::new(),
            clock,
            sinks: Registry::new(),
            summary: RunSummary::default(),
        }
    }

    /// Subscribe a sink to batch events
    ///
    /// Sinks are notified in the order they were subscribed.
    pub fn subscribe(&mut self, sink: &'a mut dyn Sink) {
        self.sinks.subscribe(sink);
    }

    /// Configured fixed batch size
    #[must_use]
    pub const fn max_size(&self) -> NonZeroUsize {
        self.max_size
    }

    /// Current dynamic block nesting level
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Commands accumulated since the last boundary
    #[must_use]
    pub fn pending(&self) -> usize {
        self.batch.len()
    }

    /// Number of subscribed sinks
    #[must_use]
    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    /// Totals so far
    #[must_use]
    pub const fn summary(&self) -> RunSummary {
        self.summary
    }

    /// Process one input line
    pub fn on_line(&mut self, line: &str) {
        match Line::classify(line, self.depth) {
            Line::Open => {
                if self.depth == 0 && !self.batch.is_empty() {
                    self.close(Boundary::DynamicOpen);
                }
                self.depth += 1;
                trace!(depth = self.depth, "dynamic block opened");
            }
            Line::Close => {
                self.depth -= 1;
                trace!(depth = self.depth, "dynamic block closed");
                if self.depth == 0 {
                    self.close(Boundary::DynamicClose);
                }
            }
            Line::Command(command) => {
                if let Some(started_at) = self.batch.push(command, &self.clock) {
                    self.sinks.batch_start(started_at);
                }
                self.sinks.command(command);
                if self.depth == 0 && self.batch.len() >= self.max_size.get() {
                    self.close(Boundary::FixedSize);
                }
            }
        }
    }

    /// Finish processing at end of input
    ///
    /// Flushes a pending batch at depth 0. A dynamic block left open is
    /// discarded: its commands are counted as dropped and no batch end is
    /// sent.
    pub fn terminate(mut self) -> RunSummary {
        if self.depth > 0 {
            let dropped = self.batch.take();
            if !dropped.is_empty() {
                debug!(
                    depth = self.depth,
                    commands = dropped.len(),
                    "discarding unterminated dynamic block"
                );
            }
            self.summary.dropped += dropped.len();
        } else {
            self.close(Boundary::EndOfInput);
        }
        debug!(
            batches = self.summary.batches,
            commands = self.summary.commands,
            dropped = self.summary.dropped,
            "processing finished"
        );
        self.summary
    }

    fn close(&mut self, boundary: Boundary) {
        let batch = self.batch.take();
        if batch.is_empty() {
            return;
        }
        debug!(
            %boundary,
            commands = batch.len(),
            started_at = ?batch.started_at(),
            "closing batch"
        );
        self.summary.batches += 1;
        self.summary.commands += batch.len();
        self.summary.sink_failures += self.sinks.batch_end();
    }
}

impl<C: Clock> fmt::Debug for BatchProcessor<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchProcessor")
            .field("max_size", &self.max_size)
            .field("depth", &self.depth)
            .field("pending", &self.batch.len())
            .field("sinks", &self.sinks)
            .finish_non_exhaustive()
    }
}
