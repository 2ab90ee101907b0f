//! Testing utilities for bulk
//!
//! This module provides sinks that record or fail on purpose, plus a helper
//! that runs a whole line sequence through a processor.
//!
//! Only available when compiled with `cfg(test)`.

use std::io;
use std::num::NonZeroUsize;

use chrono::{DateTime, TimeDelta, Utc};

use crate::clock::ManualClock;
use crate::processor::BatchProcessor;
use crate::sink::{Result, Sink, SinkError};

/// One lifecycle event seen by a [`RecordingSink`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Start(DateTime<Utc>),
    Command(String),
    End,
}

/// Sink that remembers every event it receives
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<SinkEvent>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands of each batch that received an end event
    #[must_use]
    pub fn batches(&self) -> Vec<Vec<String>> {
        let mut batches = Vec::new();
        let mut current = Vec::new();
        for event in &self.events {
            match event {
                SinkEvent::Start(_) => current.clear(),
                SinkEvent::Command(cmd) => current.push(cmd.clone()),
                SinkEvent::End => batches.push(std::mem::take(&mut current)),
            }
        }
        batches
    }

    #[must_use]
    pub fn starts(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, SinkEvent::Start(_)))
            .count()
    }

    #[must_use]
    pub fn ends(&self) -> usize {
        self.events.iter().filter(|e| **e == SinkEvent::End).count()
    }
}

impl Sink for RecordingSink {
    fn name(&self) -> &str {
        "recording"
    }

    fn on_batch_start(&mut self, started_at: DateTime<Utc>) {
        self.events.push(SinkEvent::Start(started_at));
    }

    fn on_command(&mut self, command: &str) {
        self.events.push(SinkEvent::Command(command.to_string()));
    }

    fn on_batch_end(&mut self) -> Result<()> {
        self.events.push(SinkEvent::End);
        Ok(())
    }
}

/// Sink whose batch end always fails
#[derive(Debug, Default)]
pub struct FailingSink;

impl Sink for FailingSink {
    fn name(&self) -> &str {
        "failing"
    }

    fn on_batch_start(&mut self, _started_at: DateTime<Utc>) {}

    fn on_command(&mut self, _command: &str) {}

    fn on_batch_end(&mut self) -> Result<()> {
        Err(SinkError::IoError(io::Error::other("sink unavailable")))
    }
}

/// Non-zero batch size from a literal
///
/// # Panics
/// Panics if `n` is zero.
#[must_use]
pub fn size(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).expect("batch size must be non-zero")
}

/// Run `lines` through a processor of size `n` and return the closed batches
#[must_use]
pub fn batches_for(n: usize, lines: &[&str]) -> Vec<Vec<String>> {
    let clock = ManualClock::from_micros(0, TimeDelta::microseconds(1));
    let mut sink = RecordingSink::new();
    let mut processor = BatchProcessor::with_clock(size(n), &clock);
    processor.subscribe(&mut sink);
    for line in lines {
        processor.on_line(line);
    }
    processor.terminate();
    sink.batches()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink_groups_batches() {
        let mut sink = RecordingSink::new();
        let at = DateTime::<Utc>::default();

        sink.on_batch_start(at);
        sink.on_command("a");
        sink.on_batch_end().unwrap();
        sink.on_batch_start(at);
        sink.on_command("b");

        assert_eq!(sink.batches(), vec![vec!["a".to_string()]]);
        assert_eq!(sink.starts(), 2);
        assert_eq!(sink.ends(), 1);
    }

    #[test]
    fn test_failing_sink_errors() {
        let mut sink = FailingSink;
        assert!(sink.on_batch_end().is_err());
    }

    #[test]
    fn test_batches_for_empty_input() {
        assert!(batches_for(3, &[]).is_empty());
    }
}
