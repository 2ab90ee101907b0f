//! Console sink

use std::io::{self, Write};

use chrono::{DateTime, Utc};

use super::{Result, Sink};
use crate::batch::format_bulk;

/// Writes one `bulk: ...` line per non-empty batch
///
/// Defaults to stdout; any `Write` works, which is how tests capture output.
///
/// # Examples
///
/// ```
/// use bulk::{ConsoleSink, Sink};
/// use chrono::Utc;
///
/// let mut sink = ConsoleSink::with_writer(Vec::new());
/// sink.on_batch_start(Utc::now());
/// sink.on_command("cmd1");
/// sink.on_command("cmd2");
/// sink.on_batch_end().unwrap();
///
/// assert_eq!(sink.into_inner(), b"bulk: cmd1, cmd2\n");
/// ```
#[derive(Debug)]
pub struct ConsoleSink<W: Write = io::Stdout> {
    writer: W,
    commands: Vec<String>,
}

impl ConsoleSink {
    /// Create a console sink writing to stdout
    #[must_use]
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> ConsoleSink<W> {
    /// Create a console sink writing to `writer`
    pub const fn with_writer(writer: W) -> Self {
        Self {
            writer,
            commands: Vec::new(),
        }
    }

    /// Borrow the underlying writer
    pub const fn writer(&self) -> &W {
        &self.writer
    }

    /// Consume the sink and return the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Sink for ConsoleSink<W> {
    fn name(&self) -> &str {
        "console"
    }

    fn on_batch_start(&mut self, _started_at: DateTime<Utc>) {
        self.commands.clear();
    }

    fn on_command(&mut self, command: &str) {
        self.commands.push(command.to_string());
    }

    fn on_batch_end(&mut self) -> Result<()> {
        if self.commands.is_empty() {
            return Ok(());
        }
        let line = format_bulk(&self.commands);
        self.commands.clear();
        writeln!(self.writer, "{line}")?;
        self.writer.flush()?;
        Ok(())
    }
}
