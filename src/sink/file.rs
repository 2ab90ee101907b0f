//! File sink
//!
//! Each closed batch is written to its own file, `bulk<micros>.log`, where
//! `<micros>` is the batch start stamp in microseconds since the Unix epoch.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::debug;

use super::{Result, Sink, SinkError};
use crate::batch::format_bulk;

/// File name prefix for batch logs
pub const FILE_PREFIX: &str = "bulk";

/// File name extension for batch logs
pub const FILE_EXTENSION: &str = "log";

/// Writes one log file per non-empty batch
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
    pending: Option<PathBuf>,
    commands: Vec<String>,
    last_token: Option<i64>,
    written: Vec<PathBuf>,
}

impl FileSink {
    /// Create a file sink writing into `dir`
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            pending: None,
            commands: Vec::new(),
            last_token: None,
            written: Vec::new(),
        }
    }

    /// Files written so far, in batch order
    #[must_use]
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// File name for a batch token
    ///
    /// # Examples
    ///
    /// ```
    /// use bulk::FileSink;
    ///
    /// assert_eq!(FileSink::file_name(1_700_000_000_123_456), "bulk1700000000123456.log");
    /// ```
    #[must_use]
    pub fn file_name(token: i64) -> String {
        format!("{FILE_PREFIX}{token}.{FILE_EXTENSION}")
    }

    /// Next token for a batch stamp, strictly greater than the last one
    fn next_token(&mut self, started_at: DateTime<Utc>) -> i64 {
        let micros = started_at.timestamp_micros();
        let token = match self.last_token {
            Some(last) if micros <= last => last + 1,
            _ => micros,
        };
        self.last_token = Some(token);
        token
    }
}

impl Sink for FileSink {
    fn name(&self) -> &str {
        "file"
    }

    fn on_batch_start(&mut self, started_at: DateTime<Utc>) {
        let token = self.next_token(started_at);
        self.pending = Some(self.dir.join(Self::file_name(token)));
        self.commands.clear();
    }

    fn on_command(&mut self, command: &str) {
        self.commands.push(command.to_string());
    }

    fn on_batch_end(&mut self) -> Result<()> {
        let commands = std::mem::take(&mut self.commands);
        let Some(path) = self.pending.take() else {
            return Ok(());
        };
        if commands.is_empty() {
            return Ok(());
        }

        let line = format_bulk(&commands);
        fs::write(&path, format!("{line}\n")).map_err(|source| SinkError::WriteError {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), commands = commands.len(), "wrote batch log");
        self.written.push(path);
        Ok(())
    }
}
