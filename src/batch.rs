//! Line classification and the in-progress batch
//!
//! A line is either a dynamic-block delimiter or an ordinary command. The
//! check is a substring search: any line containing `{` opens a block, and
//! any line containing `}` closes one, but only while a block is open.

use chrono::{DateTime, Utc};

use crate::clock::Clock;

/// Character that opens a dynamic block
pub const OPEN_DELIMITER: char = '{';

/// Character that closes a dynamic block
pub const CLOSE_DELIMITER: char = '}';

/// Classified input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// Opens a (possibly nested) dynamic block
    Open,
    /// Closes the innermost dynamic block
    Close,
    /// Ordinary command, taken verbatim
    Command(&'a str),
}

impl<'a> Line<'a> {
    /// Classify a line at the given nesting depth
    ///
    /// The opening delimiter is checked first, so a line holding both
    /// characters always opens. A `}` seen at depth 0 is an ordinary command.
    ///
    /// # Examples
    ///
    /// ```
    /// use bulk::Line;
    ///
    /// assert_eq!(Line::classify("{", 0), Line::Open);
    /// assert_eq!(Line::classify("}", 1), Line::Close);
    /// assert_eq!(Line::classify("}", 0), Line::Command("}"));
    /// ```
    #[must_use]
    pub fn classify(text: &'a str, depth: usize) -> Self {
        if text.contains(OPEN_DELIMITER) {
            Self::Open
        } else if depth > 0 && text.contains(CLOSE_DELIMITER) {
            Self::Close
        } else {
            Self::Command(text)
        }
    }
}

/// Commands accumulated since the last boundary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    commands: Vec<String>,
    started_at: Option<DateTime<Utc>>,
}

impl Batch {
    /// Create an empty batch
    #[must_use]
    pub const fn new() -> Self {
        Self {
            commands: Vec::new(),
            started_at: None,
        }
    }

    /// Append a command, stamping the batch if it was empty
    ///
    /// The clock is read only for the first command. Returns the new stamp
    /// when this command started the batch.
    pub fn push<C: Clock + ?Sized>(&mut self, command: &str, clock: &C) -> Option<DateTime<Utc>> {
        let started = if self.commands.is_empty() {
            let now = clock.now();
            self.started_at = Some(now);
            Some(now)
        } else {
            None
        };
        self.commands.push(command.to_string());
        started
    }

    /// Number of commands in the batch
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether the batch holds no commands
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Time the first command was inserted
    #[must_use]
    pub const fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Commands in insertion order
    #[must_use]
    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    /// Hand back the accumulated batch and reset to empty
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}

/// Render commands as a single `bulk: a, b, c` line (without newline)
///
/// # Examples
///
/// ```
/// use bulk::format_bulk;
///
/// assert_eq!(format_bulk(&["cmd1", "cmd2"]), "bulk: cmd1, cmd2");
/// ```
#[must_use]
pub fn format_bulk<S: AsRef<str>>(commands: &[S]) -> String {
    let joined = commands
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(", ");
    format!("bulk: {joined}")
}
