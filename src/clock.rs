//! Time sources for batch stamps
//!
//! Batches are stamped when their first command arrives, and the stamp names
//! the per-batch log file. The clock is injectable so tests can use a
//! deterministic sequence instead of wall-clock time.

use std::cell::Cell;

use chrono::{DateTime, TimeDelta, Utc};

/// Source of batch start stamps
pub trait Clock {
    /// Current instant
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Deterministic clock for tests
///
/// Every call to [`Clock::now`] returns the current instant and then advances
/// it by a fixed step.
///
/// # Examples
///
/// ```
/// use bulk::{Clock, ManualClock};
/// use chrono::TimeDelta;
///
/// let clock = ManualClock::from_micros(1_000, TimeDelta::microseconds(5));
/// assert_eq!(clock.now().timestamp_micros(), 1_000);
/// assert_eq!(clock.now().timestamp_micros(), 1_005);
/// ```
#[derive(Debug, Clone)]
pub struct ManualClock {
    current: Cell<DateTime<Utc>>,
    step: TimeDelta,
}

impl ManualClock {
    /// Create a clock starting at `start`, advancing by `step` per read
    #[must_use]
    pub const fn new(start: DateTime<Utc>, step: TimeDelta) -> Self {
        Self {
            current: Cell::new(start),
            step,
        }
    }

    /// Create a clock starting at `micros` since the Unix epoch
    ///
    /// Out-of-range values fall back to the epoch.
    #[must_use]
    pub fn from_micros(micros: i64, step: TimeDelta) -> Self {
        let start = DateTime::from_timestamp_micros(micros).unwrap_or_default();
        Self::new(start, step)
    }

    /// A clock that never moves
    #[must_use]
    pub fn frozen(at: DateTime<Utc>) -> Self {
        Self::new(at, TimeDelta::zero())
    }

    /// Move the clock to an explicit instant
    pub fn set(&self, at: DateTime<Utc>) {
        self.current.set(at);
    }

    /// Instant the next read will return
    #[must_use]
    pub fn peek(&self) -> DateTime<Utc> {
        self.current.get()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        let now = self.current.get();
        self.current.set(now + self.step);
        now
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}
