//! Clocks used to judge deadlines in the timed trigger.
//!
//! Sampling a clock may fail. When it does, the timed trigger gives up
//! instead of spinning without any notion of elapsed time.

use chrono::{DateTime, Utc};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Source of "now" for deadline comparisons.
pub trait Clock {
    /// Point in time comparable against a deadline.
    type Instant: PartialOrd;

    /// Sample the current time, or `None` if the clock is unavailable.
    fn now(&self) -> Option<Self::Instant>;

    /// True once `deadline` has been reached. `None` if the clock failed.
    fn reached(&self, deadline: &Self::Instant) -> Option<bool> {
        self.now().map(|now| now >= *deadline)
    }
}

/// Monotonic clock backed by [`std::time::Instant`]. Never fails.
#[derive(Clone, Copy, Debug, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    type Instant = Instant;

    fn now(&self) -> Option<Instant> {
        Some(Instant::now())
    }
}

/// Wall clock with UTC timestamps.
///
/// Unavailable when the system clock reads earlier than the Unix epoch.
/// Deadlines may fire early or late if the clock is adjusted while waiting.
#[derive(Clone, Copy, Debug, Default)]
pub struct WallClock;

impl Clock for WallClock {
    type Instant = DateTime<Utc>;

    fn now(&self) -> Option<DateTime<Utc>> {
        let since_epoch = SystemTime::now().duration_since(UNIX_EPOCH).ok()?;
        let secs = i64::try_from(since_epoch.as_secs()).ok()?;
        DateTime::from_timestamp(secs, since_epoch.subsec_nanos())
    }
}
