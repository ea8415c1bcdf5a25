//! Engine configuration.
//!
//! Configuration only affects how the blocking and timed wrappers wait
//! between evaluation passes and whether committed transitions are kept.
//! It never changes which transition fires.

use serde::{Deserialize, Serialize};
use std::thread;
use std::time::Duration;

/// Committed transitions kept by default before the oldest are dropped.
pub const DEFAULT_HISTORY_LIMIT: usize = 1024;

/// How the polling wrappers wait between evaluation passes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PollStrategy {
    /// Hint the scheduler to run other ready threads, then retry at once.
    #[default]
    Yield,

    /// Sleep for a bounded interval between passes.
    ///
    /// Useful where tight yield loops are penalized. Adds latency of up to
    /// one interval after a guard flips but never changes the outcome.
    Sleep(Duration),
}

impl PollStrategy {
    /// Wait once according to the strategy.
    pub fn pause(&self) {
        match self {
            PollStrategy::Yield => thread::yield_now(),
            PollStrategy::Sleep(interval) => thread::sleep(*interval),
        }
    }
}

/// Settings applied to an [`Fsm`](crate::engine::Fsm).
///
/// # Example
///
/// ```rust
/// use gatefsm::config::{FsmConfig, PollStrategy};
/// use std::time::Duration;
///
/// let config = FsmConfig::from_json(r#"{ "poll": { "sleep": { "secs": 0, "nanos": 250000 } } }"#)
///     .unwrap();
///
/// assert_eq!(config.poll, PollStrategy::Sleep(Duration::from_micros(250)));
/// assert!(config.record_history);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FsmConfig {
    /// Wait behavior of `trigger` and the timed variants
    pub poll: PollStrategy,
    /// Keep a [`StateHistory`](crate::core::StateHistory) of committed transitions
    pub record_history: bool,
    /// Most transitions kept in history; older ones are dropped first.
    /// `null` in JSON keeps everything.
    pub history_limit: Option<usize>,
}

impl Default for FsmConfig {
    fn default() -> Self {
        Self {
            poll: PollStrategy::Yield,
            record_history: true,
            history_limit: Some(DEFAULT_HISTORY_LIMIT),
        }
    }
}

impl FsmConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Replace the poll strategy.
    pub fn with_poll(mut self, poll: PollStrategy) -> Self {
        self.poll = poll;
        self
    }

    /// Turn history recording on or off.
    pub fn with_history(mut self, record_history: bool) -> Self {
        self.record_history = record_history;
        self
    }

    /// Bound the history length, `None` for unbounded.
    pub fn with_history_limit(mut self, limit: Option<usize>) -> Self {
        self.history_limit = limit;
        self
    }
}
