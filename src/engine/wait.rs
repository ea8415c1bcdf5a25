//! Blocking and deadline-bounded wrappers around the single-pass trigger.
//!
//! Both wrappers poll: they re-run [`Fsm::try_trigger`] and pause between
//! passes according to the configured [`PollStrategy`](crate::config::PollStrategy).
//! Nothing wakes them when a guard flips. Structural errors end the wait
//! immediately.

use crate::core::StateId;
use crate::engine::error::TriggerError;
use crate::engine::machine::Fsm;
use crate::timing::{Clock, MonotonicClock, WallClock};
use chrono::{DateTime, Utc};
use std::time::Instant;
use tracing::{trace, warn};

impl<S: StateId> Fsm<S> {
    /// Poll until a pass fires, returning the old and new state.
    ///
    /// A terminal current state fires on the first pass with old == new.
    /// There is no way to cancel the wait other than the guards eventually
    /// passing; use [`timed_trigger`](Self::timed_trigger) for a bounded wait.
    pub fn trigger(&mut self) -> Result<(S, S), TriggerError<S>> {
        let mut passes = 0usize;
        loop {
            passes += 1;
            if let Some(states) = self.try_trigger()?.into_states() {
                trace!(passes, "blocking trigger fired");
                return Ok(states);
            }
            trace!(passes, "no transition yet, pausing");
            self.config().poll.pause();
        }
    }

    /// Poll until a pass fires or the monotonic `deadline` is reached.
    ///
    /// Returns `Ok(None)` on timeout.
    pub fn timed_trigger(&mut self, deadline: Instant) -> Result<Option<(S, S)>, TriggerError<S>> {
        self.timed_trigger_with(&MonotonicClock, deadline)
    }

    /// Poll until a pass fires or the wall-clock `deadline` is reached.
    ///
    /// Adjusting the system clock while waiting can make the deadline fire
    /// early or late.
    pub fn timed_trigger_until(
        &mut self,
        deadline: DateTime<Utc>,
    ) -> Result<Option<(S, S)>, TriggerError<S>> {
        self.timed_trigger_with(&WallClock, deadline)
    }

    /// Poll until a pass fires or `clock` reports `deadline` reached.
    ///
    /// One pass always runs before the clock is consulted. After that each
    /// round pauses, runs a pass, then samples the clock. If sampling fails
    /// the wait is abandoned with `Ok(None)`.
    pub fn timed_trigger_with<C: Clock>(
        &mut self,
        clock: &C,
        deadline: C::Instant,
    ) -> Result<Option<(S, S)>, TriggerError<S>> {
        if let Some(states) = self.try_trigger()?.into_states() {
            return Ok(Some(states));
        }

        loop {
            self.config().poll.pause();

            if let Some(states) = self.try_trigger()?.into_states() {
                return Ok(Some(states));
            }

            match clock.reached(&deadline) {
                Some(false) => continue,
                Some(true) => {
                    trace!(state = ?self.state(), "timed trigger deadline reached");
                    return Ok(None);
                }
                None => {
                    warn!("clock unavailable, abandoning timed trigger");
                    return Ok(None);
                }
            }
        }
    }
}
