//! State transition history tracking.
//!
//! Every committed transition is appended here, so a caller that polls the
//! engine can still observe each individual step afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single committed transition.
///
/// # Example
///
/// ```rust
/// use gatefsm::core::StateTransition;
/// use chrono::Utc;
///
/// let transition = StateTransition {
///     from: "pending",
///     to: "running",
///     timestamp: Utc::now(),
///     attempt: 1,
/// };
/// assert_eq!(transition.attempt, 1);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateTransition<S> {
    /// The state being transitioned from
    pub from: S,
    /// The state being transitioned to
    pub to: S,
    /// When the transition was committed
    pub timestamp: DateTime<Utc>,
    /// Evaluation passes made from `from` up to and including the one that fired
    pub attempt: usize,
}

/// Ordered history of committed transitions.
///
/// # Example
///
/// ```rust
/// use gatefsm::core::{StateHistory, StateTransition};
/// use chrono::Utc;
///
/// let mut history = StateHistory::new();
///
/// history.record(StateTransition {
///     from: 'a',
///     to: 'b',
///     timestamp: Utc::now(),
///     attempt: 1,
/// });
/// history.record(StateTransition {
///     from: 'b',
///     to: 'c',
///     timestamp: Utc::now(),
///     attempt: 3,
/// });
///
/// assert_eq!(history.get_path(), vec![&'a', &'b', &'c']);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateHistory<S> {
    transitions: Vec<StateTransition<S>>,
}

impl<S> Default for StateHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> StateHistory<S> {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Append a transition.
    pub fn record(&mut self, transition: StateTransition<S>) {
        self.transitions.push(transition);
    }

    /// Get the path of states traversed.
    ///
    /// Returns the initial `from` state followed by the `to` state of each
    /// transition. Empty when nothing has been recorded.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.first() {
            path.push(&first.from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Elapsed time between the first and last recorded transition.
    ///
    /// Returns `None` when empty, or when the wall clock stepped backwards
    /// between the two records.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.transitions.first()?, self.transitions.last()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    /// All transitions in commit order.
    pub fn transitions(&self) -> &[StateTransition<S>] {
        &self.transitions
    }

    /// Most recent transition, if any.
    pub fn last(&self) -> Option<&StateTransition<S>> {
        self.transitions.last()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Keep only the `limit` most recent transitions.
    pub fn retain_last(&mut self, limit: usize) {
        let excess = self.transitions.len().saturating_sub(limit);
        if excess > 0 {
            self.transitions.drain(..excess);
        }
    }

    /// Drop every recorded transition.
    pub fn clear(&mut self) {
        self.transitions.clear();
    }
}
