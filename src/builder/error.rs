//! Errors for transition registration and machine building.

use std::fmt::Debug;
use thiserror::Error;

/// Reason a transition was not added to the graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError<S: Debug> {
    #[error("Transition from {state:?} to itself is not allowed")]
    SelfLoop { state: S },

    #[error("Transition from {from:?} to {to:?} is already registered")]
    Duplicate { from: S, to: S },
}

/// Errors that can occur when building a machine with [`FsmBuilder`](super::FsmBuilder).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError<S: Debug> {
    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("Initial state {0:?} does not appear in any transition")]
    UnknownInitialState(S),

    /// Every rejected transition, in declaration order.
    #[error("{} transition(s) rejected", .0.len())]
    Rejected(Vec<RegistrationError<S>>),
}
