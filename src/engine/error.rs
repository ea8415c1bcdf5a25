//! Structural trigger errors.

use std::fmt::Debug;
use thiserror::Error;

/// Errors raised by an evaluation pass.
///
/// Both variants describe a defect in the declared graph or in how the
/// machine was initialized. The polling wrappers never retry them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TriggerError<S: Debug> {
    /// The current state has no outbound rules and is not terminal.
    /// `None` means no state was ever set.
    #[error("Invalid state {state:?}: not part of the transition graph")]
    InvalidState { state: Option<S> },

    /// Two guards leaving `state` passed in the same pass.
    #[error("Ambiguous state {state:?}: guards towards {first:?} and {second:?} both passed")]
    AmbiguousState { state: S, first: S, second: S },
}
