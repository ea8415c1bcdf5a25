//! Core value types shared by the engine.
//!
//! This module contains the pieces the transition graph is made of:
//! - State identifiers via the `StateId` bound
//! - Guard predicates gating each transition
//! - Edge counters used for terminal classification
//! - History of committed transitions

mod edges;
mod guard;
mod history;
mod state;

pub use edges::EdgeCount;
pub use guard::Guard;
pub use history::{StateHistory, StateTransition};
pub use state::StateId;
