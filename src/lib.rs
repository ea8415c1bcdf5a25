//! gatefsm: a deterministic finite-state machine driven by guard polling
//!
//! A caller declares a directed graph of states and guarded transitions,
//! sets an initial state, and then advances the machine by evaluating the
//! guards leaving the current state. Each pass commits at most one
//! transition, so every step stays observable. When two guards pass at once
//! the graph is ambiguous and the pass fails instead of picking one.
//!
//! # Core Concepts
//!
//! - **States**: any `Clone + Eq + Hash + Debug` type, see [`StateId`]
//! - **Guards**: zero-argument predicates over external state
//! - **Terminal states**: registered states with no outbound transitions
//! - **Polling**: blocking and deadline-bounded wrappers around a single pass
//!
//! The engine is not synchronized. Wrap an instance in a lock if more than
//! one thread drives it.
//!
//! # Example
//!
//! ```rust
//! use gatefsm::{Fsm, TriggerError};
//!
//! let mut fsm = Fsm::new();
//! fsm.register_transition('A', 'B', || true);
//! fsm.register_transition('A', 'C', || true);
//! fsm.set_state('A');
//!
//! assert!(matches!(
//!     fsm.try_trigger(),
//!     Err(TriggerError::AmbiguousState { .. })
//! ));
//! assert_eq!(fsm.state(), Some(&'A'));
//! ```

pub mod builder;
pub mod checkpoint;
pub mod config;
pub mod core;
pub mod engine;
pub mod timing;

// Re-export commonly used types
pub use builder::{BuildError, FsmBuilder, RegistrationError};
pub use config::{FsmConfig, PollStrategy};
pub use self::core::{EdgeCount, Guard, StateHistory, StateId, StateTransition};
pub use engine::{Fsm, Step, TriggerError};
