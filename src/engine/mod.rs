//! The FSM engine.
//!
//! # Key Concepts
//!
//! - **Graph**: transitions registered with [`Fsm::register_transition`],
//!   counted per state to classify terminal states
//! - **Pass**: [`Fsm::try_trigger`] evaluates the current state's guards once
//!   and commits at most one transition
//! - **Polling**: [`Fsm::trigger`] and the timed variants repeat passes until
//!   one fires, a deadline elapses, or a structural error occurs

mod error;
mod machine;
mod step;
mod wait;

pub use error::TriggerError;
pub use machine::Fsm;
pub use step::Step;
