//! Builder API for ergonomic machine construction.
//!
//! This module provides a fluent builder that validates every declared
//! transition at once, a macro for declaring state enums, and the
//! registration errors shared with [`Fsm`](crate::engine::Fsm).

pub mod error;
pub mod machine;
pub mod macros;

pub use error::{BuildError, RegistrationError};
pub use machine::FsmBuilder;
