//! State identifiers for the transition graph.
//!
//! The engine never inspects a state's structure. It only needs to clone,
//! compare, hash and print it, which is what `StateId` captures.

use std::fmt::Debug;
use std::hash::Hash;

/// Bound satisfied by every type usable as a state identifier.
///
/// # Required Traits
///
/// - `Clone`: states are handed back to the caller as old/new pairs
/// - `Eq` + `Hash`: states key the transition table and edge counters
/// - `Debug`: states appear in errors and log fields
///
/// There is a blanket implementation, so plain enums, integers and strings
/// qualify without any extra code.
///
/// # Example
///
/// ```rust
/// use gatefsm::core::StateId;
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// enum Door {
///     Open,
///     Closed,
/// }
///
/// fn takes_state<S: StateId>(_s: S) {}
///
/// takes_state(Door::Open);
/// takes_state(7u32);
/// takes_state("closed".to_string());
/// ```
pub trait StateId: Clone + Eq + Hash + Debug {}

impl<T> StateId for T where T: Clone + Eq + Hash + Debug {}
