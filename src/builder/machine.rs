//! Builder for constructing state machines.

use crate::builder::error::{BuildError, RegistrationError};
use crate::config::FsmConfig;
use crate::core::{Guard, StateId};
use crate::engine::Fsm;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use tracing::debug;

/// Builder for constructing a machine with a fluent API.
///
/// Unlike [`Fsm::register_transition`], which rejects declarations one at a
/// time, `build` checks every declaration and reports all rejections
/// together.
///
/// # Example
///
/// ```rust
/// use gatefsm::builder::FsmBuilder;
///
/// let fsm = FsmBuilder::new()
///     .initial("red")
///     .transition("red", "green", || true)
///     .transition("green", "yellow", || false)
///     .transition("yellow", "red", || false)
///     .build()
///     .unwrap();
///
/// assert_eq!(fsm.state(), Some(&"red"));
/// assert_eq!(fsm.transition_count(), 3);
/// ```
pub struct FsmBuilder<S: StateId> {
    initial: Option<S>,
    rules: Vec<(S, S, Guard)>,
    config: FsmConfig,
}

impl<S: StateId> FsmBuilder<S> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            initial: None,
            rules: Vec::new(),
            config: FsmConfig::default(),
        }
    }

    /// Set the initial state (required).
    pub fn initial(mut self, state: S) -> Self {
        self.initial = Some(state);
        self
    }

    /// Declare a transition gated by a closure.
    pub fn transition<F>(self, from: S, to: S, guard: F) -> Self
    where
        F: Fn() -> bool + Send + 'static,
    {
        self.guarded(from, to, Guard::new(guard))
    }

    /// Declare a transition gated by a prepared [`Guard`].
    pub fn guarded(mut self, from: S, to: S, guard: Guard) -> Self {
        self.rules.push((from, to, guard));
        self
    }

    /// Set the machine configuration (optional).
    pub fn config(mut self, config: FsmConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the machine.
    ///
    /// Registers every declared transition in order, collecting all
    /// rejections rather than stopping at the first. The initial state must
    /// be set and must appear in at least one accepted transition.
    pub fn build(self) -> Result<Fsm<S>, BuildError<S>> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;

        let mut fsm = Fsm::with_config(self.config);
        let checks: Vec<Validation<(), NonEmptyVec<RegistrationError<S>>>> = self
            .rules
            .into_iter()
            .map(|(from, to, guard)| match fsm.insert_rule(from, to, guard) {
                Ok(()) => Validation::success(()),
                Err(error) => Validation::fail(error),
            })
            .collect();

        if let Validation::Failure(errors) = Validation::all_vec(checks) {
            return Err(BuildError::Rejected(errors.iter().cloned().collect()));
        }

        if fsm.edge_count(&initial).is_none() {
            return Err(BuildError::UnknownInitialState(initial));
        }

        debug!(
            initial = ?initial,
            transitions = fsm.transition_count(),
            "state machine built"
        );
        fsm.set_state(initial);
        Ok(fsm)
    }
}

impl<S: StateId> Default for FsmBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}
