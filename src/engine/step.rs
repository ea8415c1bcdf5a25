//! Outcome of a single evaluation pass.

/// Result of one successful call to [`Fsm::try_trigger`](super::Fsm::try_trigger).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step<S> {
    /// Exactly one guard passed and the machine moved
    Changed { from: S, to: S },

    /// No guard passed; nothing to do yet
    Unchanged,

    /// The current state is terminal and the machine stays there
    Terminal(S),
}

impl<S: Clone> Step<S> {
    /// Whether the pass counts as a successful trigger.
    ///
    /// A terminal state succeeds trivially so that waiting callers are
    /// released instead of polling an absorbing state forever.
    pub fn fired(&self) -> bool {
        !matches!(self, Step::Unchanged)
    }

    /// Old and new state for a successful pass.
    pub fn states(&self) -> Option<(S, S)> {
        self.clone().into_states()
    }

    pub fn into_states(self) -> Option<(S, S)> {
        match self {
            Step::Changed { from, to } => Some((from, to)),
            Step::Terminal(state) => Some((state.clone(), state)),
            Step::Unchanged => None,
        }
    }
}
