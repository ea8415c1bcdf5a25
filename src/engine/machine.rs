//! Transition graph and the single-pass trigger algorithm.

use crate::builder::RegistrationError;
use crate::config::FsmConfig;
use crate::core::{EdgeCount, Guard, StateHistory, StateId, StateTransition};
use crate::engine::error::TriggerError;
use crate::engine::step::Step;
use chrono::Utc;
use std::collections::HashMap;
use tracing::{debug, trace, warn};

/// Outbound rule of a state: the successor and the guard gating it.
struct Rule<S> {
    next: S,
    guard: Guard,
}

/// Deterministic finite-state machine driven by guard polling.
///
/// Rules are registered during setup, the initial state is set once setup
/// is complete, and the machine is then advanced by repeatedly evaluating
/// the guards leaving the current state. At most one transition is
/// committed per pass.
///
/// The machine has no internal synchronization. Every mutation goes through
/// `&mut self`, so sharing one instance across threads needs an external lock.
///
/// # Example
///
/// ```rust
/// use gatefsm::engine::{Fsm, Step};
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
///
/// let started = Arc::new(AtomicBool::new(false));
/// let flag = Arc::clone(&started);
///
/// let mut fsm = Fsm::new();
/// assert!(fsm.register_transition("idle", "running", move || flag.load(Ordering::SeqCst)));
/// assert!(fsm.register_transition("running", "done", || true));
/// fsm.set_state("idle");
///
/// assert_eq!(fsm.try_trigger().unwrap(), Step::Unchanged);
///
/// started.store(true, Ordering::SeqCst);
/// assert_eq!(
///     fsm.try_trigger().unwrap(),
///     Step::Changed { from: "idle", to: "running" }
/// );
/// assert!(fsm.is_terminated_state(&"done"));
/// ```
pub struct Fsm<S: StateId> {
    table: HashMap<S, Vec<Rule<S>>>,
    edges: HashMap<S, EdgeCount>,
    current: Option<S>,
    config: FsmConfig,
    history: StateHistory<S>,
    /// Completed passes since the last committed transition
    attempts: usize,
}

impl<S: StateId> Default for Fsm<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: StateId> Fsm<S> {
    /// Create an empty machine with the default configuration.
    pub fn new() -> Self {
        Self::with_config(FsmConfig::default())
    }

    /// Create an empty machine with the given configuration.
    pub fn with_config(config: FsmConfig) -> Self {
        Self {
            table: HashMap::new(),
            edges: HashMap::new(),
            current: None,
            config,
            history: StateHistory::new(),
            attempts: 0,
        }
    }

    /// Configuration the machine was created with.
    pub fn config(&self) -> &FsmConfig {
        &self.config
    }

    /// Register a guarded transition from `pred` to `next`.
    ///
    /// Returns `false` without touching the graph if `pred == next` or the
    /// pair is already registered. See [`add_transition`](Self::add_transition)
    /// for the reason of a rejection.
    pub fn register_transition<F>(&mut self, pred: S, next: S, guard: F) -> bool
    where
        F: Fn() -> bool + Send + 'static,
    {
        self.add_transition(pred, next, guard).is_ok()
    }

    /// Register a guarded transition, reporting why it was rejected.
    ///
    /// Guards of the same predecessor are evaluated in registration order.
    pub fn add_transition<F>(&mut self, pred: S, next: S, guard: F) -> Result<(), RegistrationError<S>>
    where
        F: Fn() -> bool + Send + 'static,
    {
        self.insert_rule(pred, next, Guard::new(guard))
    }

    pub(crate) fn insert_rule(
        &mut self,
        pred: S,
        next: S,
        guard: Guard,
    ) -> Result<(), RegistrationError<S>> {
        if pred == next {
            trace!(state = ?pred, "rejected self-loop transition");
            return Err(RegistrationError::SelfLoop { state: pred });
        }

        let rules = self.table.entry(pred.clone()).or_default();
        if rules.iter().any(|rule| rule.next == next) {
            trace!(from = ?pred, to = ?next, "rejected duplicate transition");
            return Err(RegistrationError::Duplicate {
                from: pred,
                to: next,
            });
        }

        debug!(from = ?pred, to = ?next, "registered transition");
        rules.push(Rule {
            next: next.clone(),
            guard,
        });
        self.edges.entry(pred).or_default().outbound += 1;
        self.edges.entry(next).or_default().inbound += 1;
        Ok(())
    }

    /// Current state, or `None` before [`set_state`](Self::set_state).
    pub fn state(&self) -> Option<&S> {
        self.current.as_ref()
    }

    /// Set the current state.
    ///
    /// Call only after every transition has been registered. The state is
    /// not validated here; an unknown state surfaces as
    /// [`TriggerError::InvalidState`] on the next pass.
    pub fn set_state(&mut self, state: S) {
        debug!(state = ?state, "state set");
        self.current = Some(state);
        self.attempts = 0;
    }

    /// True iff `state` has been registered and nothing leaves it.
    ///
    /// A state that never appeared in any registration is unknown, not
    /// terminal, and yields `false`.
    pub fn is_terminated_state(&self, state: &S) -> bool {
        self.edges.get(state).is_some_and(EdgeCount::is_terminal)
    }

    /// Inbound and outbound counts for `state`, if it has been registered.
    pub fn edge_count(&self, state: &S) -> Option<EdgeCount> {
        self.edges.get(state).copied()
    }

    /// Successors of `state` in evaluation order.
    pub fn successors(&self, state: &S) -> impl Iterator<Item = &S> + '_ {
        self.table
            .get(state)
            .into_iter()
            .flat_map(|rules| rules.iter().map(|rule| &rule.next))
    }

    /// Every state that appears in the graph, in no particular order.
    pub fn states(&self) -> impl Iterator<Item = &S> + '_ {
        self.edges.keys()
    }

    /// Number of accepted transitions.
    pub fn transition_count(&self) -> usize {
        self.table.values().map(Vec::len).sum()
    }

    /// Committed transitions, oldest first.
    pub fn history(&self) -> &StateHistory<S> {
        &self.history
    }

    /// Replace position and history wholesale, trimming history to the
    /// configured limit.
    pub(crate) fn resume(&mut self, state: Option<S>, history: StateHistory<S>) {
        self.current = state;
        self.attempts = 0;
        self.history = history;
        self.trim_history();
    }

    fn trim_history(&mut self) {
        if let Some(limit) = self.config.history_limit {
            self.history.retain_last(limit);
        }
    }

    /// Run one evaluation pass over the guards leaving the current state.
    ///
    /// - Terminal current state: `Step::Terminal`, nothing changes.
    /// - Current state unknown to the graph: `TriggerError::InvalidState`.
    /// - Two guards pass: `TriggerError::AmbiguousState`, raised as soon as
    ///   the second one is seen. Later guards are not evaluated.
    /// - One guard passes: the transition is committed, `Step::Changed`.
    /// - No guard passes: `Step::Unchanged`.
    pub fn try_trigger(&mut self) -> Result<Step<S>, TriggerError<S>> {
        let Some(current) = self.current.as_ref() else {
            warn!("trigger attempted before any state was set");
            return Err(TriggerError::InvalidState { state: None });
        };

        if self.is_terminated_state(current) {
            trace!(state = ?current, "terminal state, nothing to evaluate");
            return Ok(Step::Terminal(current.clone()));
        }

        let Some(rules) = self.table.get(current) else {
            warn!(state = ?current, "current state is not part of the graph");
            return Err(TriggerError::InvalidState {
                state: Some(current.clone()),
            });
        };

        let mut matched: Option<&S> = None;
        for rule in rules {
            if !rule.guard.check() {
                continue;
            }
            if let Some(first) = matched {
                warn!(state = ?current, first = ?first, second = ?rule.next, "ambiguous transition");
                return Err(TriggerError::AmbiguousState {
                    state: current.clone(),
                    first: first.clone(),
                    second: rule.next.clone(),
                });
            }
            matched = Some(&rule.next);
        }

        let from = current.clone();
        let next = matched.cloned();
        self.attempts += 1;

        let Some(to) = next else {
            trace!(state = ?from, attempts = self.attempts, "no guard passed");
            return Ok(Step::Unchanged);
        };

        let attempt = std::mem::take(&mut self.attempts);
        debug!(from = ?from, to = ?to, attempt, "transition committed");
        if self.config.record_history {
            self.history.record(StateTransition {
                from: from.clone(),
                to: to.clone(),
                timestamp: Utc::now(),
                attempt,
            });
            self.trim_history();
        }
        self.current = Some(to.clone());

        Ok(Step::Changed { from, to })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    crate::state_enum! {
        enum Phase {
            Idle,
            Running,
            Done,
        }
    }

    fn flag(initial: bool) -> (Arc<AtomicBool>, impl Fn() -> bool + Send + 'static) {
        let flag = Arc::new(AtomicBool::new(initial));
        let seen = Arc::clone(&flag);
        (flag, move || seen.load(Ordering::SeqCst))
    }

    fn counted(result: bool) -> (Arc<AtomicUsize>, impl Fn() -> bool + Send + 'static) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        (calls, move || {
            counter.fetch_add(1, Ordering::SeqCst);
            result
        })
    }

    fn idle_running_done() -> (Fsm<Phase>, Arc<AtomicBool>, Arc<AtomicBool>) {
        let (g1, start) = flag(false);
        let (g2, finish) = flag(false);
        let mut fsm = Fsm::new();
        assert!(fsm.register_transition(Phase::Idle, Phase::Running, start));
        assert!(fsm.register_transition(Phase::Running, Phase::Done, finish));
        fsm.set_state(Phase::Idle);
        (fsm, g1, g2)
    }

    #[test]
    fn self_loop_is_rejected_without_mutation() {
        let mut fsm: Fsm<Phase> = Fsm::new();

        assert!(!fsm.register_transition(Phase::Idle, Phase::Idle, || true));
        assert_eq!(fsm.edge_count(&Phase::Idle), None);
        assert_eq!(fsm.transition_count(), 0);
        assert!(matches!(
            fsm.add_transition(Phase::Idle, Phase::Idle, || true),
            Err(RegistrationError::SelfLoop { state: Phase::Idle })
        ));
    }

    #[test]
    fn duplicate_pair_is_rejected_and_counted_once() {
        let mut fsm = Fsm::new();

        assert!(fsm.register_transition(Phase::Idle, Phase::Running, || false));
        assert!(!fsm.register_transition(Phase::Idle, Phase::Running, || true));

        assert_eq!(
            fsm.edge_count(&Phase::Idle),
            Some(EdgeCount {
                inbound: 0,
                outbound: 1
            })
        );
        assert_eq!(
            fsm.edge_count(&Phase::Running),
            Some(EdgeCount {
                inbound: 1,
                outbound: 0
            })
        );
        assert_eq!(fsm.transition_count(), 1);
    }

    #[test]
    fn duplicate_reports_pair() {
        let mut fsm = Fsm::new();
        fsm.add_transition(1u8, 2, || true).unwrap();

        assert!(matches!(
            fsm.add_transition(1u8, 2, || true),
            Err(RegistrationError::Duplicate { from: 1, to: 2 })
        ));
    }

    #[test]
    fn counters_track_every_edge() {
        let mut fsm = Fsm::new();
        fsm.register_transition('a', 'b', || false);
        fsm.register_transition('a', 'c', || false);
        fsm.register_transition('b', 'c', || false);

        assert_eq!(fsm.edge_count(&'a').map(|e| e.outbound), Some(2));
        assert_eq!(fsm.edge_count(&'c').map(|e| e.inbound), Some(2));
        assert_eq!(fsm.states().count(), 3);
        assert_eq!(fsm.successors(&'a').collect::<Vec<_>>(), vec![&'b', &'c']);
        assert_eq!(fsm.successors(&'z').count(), 0);
    }

    #[test]
    fn terminal_classification() {
        let (fsm, _, _) = idle_running_done();

        assert!(fsm.is_terminated_state(&Phase::Done));
        assert!(!fsm.is_terminated_state(&Phase::Idle));
        assert!(!fsm.is_terminated_state(&Phase::Running));
    }

    #[test]
    fn unknown_state_is_not_terminal() {
        let mut fsm = Fsm::new();
        fsm.register_transition(1u32, 2, || true);

        assert!(!fsm.is_terminated_state(&99));
    }

    #[test]
    fn all_false_guards_leave_state_unchanged() {
        let (mut fsm, _, _) = idle_running_done();

        assert_eq!(fsm.try_trigger().unwrap(), Step::Unchanged);
        assert_eq!(fsm.state(), Some(&Phase::Idle));
        assert!(fsm.history().is_empty());
    }

    #[test]
    fn single_true_guard_commits() {
        let (mut fsm, g1, _) = idle_running_done();
        g1.store(true, Ordering::SeqCst);

        assert_eq!(
            fsm.try_trigger().unwrap(),
            Step::Changed {
                from: Phase::Idle,
                to: Phase::Running
            }
        );
        assert_eq!(fsm.state(), Some(&Phase::Running));
    }

    #[test]
    fn one_transition_per_pass() {
        let (mut fsm, g1, g2) = idle_running_done();
        g1.store(true, Ordering::SeqCst);
        g2.store(true, Ordering::SeqCst);

        fsm.try_trigger().unwrap();
        assert_eq!(fsm.state(), Some(&Phase::Running));

        fsm.try_trigger().unwrap();
        assert_eq!(fsm.state(), Some(&Phase::Done));
    }

    #[test]
    fn two_true_guards_are_ambiguous() {
        let mut fsm = Fsm::new();
        fsm.register_transition('A', 'B', || true);
        fsm.register_transition('A', 'C', || true);
        fsm.set_state('A');

        assert_eq!(
            fsm.try_trigger(),
            Err(TriggerError::AmbiguousState {
                state: 'A',
                first: 'B',
                second: 'C'
            })
        );
        assert_eq!(fsm.state(), Some(&'A'));
    }

    #[test]
    fn ambiguity_stops_the_scan() {
        let (first_calls, first) = counted(true);
        let (second_calls, second) = counted(true);
        let (third_calls, third) = counted(true);

        let mut fsm = Fsm::new();
        fsm.register_transition(0u8, 1, first);
        fsm.register_transition(0u8, 2, second);
        fsm.register_transition(0u8, 3, third);
        fsm.set_state(0);

        assert!(fsm.try_trigger().is_err());
        assert_eq!(first_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second_calls.load(Ordering::SeqCst), 1);
        assert_eq!(third_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn guards_are_evaluated_in_registration_order() {
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut fsm = Fsm::new();
        for next in [3u8, 1, 2] {
            let order = Arc::clone(&order);
            fsm.register_transition(0u8, next, move || {
                order.lock().unwrap().push(next);
                false
            });
        }
        fsm.set_state(0);

        fsm.try_trigger().unwrap();
        assert_eq!(*order.lock().unwrap(), vec![3, 1, 2]);
    }

    #[test]
    fn terminal_state_fires_without_evaluating() {
        let (calls, guard) = counted(true);
        let mut fsm = Fsm::new();
        fsm.register_transition(Phase::Running, Phase::Done, guard);
        fsm.set_state(Phase::Done);

        assert_eq!(fsm.try_trigger().unwrap(), Step::Terminal(Phase::Done));
        assert_eq!(fsm.state(), Some(&Phase::Done));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(fsm.history().is_empty());
    }

    #[test]
    fn unregistered_state_is_invalid() {
        let mut fsm = Fsm::new();
        fsm.register_transition(Phase::Idle, Phase::Running, || true);
        fsm.set_state(Phase::Done);

        assert_eq!(
            fsm.try_trigger(),
            Err(TriggerError::InvalidState {
                state: Some(Phase::Done)
            })
        );
    }

    #[test]
    fn unset_state_is_invalid() {
        let mut fsm: Fsm<Phase> = Fsm::new();
        fsm.register_transition(Phase::Idle, Phase::Running, || true);

        assert_eq!(
            fsm.try_trigger(),
            Err(TriggerError::InvalidState { state: None })
        );
    }

    #[test]
    fn history_records_attempts_per_transition() {
        let (mut fsm, g1, g2) = idle_running_done();

        fsm.try_trigger().unwrap();
        fsm.try_trigger().unwrap();
        g1.store(true, Ordering::SeqCst);
        fsm.try_trigger().unwrap();

        g2.store(true, Ordering::SeqCst);
        fsm.try_trigger().unwrap();

        let attempts: Vec<usize> = fsm.history().transitions().iter().map(|t| t.attempt).collect();
        assert_eq!(attempts, vec![3, 1]);
        assert_eq!(
            fsm.history().get_path(),
            vec![&Phase::Idle, &Phase::Running, &Phase::Done]
        );
    }

    #[test]
    fn history_can_be_disabled() {
        let mut fsm = Fsm::with_config(FsmConfig::default().with_history(false));
        fsm.register_transition('a', 'b', || true);
        fsm.set_state('a');

        fsm.try_trigger().unwrap();
        assert_eq!(fsm.state(), Some(&'b'));
        assert!(fsm.history().is_empty());
    }

    #[test]
    fn history_is_bounded_on_cyclic_graphs() {
        let mut fsm = Fsm::with_config(FsmConfig::default().with_history_limit(Some(4)));
        fsm.register_transition(0u8, 1, || true);
        fsm.register_transition(1u8, 0, || true);
        fsm.set_state(0);

        for _ in 0..1_000 {
            fsm.try_trigger().unwrap();
        }

        assert_eq!(fsm.history().len(), 4);
        assert_eq!(fsm.history().get_path(), vec![&0, &1, &0, &1, &0]);
    }

    #[test]
    fn default_history_limit_applies() {
        let mut fsm = Fsm::new();
        fsm.register_transition('x', 'y', || true);
        fsm.register_transition('y', 'x', || true);
        fsm.set_state('x');

        for _ in 0..(crate::config::DEFAULT_HISTORY_LIMIT + 10) {
            fsm.try_trigger().unwrap();
        }

        assert_eq!(fsm.history().len(), crate::config::DEFAULT_HISTORY_LIMIT);
    }

    #[test]
    fn set_state_overwrites_current() {
        let (mut fsm, _, _) = idle_running_done();
        fsm.set_state(Phase::Running);

        assert_eq!(fsm.state(), Some(&Phase::Running));
    }
}
