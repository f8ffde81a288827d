//! The compiled update function.

use crate::compiler::rule::TransitionRule;
use crate::core::{Event, State, SystemRecord};
use crate::store::Reducer;
use std::fmt;
use std::sync::Arc;
use tracing::{trace, warn};

/// Outcome of applying one event to a record.
#[derive(Clone, Debug, PartialEq)]
pub struct Reduction<S, P> {
    /// The record after every rule of the table had its turn
    pub record: SystemRecord<S, P>,
    /// Number of rules that fired; zero means the record was passed through
    pub fired: usize,
}

impl<S, P> Reduction<S, P> {
    /// True when at least one rule fired.
    pub fn transitioned(&self) -> bool {
        self.fired > 0
    }
}

struct Compiled<S: State, P, D> {
    states: Vec<S>,
    rules: Vec<TransitionRule<S, P, D>>,
    initial: SystemRecord<S, P>,
}

/// A compiled transition table.
///
/// Rules are chained: every rule sees the record produced by the rule before
/// it, so several rules may fire for a single event. The table is immutable
/// and shared, cloning a reducer is cheap.
///
/// Produced by [`compile`](crate::compile).
pub struct TransitionReducer<S: State, P, D = ()> {
    compiled: Arc<Compiled<S, P, D>>,
}

impl<S: State, P, D> TransitionReducer<S, P, D> {
    pub(crate) fn new(
        states: Vec<S>,
        rules: Vec<TransitionRule<S, P, D>>,
        initial: SystemRecord<S, P>,
    ) -> Self {
        Self {
            compiled: Arc::new(Compiled {
                states,
                rules,
                initial,
            }),
        }
    }

    /// The state set, in declaration order.
    pub fn states(&self) -> &[S] {
        &self.compiled.states
    }

    /// The transition table, in application order.
    pub fn rules(&self) -> &[TransitionRule<S, P, D>] {
        &self.compiled.rules
    }

    pub fn is_state(&self, token: &S) -> bool {
        self.compiled.states.contains(token)
    }

    /// Whether dispatching `target` while in `current` fires at least one rule.
    ///
    /// Only the first rule to fire is checked against `current`; rules after
    /// it see the state it produced. So one matching guard is enough.
    pub fn can_transition(&self, current: &S, target: &S) -> bool {
        self.is_state(target)
            && self
                .compiled
                .rules
                .iter()
                .any(|rule| rule.applies_to(current, target))
    }

    /// Run the table over `record` for `event` (pure).
    pub fn apply(&self, record: SystemRecord<S, P>, event: &Event<S, D>) -> Reduction<S, P> {
        if !self.is_state(&event.kind) {
            trace!(event = event.kind.name(), "event is not a state token, passing through");
            return Reduction { record, fired: 0 };
        }

        let mut fired = 0;
        let record = self
            .compiled
            .rules
            .iter()
            .enumerate()
            .fold(record, |record, (index, rule)| {
                if !rule.applies_to(&record.system_state, &event.kind) {
                    return record;
                }
                trace!(
                    rule = index,
                    from = record.system_state.name(),
                    to = event.kind.name(),
                    "rule fired"
                );
                fired += 1;
                self.settle(rule.fire(record, event), &event.kind, index)
            });

        Reduction { record, fired }
    }

    /// Keep `system_state` inside the state set after an action ran.
    fn settle(
        &self,
        record: SystemRecord<S, P>,
        requested: &S,
        index: usize,
    ) -> SystemRecord<S, P> {
        if self.is_state(&record.system_state) {
            return record;
        }
        warn!(
            rule = index,
            returned = record.system_state.name(),
            restored = requested.name(),
            "action returned a token outside the state set"
        );
        record.with_state(requested.clone())
    }
}

impl<S: State, P: Clone, D> TransitionReducer<S, P, D> {
    /// The validated initial record.
    pub fn initial_record(&self) -> SystemRecord<S, P> {
        self.compiled.initial.clone()
    }

    /// Apply an event to an optional record, starting from the initial record
    /// when there is none.
    pub fn reduce_record(
        &self,
        state: Option<SystemRecord<S, P>>,
        event: &Event<S, D>,
    ) -> SystemRecord<S, P> {
        let record = state.unwrap_or_else(|| self.initial_record());
        self.apply(record, event).record
    }

    /// Turn the reducer into a plain `(state, event) -> state` closure.
    pub fn into_fn(
        self,
    ) -> impl Fn(Option<SystemRecord<S, P>>, &Event<S, D>) -> SystemRecord<S, P> + Clone {
        move |state, event| self.reduce_record(state, event)
    }
}

impl<S: State, P: Clone, D> Reducer for TransitionReducer<S, P, D> {
    type State = SystemRecord<S, P>;
    type Event = Event<S, D>;

    fn initial_state(&self) -> Self::State {
        self.initial_record()
    }

    fn reduce(&self, state: Option<Self::State>, event: &Self::Event) -> Self::State {
        self.reduce_record(state, event)
    }
}

impl<S: State, P, D> Clone for TransitionReducer<S, P, D> {
    fn clone(&self) -> Self {
        Self {
            compiled: Arc::clone(&self.compiled),
        }
    }
}

impl<S: State, P, D> fmt::Debug for TransitionReducer<S, P, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionReducer")
            .field("states", &self.compiled.states)
            .field("rules", &self.compiled.rules)
            .field("initial", &self.compiled.initial.system_state)
            .finish()
    }
}
