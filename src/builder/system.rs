//! Builder for whole transition systems.

use crate::compiler::{compile, TransitionReducer, TransitionRule};
use crate::core::{InitialRecord, State};
use crate::error::ConfigError;
use crate::store::TransitionStore;

/// Collects states, rules and the initial record, then compiles them.
///
/// Validation happens in [`build`](Self::build), with the same errors as
/// [`compile`](crate::compile).
pub struct TransitionSystemBuilder<S: State, P, D = ()> {
    states: Vec<S>,
    rules: Vec<TransitionRule<S, P, D>>,
    initial: InitialRecord<S, P>,
}

impl<S: State, P, D> TransitionSystemBuilder<S, P, D> {
    /// Start with `payload` as the initial payload and no initial state.
    pub fn new(payload: P) -> Self {
        Self {
            states: Vec::new(),
            rules: Vec::new(),
            initial: InitialRecord::unset(payload),
        }
    }

    pub fn state(mut self, state: S) -> Self {
        self.states.push(state);
        self
    }

    pub fn states(mut self, states: impl IntoIterator<Item = S>) -> Self {
        self.states.extend(states);
        self
    }

    /// Set the initial state (required).
    pub fn initial(mut self, state: S) -> Self {
        self.initial.system_state = Some(state);
        self
    }

    /// Append a rule. Rules run in the order they were added.
    pub fn rule(mut self, rule: TransitionRule<S, P, D>) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(mut self, rules: impl IntoIterator<Item = TransitionRule<S, P, D>>) -> Self {
        self.rules.extend(rules);
        self
    }

    pub fn build(self) -> Result<TransitionReducer<S, P, D>, ConfigError> {
        compile(self.states, self.rules, self.initial)
    }
}

impl<S: State, P: Clone, D> TransitionSystemBuilder<S, P, D> {
    /// Build and install the reducer into a fresh [`TransitionStore`].
    pub fn into_store(self) -> Result<TransitionStore<S, P, D>, ConfigError> {
        self.build().map(TransitionStore::new)
    }
}

impl<S: State, P: Default, D> Default for TransitionSystemBuilder<S, P, D> {
    fn default() -> Self {
        Self::new(P::default())
    }
}
