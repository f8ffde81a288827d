//! Transition rules: a wildcard guard plus an optional record transform.

use crate::core::{Event, State, SystemRecord, TransitionGuard};
use std::fmt;
use std::sync::Arc;

/// Transform run when a rule fires.
///
/// Receives the record with `system_state` already moved to the event's
/// kind, and returns the record the next rule will see.
pub type RuleAction<S, P, D = ()> =
    Arc<dyn Fn(SystemRecord<S, P>, &Event<S, D>) -> SystemRecord<S, P> + Send + Sync>;

/// One entry of a transition table.
///
/// A rule fires for an event when the event's kind is a state token, the
/// current token matches `guard.from` and the event's kind matches
/// `guard.to`. Unset guard sides are wildcards.
///
/// # Example
///
/// ```rust
/// use transys::compiler::TransitionRule;
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Lamp { text: String }
///
/// let rule: TransitionRule<String, Lamp> = TransitionRule::any()
///     .from("ON".to_string())
///     .to("OFF".to_string())
///     .action(|record, _event| record.map_payload(|_| Lamp { text: "off".into() }));
///
/// assert!(rule.applies_to(&"ON".to_string(), &"OFF".to_string()));
/// assert!(!rule.applies_to(&"OFF".to_string(), &"OFF".to_string()));
/// ```
pub struct TransitionRule<S: State, P, D = ()> {
    pub guard: TransitionGuard<S>,
    pub action: Option<RuleAction<S, P, D>>,
}

impl<S: State, P, D> TransitionRule<S, P, D> {
    pub fn new(guard: TransitionGuard<S>) -> Self {
        Self {
            guard,
            action: None,
        }
    }

    /// A rule that fires for every state-token event.
    pub fn any() -> Self {
        Self::new(TransitionGuard::any())
    }

    pub fn from(mut self, state: S) -> Self {
        self.guard.from = Some(state);
        self
    }

    pub fn to(mut self, state: S) -> Self {
        self.guard.to = Some(state);
        self
    }

    pub fn action<F>(mut self, action: F) -> Self
    where
        F: Fn(SystemRecord<S, P>, &Event<S, D>) -> SystemRecord<S, P> + Send + Sync + 'static,
    {
        self.action = Some(Arc::new(action));
        self
    }

    /// Check the guard against a `current -> target` pair (pure).
    pub fn applies_to(&self, current: &S, target: &S) -> bool {
        self.guard.matches(current, target)
    }

    /// Move the record to the event's kind and run the action, if any.
    ///
    /// The caller has already checked that the rule applies.
    pub(crate) fn fire(
        &self,
        record: SystemRecord<S, P>,
        event: &Event<S, D>,
    ) -> SystemRecord<S, P> {
        let transitioned = record.with_state(event.kind.clone());
        match &self.action {
            Some(action) => action(transitioned, event),
            None => transitioned,
        }
    }
}

impl<S: State, P, D> Clone for TransitionRule<S, P, D> {
    fn clone(&self) -> Self {
        Self {
            guard: self.guard.clone(),
            action: self.action.clone(),
        }
    }
}

impl<S: State, P, D> fmt::Debug for TransitionRule<S, P, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionRule")
            .field("from", &self.guard.from)
            .field("to", &self.guard.to)
            .field("action", &self.action.as_ref().map(|_| "<fn>"))
            .finish()
    }
}
