//! Transition history tracking.
//!
//! Keeps an immutable, bounded log of the transitions a store has gone
//! through. Recording returns a new history, the old one is left as is.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single transition.
///
/// # Example
///
/// ```rust
/// use transys::core::StateTransition;
/// use chrono::Utc;
///
/// let transition = StateTransition {
///     from: "OFF".to_string(),
///     to: "ON".to_string(),
///     timestamp: Utc::now(),
///     rules_fired: 1,
/// };
/// assert!(transition.changed_state());
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<S: State> {
    /// The token before the dispatch
    pub from: S,
    /// The token after the dispatch
    pub to: S,
    /// When the transition occurred
    pub timestamp: DateTime<Utc>,
    /// How many rules of the table fired for the dispatch
    pub rules_fired: usize,
}

impl<S: State> StateTransition<S> {
    /// False for a re-entry into the same state.
    pub fn changed_state(&self) -> bool {
        self.from != self.to
    }
}

/// Ordered history of transitions, capped at `limit` entries.
///
/// When the cap is reached the oldest entry is dropped.
///
/// # Example
///
/// ```rust
/// use transys::core::{StateHistory, StateTransition};
/// use chrono::Utc;
///
/// let history = StateHistory::new(2);
/// let step = |from: &str, to: &str| StateTransition {
///     from: from.to_string(),
///     to: to.to_string(),
///     timestamp: Utc::now(),
///     rules_fired: 1,
/// };
///
/// let history = history
///     .record(step("A", "B"))
///     .record(step("B", "C"))
///     .record(step("C", "A"));
///
/// assert_eq!(history.transitions().len(), 2);
/// let path = history.get_path();
/// assert_eq!(path, vec!["B", "C", "A"]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State> {
    transitions: Vec<StateTransition<S>>,
    limit: usize,
}

impl<S: State> StateHistory<S> {
    /// Create an empty history keeping at most `limit` transitions.
    /// A limit of zero disables recording.
    pub fn new(limit: usize) -> Self {
        Self {
            transitions: Vec::new(),
            limit,
        }
    }

    /// Record a transition, returning a new history.
    pub fn record(&self, transition: StateTransition<S>) -> Self {
        if self.limit == 0 {
            return self.clone();
        }
        let skip = (self.transitions.len() + 1).saturating_sub(self.limit);
        let mut transitions: Vec<_> = self.transitions.iter().skip(skip).cloned().collect();
        transitions.push(transition);
        Self {
            transitions,
            limit: self.limit,
        }
    }

    /// Get the path of states traversed: the `from` of the oldest kept
    /// transition, then the `to` of each transition.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.first() {
            path.push(&first.from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Time between the first and last kept transition.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.first(), self.transitions.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    pub fn transitions(&self) -> &[StateTransition<S>] {
        &self.transitions
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}
