//! Wildcard guards over `from`/`to` state pairs.
//!
//! Transition rules and transition subscriptions share the same matching
//! semantics: an unset side matches anything, a set side must be equal.

use super::state::State;
use serde::{Deserialize, Serialize};

/// Optional `from` and `to` constraints on a transition.
///
/// # Example
///
/// ```rust
/// use transys::core::TransitionGuard;
///
/// let on = "ON".to_string();
/// let off = "OFF".to_string();
///
/// let into_on = TransitionGuard::any().to(on.clone());
/// assert!(into_on.matches(&off, &on));
/// assert!(into_on.matches(&on, &on));
/// assert!(!into_on.matches(&on, &off));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionGuard<S> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<S>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<S>,
}

impl<S> Default for TransitionGuard<S> {
    fn default() -> Self {
        Self::any()
    }
}

impl<S> TransitionGuard<S> {
    /// Guard that matches every transition.
    pub fn any() -> Self {
        Self {
            from: None,
            to: None,
        }
    }

    pub fn new(from: Option<S>, to: Option<S>) -> Self {
        Self { from, to }
    }

    pub fn from(mut self, state: S) -> Self {
        self.from = Some(state);
        self
    }

    pub fn to(mut self, state: S) -> Self {
        self.to = Some(state);
        self
    }
}

impl<S: State> TransitionGuard<S> {
    /// Check a `current -> target` pair against both sides of the guard.
    pub fn matches(&self, current: &S, target: &S) -> bool {
        side_matches(self.from.as_ref(), current) && side_matches(self.to.as_ref(), target)
    }

    pub fn is_wildcard(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }
}

fn side_matches<S: PartialEq>(expected: Option<&S>, actual: &S) -> bool {
    expected.is_none_or(|expected| expected == actual)
}
