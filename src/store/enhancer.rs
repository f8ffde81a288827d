//! Transition requests and transition subscriptions on top of a [`Store`].

use super::{Store, Subscription};
use crate::compiler::{Reduction, TransitionReducer};
use crate::core::{Event, State, StateHistory, StateTransition, SystemRecord, TransitionGuard};
use crate::error::TransitionError;
use chrono::Utc;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};
use uuid::Uuid;

/// Callback invoked after a matching transition.
pub type TransitionCallback<S> = Arc<dyn Fn(&StateTransition<S>) + Send + Sync>;

/// Identifies a transition subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionId(Uuid);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Settings for a [`TransitionStore`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionStoreConfig {
    /// Maximum number of transitions kept in the history. Zero disables it.
    pub history_limit: usize,
}

impl Default for TransitionStoreConfig {
    fn default() -> Self {
        Self { history_limit: 256 }
    }
}

struct TransitionSubscription<S: State> {
    id: SubscriptionId,
    guard: TransitionGuard<S>,
    callback: TransitionCallback<S>,
}

/// A store running a compiled transition table, with helpers to request
/// transitions and to observe them.
///
/// A transition happens when a dispatched event fires at least one rule. Its
/// `from`/`to` are the state tokens before and after the dispatch, so a rule
/// re-entering the current state still counts.
///
/// # Example
///
/// ```rust
/// use transys::compiler::{compile, TransitionRule};
/// use transys::core::{InitialRecord, TransitionGuard};
/// use transys::store::TransitionStore;
/// use std::sync::{Arc, Mutex};
///
/// let (on, off) = ("ON".to_string(), "OFF".to_string());
/// let reducer = compile(
///     [on.clone(), off.clone()],
///     [
///         TransitionRule::<String, (), ()>::any().from(off.clone()).to(on.clone()),
///         TransitionRule::any().from(on.clone()).to(off.clone()),
///     ],
///     InitialRecord::new(off.clone(), ()),
/// )
/// .unwrap();
/// let store = TransitionStore::new(reducer);
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&seen);
/// store.subscribe_to_transition(TransitionGuard::any().to(on.clone()), move |t| {
///     sink.lock().unwrap().push(t.from.clone());
/// });
///
/// store.transition_to(on.clone()).unwrap();
/// assert!(store.transition_from_to(off.clone(), on.clone()).is_err());
/// assert_eq!(*seen.lock().unwrap(), vec![off]);
/// ```
pub struct TransitionStore<S: State, P: Clone, D = ()> {
    store: Store<TransitionReducer<S, P, D>>,
    subscriptions: Mutex<Vec<TransitionSubscription<S>>>,
    history: Mutex<StateHistory<S>>,
}

/// Wrap an existing store, using the default [`TransitionStoreConfig`].
pub fn enhance<S: State, P: Clone, D>(
    store: Store<TransitionReducer<S, P, D>>,
) -> TransitionStore<S, P, D> {
    TransitionStore::from_store(store, TransitionStoreConfig::default())
}

impl<S: State, P: Clone, D> TransitionStore<S, P, D> {
    pub fn new(reducer: TransitionReducer<S, P, D>) -> Self {
        Self::with_config(reducer, TransitionStoreConfig::default())
    }

    pub fn with_config(
        reducer: TransitionReducer<S, P, D>,
        config: TransitionStoreConfig,
    ) -> Self {
        Self::from_store(Store::new(reducer), config)
    }

    /// Wrap `store`. A preloaded token outside the state set is replaced by
    /// the initial token, keeping the payload.
    pub fn from_store(
        store: Store<TransitionReducer<S, P, D>>,
        config: TransitionStoreConfig,
    ) -> Self {
        store.transact(|reducer, record| {
            if reducer.is_state(&record.system_state) {
                return (None, ());
            }
            let initial = reducer.initial_record().system_state;
            warn!(
                preloaded = record.system_state.name(),
                restored = initial.name(),
                "preloaded token is outside the state set"
            );
            (Some(record.clone().with_state(initial)), ())
        });

        Self {
            store,
            subscriptions: Mutex::new(Vec::new()),
            history: Mutex::new(StateHistory::new(config.history_limit)),
        }
    }

    pub fn reducer(&self) -> &TransitionReducer<S, P, D> {
        self.store.reducer()
    }

    pub fn get_state(&self) -> SystemRecord<S, P> {
        self.store.get_state()
    }

    /// The current state token.
    pub fn system_state(&self) -> S {
        self.store.get_state().system_state
    }

    /// Register a listener called after every committed update.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.store.subscribe(listener)
    }

    /// Dispatch an event through the transition table. Returns the new record.
    pub fn dispatch(&self, event: &Event<S, D>) -> SystemRecord<S, P> {
        let (record, transition) = self.store.transact(|reducer, current| {
            let from = current.system_state.clone();
            let reduction = reducer.apply(current.clone(), event);
            let transition = self.record(from, &reduction);
            (Some(reduction.record.clone()), (reduction.record, transition))
        });

        if let Some(transition) = transition {
            self.announce(&transition);
        }
        record
    }

    /// Move to `target` from whatever the current state is.
    ///
    /// Succeeds without dispatching when the store is already in `target` and
    /// no rule applies. Fails when `target` is not a state, when no rule
    /// leads there from the current state, or when the rules end up in a
    /// different state.
    pub fn transition_to(&self, target: S) -> Result<SystemRecord<S, P>, TransitionError>
    where
        D: Default,
    {
        self.request(None, Event::with_data(target, D::default()))
    }

    /// Like [`transition_to`](Self::transition_to), carrying event data.
    pub fn transition_to_with(
        &self,
        target: S,
        data: D,
    ) -> Result<SystemRecord<S, P>, TransitionError> {
        self.request(None, Event::with_data(target, data))
    }

    /// Move from `source` to `target`, only if the store is in `source`.
    ///
    /// Unlike [`transition_to`](Self::transition_to) a rule must apply even
    /// when `source == target`.
    pub fn transition_from_to(
        &self,
        source: S,
        target: S,
    ) -> Result<SystemRecord<S, P>, TransitionError>
    where
        D: Default,
    {
        self.request(Some(source), Event::with_data(target, D::default()))
    }

    /// Register `callback` for transitions matching `guard`.
    pub fn subscribe_to_transition<F>(
        &self,
        guard: TransitionGuard<S>,
        callback: F,
    ) -> SubscriptionId
    where
        F: Fn(&StateTransition<S>) + Send + Sync + 'static,
    {
        let id = SubscriptionId(Uuid::new_v4());
        self.subscriptions.lock().push(TransitionSubscription {
            id,
            guard,
            callback: Arc::new(callback),
        });
        debug!(subscription = %id, "transition subscription added");
        id
    }

    /// Remove a transition subscription. Returns false if it was unknown.
    pub fn unsubscribe_transition(&self, id: SubscriptionId) -> bool {
        let mut subscriptions = self.subscriptions.lock();
        let before = subscriptions.len();
        subscriptions.retain(|subscription| subscription.id != id);
        subscriptions.len() != before
    }

    /// Snapshot of the recorded transitions.
    pub fn history(&self) -> StateHistory<S> {
        self.history.lock().clone()
    }

    fn request(
        &self,
        source: Option<S>,
        event: Event<S, D>,
    ) -> Result<SystemRecord<S, P>, TransitionError> {
        let (result, transition) = self.store.transact(|reducer, current| {
            let target = &event.kind;
            let from = &current.system_state;

            if !reducer.is_state(target) {
                return reject(unknown_state(target));
            }
            if let Some(source) = &source {
                if source != from {
                    return reject(TransitionError::SourceMismatch {
                        expected: source.name().to_string(),
                        actual: from.name().to_string(),
                    });
                }
            }
            if !reducer.can_transition(from, target) {
                if source.is_none() && from == target {
                    trace!(state = from.name(), "already in requested state");
                    return (None, (Ok(current.clone()), None));
                }
                return reject(TransitionError::NoTransition {
                    from: from.name().to_string(),
                    to: target.name().to_string(),
                });
            }

            let reduction = reducer.apply(current.clone(), &event);
            let transition = self.record(from.clone(), &reduction);
            let record = reduction.record;
            let result = if record.system_state == *target {
                Ok(record.clone())
            } else {
                Err(TransitionError::Diverted {
                    to: target.name().to_string(),
                    actual: record.system_state.name().to_string(),
                })
            };
            (Some(record), (result, transition))
        });

        if let Some(transition) = transition {
            self.announce(&transition);
        }
        result
    }

    /// Append a transition to the history when at least one rule fired.
    /// Runs under the store's update lock so history order matches dispatch
    /// order.
    fn record(&self, from: S, reduction: &Reduction<S, P>) -> Option<StateTransition<S>> {
        if !reduction.transitioned() {
            return None;
        }
        let transition = StateTransition {
            from,
            to: reduction.record.system_state.clone(),
            timestamp: Utc::now(),
            rules_fired: reduction.fired,
        };
        debug!(
            from = transition.from.name(),
            to = transition.to.name(),
            rules = transition.rules_fired,
            "transition"
        );
        let mut history = self.history.lock();
        *history = history.record(transition.clone());
        Some(transition)
    }

    fn announce(&self, transition: &StateTransition<S>) {
        let callbacks: Vec<TransitionCallback<S>> = self
            .subscriptions
            .lock()
            .iter()
            .filter(|subscription| subscription.guard.matches(&transition.from, &transition.to))
            .map(|subscription| Arc::clone(&subscription.callback))
            .collect();
        for callback in callbacks {
            callback(transition);
        }
    }
}

/// Result of a transition request plus the transition it caused, if any.
type Outcome<S, P> = (
    Result<SystemRecord<S, P>, TransitionError>,
    Option<StateTransition<S>>,
);

fn reject<S: State, P>(err: TransitionError) -> (Option<SystemRecord<S, P>>, Outcome<S, P>) {
    (None, (Err(err), None))
}

fn unknown_state<S: State>(state: &S) -> TransitionError {
    TransitionError::UnknownState {
        state: state.name().to_string(),
    }
}

impl<S: State, P: Clone, D> fmt::Debug for TransitionStore<S, P, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionStore")
            .field("subscriptions", &self.subscriptions.lock().len())
            .field("history", &self.history.lock().transitions().len())
            .finish()
    }
}
