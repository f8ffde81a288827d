//! A minimal reducer store and the transition-aware wrapper around it.
//!
//! [`Store`] holds one state value, replaces it once per dispatched event by
//! running a [`Reducer`], and notifies plain listeners afterwards. It exists
//! so a compiled [`TransitionReducer`](crate::compiler::TransitionReducer)
//! has something to run in; [`TransitionStore`] layers transition requests
//! and transition subscriptions on top.

mod enhancer;

pub use enhancer::{
    enhance, SubscriptionId, TransitionCallback, TransitionStore, TransitionStoreConfig,
};

use parking_lot::Mutex;
use std::fmt;
use std::sync::{Arc, Weak};
use tracing::trace;
use uuid::Uuid;

/// A pure `(state, event) -> state` function.
///
/// `reduce` is called once per dispatched event. When `state` is `None` the
/// reducer starts from its own initial state.
pub trait Reducer {
    type State: Clone;
    type Event;

    fn initial_state(&self) -> Self::State;

    fn reduce(&self, state: Option<Self::State>, event: &Self::Event) -> Self::State;
}

type Listener = Arc<dyn Fn() + Send + Sync>;
type ListenerList = Mutex<Vec<(Uuid, Listener)>>;

/// Handle returned by [`Store::subscribe`].
///
/// Dropping the handle keeps the listener registered; call
/// [`unsubscribe`](Subscription::unsubscribe) to remove it.
pub struct Subscription {
    id: Uuid,
    listeners: Weak<ListenerList>,
}

impl Subscription {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Remove the listener. Returns false if it was already gone.
    pub fn unsubscribe(self) -> bool {
        let Some(listeners) = self.listeners.upgrade() else {
            return false;
        };
        let mut listeners = listeners.lock();
        let before = listeners.len();
        listeners.retain(|(id, _)| *id != self.id);
        listeners.len() != before
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

/// Single-value store driven by a [`Reducer`].
///
/// Updates are serialized by an internal lock. Listeners run after the lock
/// is released, so they may read the store or dispatch again. Reducers must
/// not dispatch.
///
/// # Example
///
/// ```rust
/// use transys::store::{Reducer, Store};
///
/// struct Sum;
///
/// impl Reducer for Sum {
///     type State = i64;
///     type Event = i64;
///
///     fn initial_state(&self) -> i64 {
///         0
///     }
///
///     fn reduce(&self, state: Option<i64>, event: &i64) -> i64 {
///         state.unwrap_or_else(|| self.initial_state()) + event
///     }
/// }
///
/// let store = Store::new(Sum);
/// store.dispatch(&5);
/// store.dispatch(&-2);
/// assert_eq!(store.get_state(), 3);
/// ```
pub struct Store<R: Reducer> {
    reducer: R,
    state: Mutex<R::State>,
    listeners: Arc<ListenerList>,
}

impl<R: Reducer> Store<R> {
    /// Create a store starting from the reducer's initial state.
    pub fn new(reducer: R) -> Self {
        let state = reducer.initial_state();
        Self::with_state(reducer, state)
    }

    /// Create a store with a preloaded state.
    ///
    /// The state is taken as given. [`enhance`] repairs a record whose token
    /// is outside the state set.
    pub fn with_state(reducer: R, state: R::State) -> Self {
        Self {
            reducer,
            state: Mutex::new(state),
            listeners: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn reducer(&self) -> &R {
        &self.reducer
    }

    pub fn get_state(&self) -> R::State {
        self.state.lock().clone()
    }

    /// Run the reducer for `event`, store the result and notify listeners.
    /// Returns the new state.
    pub fn dispatch(&self, event: &R::Event) -> R::State {
        self.transact(|reducer, current| {
            let next = reducer.reduce(Some(current.clone()), event);
            (Some(next.clone()), next)
        })
    }

    /// Register a listener called after every committed update.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = Uuid::new_v4();
        self.listeners.lock().push((id, Arc::new(listener)));
        Subscription {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    /// Run `step` under the update lock.
    ///
    /// `step` returns the state to commit (or `None` to leave the store
    /// untouched) plus a value handed back to the caller. Listeners are
    /// notified only when a state was committed.
    pub(crate) fn transact<T, F>(&self, step: F) -> T
    where
        F: FnOnce(&R, &R::State) -> (Option<R::State>, T),
    {
        let (committed, out) = {
            let mut state = self.state.lock();
            let (next, out) = step(&self.reducer, &*state);
            let committed = next.is_some();
            if let Some(next) = next {
                *state = next;
            }
            (committed, out)
        };

        if committed {
            self.notify();
        }
        out
    }

    fn notify(&self) {
        let listeners: Vec<Listener> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        trace!(listeners = listeners.len(), "notifying store listeners");
        for listener in listeners {
            listener();
        }
    }
}

impl<R: Reducer + fmt::Debug> fmt::Debug for Store<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("reducer", &self.reducer)
            .field("listeners", &self.listeners.lock().len())
            .finish()
    }
}
