//! Named actions for declarative transition tables.

use crate::compiler::RuleAction;
use crate::core::{Event, State, SystemRecord};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Maps the action names used in a JSON transition table to closures.
///
/// # Example
///
/// ```rust
/// use transys::config::ActionRegistry;
///
/// let registry = ActionRegistry::<String, u32>::new()
///     .register("count", |record, _event| record.map_payload(|n| n + 1));
///
/// assert!(registry.contains("count"));
/// assert!(!registry.contains("reset"));
/// ```
pub struct ActionRegistry<S: State, P, D = ()> {
    actions: HashMap<String, RuleAction<S, P, D>>,
}

impl<S: State, P, D> ActionRegistry<S, P, D> {
    pub fn new() -> Self {
        Self {
            actions: HashMap::new(),
        }
    }

    /// Register `action` under `name`, replacing any previous entry.
    pub fn register<F>(mut self, name: impl Into<String>, action: F) -> Self
    where
        F: Fn(SystemRecord<S, P>, &Event<S, D>) -> SystemRecord<S, P> + Send + Sync + 'static,
    {
        self.actions.insert(name.into(), Arc::new(action));
        self
    }

    pub fn get(&self, name: &str) -> Option<&RuleAction<S, P, D>> {
        self.actions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl<S: State, P, D> Default for ActionRegistry<S, P, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State, P, D> fmt::Debug for ActionRegistry<S, P, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.actions.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("ActionRegistry")
            .field("actions", &names)
            .finish()
    }
}
