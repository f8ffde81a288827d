//! Events dispatched to a transition system.

use serde::{Deserialize, Serialize};

/// An event with a `type` and optional data.
///
/// When `kind` is one of the compiled state tokens the event asks the system
/// to move to that state. Any other kind leaves the record untouched.
///
/// # Example
///
/// ```rust
/// use transys::core::Event;
///
/// let plain = Event::new("OFF".to_string());
/// assert_eq!(plain.kind, "OFF");
///
/// let with_data = Event::with_data("ON".to_string(), 42u32);
/// assert_eq!(with_data.data, 42);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event<S, D = ()> {
    #[serde(rename = "type")]
    pub kind: S,
    #[serde(default)]
    pub data: D,
}

impl<S> Event<S> {
    pub fn new(kind: S) -> Self {
        Self { kind, data: () }
    }
}

impl<S, D> Event<S, D> {
    pub fn with_data(kind: S, data: D) -> Self {
        Self { kind, data }
    }
}

impl<S> From<S> for Event<S> {
    fn from(kind: S) -> Self {
        Self::new(kind)
    }
}
