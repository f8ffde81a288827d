//! System state records.
//!
//! A record is the full state held by the store: the reserved
//! `systemState` field plus an opaque payload that only rule actions touch.

use serde::{Deserialize, Serialize};

/// The full state of a transition system.
///
/// Serializes as a flat object: the payload's fields sit next to
/// `systemState`.
///
/// # Example
///
/// ```rust
/// use transys::core::SystemRecord;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// struct Lamp {
///     text: String,
/// }
///
/// let record = SystemRecord::new("ON".to_string(), Lamp { text: "lit".into() });
/// let json = serde_json::to_value(&record).unwrap();
/// assert_eq!(json["systemState"], "ON");
/// assert_eq!(json["text"], "lit");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SystemRecord<S, P> {
    /// Current state token
    #[serde(rename = "systemState")]
    pub system_state: S,
    /// Everything else
    #[serde(flatten)]
    pub payload: P,
}

impl<S, P> SystemRecord<S, P> {
    pub fn new(system_state: S, payload: P) -> Self {
        Self {
            system_state,
            payload,
        }
    }

    /// Replace the state token, keeping the payload.
    pub fn with_state(self, system_state: S) -> Self {
        Self {
            system_state,
            payload: self.payload,
        }
    }

    /// Transform the payload, keeping the state token.
    pub fn map_payload<F>(self, f: F) -> Self
    where
        F: FnOnce(P) -> P,
    {
        Self {
            system_state: self.system_state,
            payload: f(self.payload),
        }
    }
}

/// Record handed to the compiler as the starting point.
///
/// Unlike [`SystemRecord`] the state token may be missing, which the
/// compiler rejects.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InitialRecord<S, P> {
    #[serde(rename = "systemState")]
    pub system_state: Option<S>,
    #[serde(flatten)]
    pub payload: P,
}

impl<S, P> InitialRecord<S, P> {
    pub fn new(system_state: S, payload: P) -> Self {
        Self {
            system_state: Some(system_state),
            payload,
        }
    }

    /// An initial record with no state token set.
    pub fn unset(payload: P) -> Self {
        Self {
            system_state: None,
            payload,
        }
    }
}

impl<S, P> From<SystemRecord<S, P>> for InitialRecord<S, P> {
    fn from(record: SystemRecord<S, P>) -> Self {
        Self::new(record.system_state, record.payload)
    }
}
