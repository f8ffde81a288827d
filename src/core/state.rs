//! State tokens.
//!
//! A state token is an opaque identity value. The compiler only ever compares
//! tokens for equality and tests membership in the state set, so any type that
//! is comparable and serializable can act as one.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

/// Trait for state tokens.
///
/// # Required Traits
///
/// - `Clone`: tokens are copied into every record produced by a transition
/// - `PartialEq`: guards and membership tests compare tokens
/// - `Debug`: tokens show up in diagnostics
/// - `Serialize` + `DeserializeOwned`: records and transition tables can be
///   read from and written to JSON
///
/// # Example
///
/// ```rust
/// use transys::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum Power {
///     On,
///     Off,
/// }
///
/// impl State for Power {
///     fn name(&self) -> &str {
///         match self {
///             Self::On => "On",
///             Self::Off => "Off",
///         }
///     }
/// }
///
/// assert_eq!(Power::On.name(), "On");
/// ```
pub trait State: Clone + PartialEq + Debug + Serialize + DeserializeOwned + Send + Sync {
    /// Get the token's name for display/logging.
    fn name(&self) -> &str;
}

/// Plain strings are the token type used by JSON transition tables.
impl State for String {
    fn name(&self) -> &str {
        self
    }
}
