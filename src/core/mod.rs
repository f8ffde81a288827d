//! Core value types of a transition system.
//!
//! - State tokens via the `State` trait
//! - Records and events that flow through the compiled reducer
//! - Wildcard guards shared by rules and subscriptions
//! - Immutable transition history
//!
//! Nothing in this module has side effects.

mod event;
mod guard;
mod history;
mod record;
mod state;

pub use event::Event;
pub use guard::TransitionGuard;
pub use history::{StateHistory, StateTransition};
pub use record::{InitialRecord, SystemRecord};
pub use state::State;
