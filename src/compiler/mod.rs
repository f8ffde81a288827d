//! Transition table compiler.
//!
//! Turns a state set, an ordered transition table and an initial record into
//! a single pure update function ([`TransitionReducer`]).
//!
//! # Chaining
//!
//! Rules are not first-match-wins. Every rule whose guard matches gets to
//! run, in table order, and each one sees the record produced by the rules
//! before it. A generic `to: ON` rule and a specific `ON -> OFF` rule can
//! therefore layer their actions on the same event.
//!
//! # Example
//!
//! ```rust
//! use transys::compiler::{compile, TransitionRule};
//! use transys::core::{Event, InitialRecord};
//!
//! let on = "ON".to_string();
//! let off = "OFF".to_string();
//!
//! let reducer = compile(
//!     [on.clone(), off.clone()],
//!     [
//!         TransitionRule::any().to(on.clone()).action(|r, _| r.map_payload(|n: u32| n + 1)),
//!         TransitionRule::any().to(off.clone()),
//!     ],
//!     InitialRecord::new(on.clone(), 0u32),
//! )
//! .unwrap();
//!
//! let record = reducer.reduce_record(None, &Event::new(off.clone()));
//! assert_eq!(record.system_state, off);
//! let record = reducer.reduce_record(Some(record), &Event::new(on.clone()));
//! assert_eq!(record.payload, 1);
//! ```

mod reducer;
mod rule;

pub use reducer::{Reduction, TransitionReducer};
pub use rule::{RuleAction, TransitionRule};

use crate::core::{InitialRecord, State, SystemRecord};
use crate::error::ConfigError;
use tracing::debug;

/// Validate a state set, transition table and initial record, then compile them.
///
/// Fails fast with the first [`ConfigError`] found:
/// an empty state set, a missing initial token, or an initial token outside
/// the state set. Actions are typed closures here and always callable; the
/// JSON loader in [`config`](crate::config) is where a non-callable action
/// can show up.
pub fn compile<S, P, D>(
    states: impl IntoIterator<Item = S>,
    table: impl IntoIterator<Item = TransitionRule<S, P, D>>,
    initial: InitialRecord<S, P>,
) -> Result<TransitionReducer<S, P, D>, ConfigError>
where
    S: State,
{
    let states: Vec<S> = states.into_iter().collect();
    check_states(&states)?;
    let system_state = check_initial(&states, initial.system_state)?;

    let rules: Vec<_> = table.into_iter().collect();
    debug!(
        states = states.len(),
        rules = rules.len(),
        initial = system_state.name(),
        "compiled transition table"
    );

    Ok(TransitionReducer::new(
        states,
        rules,
        SystemRecord::new(system_state, initial.payload),
    ))
}

pub(crate) fn check_states<S>(states: &[S]) -> Result<(), ConfigError> {
    if states.is_empty() {
        return Err(ConfigError::EmptyStatesSet);
    }
    Ok(())
}

/// The initial token must be set and be one of `states`.
pub(crate) fn check_initial<S: State>(states: &[S], initial: Option<S>) -> Result<S, ConfigError> {
    let system_state = initial.ok_or(ConfigError::MissingInitialState)?;
    if !states.contains(&system_state) {
        return Err(ConfigError::UnknownInitialState {
            state: system_state.name().to_string(),
        });
    }
    Ok(system_state)
}
