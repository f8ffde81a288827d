//! Error types.

use thiserror::Error;

/// Errors raised while compiling a transition table.
///
/// All of them are configuration mistakes: nothing is retried, the caller
/// has to fix the configuration and compile again.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("states must be an array of states")]
    InvalidStatesType,

    #[error("at least one state must be provided")]
    EmptyStatesSet,

    #[error("systemState must be set")]
    MissingInitialState,

    #[error("states must contain systemState (got '{state}')")]
    UnknownInitialState { state: String },

    #[error("transition.action must either be a function or unset (rule {index}: {reason})")]
    InvalidActionType { index: usize, reason: String },

    #[error("malformed transition configuration: {reason}")]
    Malformed { reason: String },
}

impl ConfigError {
    pub(crate) fn malformed(err: impl std::fmt::Display) -> Self {
        ConfigError::Malformed {
            reason: err.to_string(),
        }
    }
}

/// Errors returned by transition requests on a [`TransitionStore`].
///
/// [`TransitionStore`]: crate::store::TransitionStore
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransitionError {
    #[error("'{state}' is not a state of this system")]
    UnknownState { state: String },

    #[error("no transition available from '{from}' to '{to}'")]
    NoTransition { from: String, to: String },

    #[error("expected current state '{expected}', found '{actual}'")]
    SourceMismatch { expected: String, actual: String },

    #[error("transition to '{to}' ended in '{actual}'")]
    Diverted { to: String, actual: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_field() {
        assert_eq!(
            ConfigError::InvalidStatesType.to_string(),
            "states must be an array of states"
        );
        assert_eq!(
            ConfigError::EmptyStatesSet.to_string(),
            "at least one state must be provided"
        );
        assert_eq!(
            ConfigError::MissingInitialState.to_string(),
            "systemState must be set"
        );
        assert!(ConfigError::UnknownInitialState {
            state: "OK".into()
        }
        .to_string()
        .starts_with("states must contain systemState"));
        assert!(ConfigError::InvalidActionType {
            index: 0,
            reason: "expected an action name".into()
        }
        .to_string()
        .starts_with("transition.action must either be a function or unset"));
    }

    #[test]
    fn transition_errors_render_states() {
        let err = TransitionError::NoTransition {
            from: "OFF".into(),
            to: "ON".into(),
        };
        assert_eq!(err.to_string(), "no transition available from 'OFF' to 'ON'");
    }
}
