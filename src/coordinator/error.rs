//! Coordinator errors.

use crate::builder::BuildError;
use crate::table::HandlerError;
use thiserror::Error;

/// Errors returned by [`Coordinator`](crate::Coordinator) operations.
///
/// Requests that simply do not apply (no matching rule, machine locked) are
/// not errors; they come back as an absorbed
/// [`TransitionOutcome`](crate::TransitionOutcome).
#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("Machine '{0}' is already registered")]
    DuplicateMachine(String),

    #[error("Machine '{0}' is not registered")]
    UnknownMachine(String),

    #[error("'{state}' is not a state of machine '{machine}'")]
    UnknownState { machine: String, state: String },

    #[error("Machine '{machine}' has an invalid transition table: {source}")]
    InvalidTable {
        machine: String,
        #[source]
        source: BuildError,
    },

    #[error("Handler for machine '{machine}' ({from} -> {to}) failed: {source}")]
    Handler {
        machine: String,
        from: String,
        to: String,
        #[source]
        source: HandlerError,
    },

    #[error(transparent)]
    Build(#[from] BuildError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn handler_error_keeps_its_source() {
        let err = CoordinatorError::Handler {
            machine: "player-muted".into(),
            from: "unmuted".into(),
            to: "muted".into(),
            source: "no audio device".into(),
        };

        assert_eq!(
            err.to_string(),
            "Handler for machine 'player-muted' (unmuted -> muted) failed: no audio device"
        );
        assert_eq!(err.source().map(|s| s.to_string()).as_deref(), Some("no audio device"));
    }

    #[test]
    fn build_errors_convert_transparently() {
        let err: CoordinatorError = BuildError::MissingInitialState.into();
        assert!(matches!(err, CoordinatorError::Build(BuildError::MissingInitialState)));
        assert_eq!(err.to_string(), BuildError::MissingInitialState.to_string());
    }
}
