//! Common state machine error types
//!
//! Shared by the account verification and conversation turn state machines.

use thiserror::Error;

use crate::error::Error;

/// Errors that can occur during state transitions
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StateError {
    #[error("Invalid transition: cannot transition from {from} via {event}")]
    InvalidTransition { from: String, event: String },

    #[error("Terminal state: {0} is a terminal state and cannot transition")]
    TerminalState(String),
}

impl From<StateError> for Error {
    fn from(err: StateError) -> Self {
        Error::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_error_messages() {
        let err = StateError::InvalidTransition {
            from: "awaiting_reply".into(),
            event: "user".into(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid transition: cannot transition from awaiting_reply via user"
        );

        let err = StateError::TerminalState("verified".into());
        assert!(err.to_string().contains("verified"));
    }

    #[test]
    fn test_state_error_is_internal() {
        let err: Error = StateError::TerminalState("verified".into()).into();
        assert!(matches!(err, Error::Internal(_)));
    }
}
