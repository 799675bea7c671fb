//! Role sequencing for conversation turns
//!
//! A valid message list is `[system]? (user assistant)*` optionally followed
//! by one pending `user` message.

pub use converse_common::StateError;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{Message, MessageRole};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnState {
    /// No messages yet
    Empty,
    /// Only the system prompt so far
    Primed,
    /// Last message is from the user
    AwaitingReply,
    /// Last message is from the assistant
    Replied,
}

impl TurnState {
    /// Roles that may come next
    pub fn valid_roles(&self) -> &'static [MessageRole] {
        match self {
            Self::Empty => &[MessageRole::System, MessageRole::User],
            Self::Primed => &[MessageRole::User],
            Self::AwaitingReply => &[MessageRole::Assistant],
            Self::Replied => &[MessageRole::User],
        }
    }
}

impl std::fmt::Display for TurnState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty"),
            Self::Primed => write!(f, "primed"),
            Self::AwaitingReply => write!(f, "awaiting_reply"),
            Self::Replied => write!(f, "replied"),
        }
    }
}

pub struct TurnStateMachine;

impl TurnStateMachine {
    /// Advance by one appended message
    pub fn transition(current: TurnState, role: MessageRole) -> Result<TurnState, StateError> {
        let next = match (current, role) {
            (TurnState::Empty, MessageRole::System) => TurnState::Primed,
            (TurnState::Empty | TurnState::Primed | TurnState::Replied, MessageRole::User) => {
                TurnState::AwaitingReply
            }
            (TurnState::AwaitingReply, MessageRole::Assistant) => TurnState::Replied,
            _ => {
                return Err(StateError::InvalidTransition {
                    from: current.to_string(),
                    event: role.to_string(),
                })
            }
        };
        Ok(next)
    }

    /// Fold a whole message list, starting from `Empty`
    pub fn validate(messages: &[Message]) -> Result<TurnState, StateError> {
        Self::validate_from(TurnState::Empty, messages)
    }

    pub fn validate_from(start: TurnState, messages: &[Message]) -> Result<TurnState, StateError> {
        messages
            .iter()
            .try_fold(start, |state, m| Self::transition(state, m.role))
    }
}
