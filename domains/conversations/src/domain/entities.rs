//! Domain entities for the Conversations domain
//!
//! A conversation exclusively owns its message list. Messages are only ever
//! appended; insertion order is the conversation order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use converse_common::validation::validate_non_blank;
use converse_common::{Error, ObjectId, Result};
use converse_llm::{LlmMessage, LlmRole};

use crate::domain::state::TurnStateMachine;

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }

    /// Parse the stored form
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "system" => Some(MessageRole::System),
            "user" => Some(MessageRole::User),
            "assistant" => Some(MessageRole::Assistant),
            _ => None,
        }
    }
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<MessageRole> for LlmRole {
    fn from(role: MessageRole) -> Self {
        match role {
            MessageRole::System => LlmRole::System,
            MessageRole::User => LlmRole::User,
            MessageRole::Assistant => LlmRole::Assistant,
        }
    }
}

/// Message entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    fn at_now(role: MessageRole, content: String) -> Self {
        Self {
            role,
            content,
            timestamp: Utc::now(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::at_now(MessageRole::System, content.into())
    }

    /// A user turn; content must not be blank
    pub fn user(content: impl Into<String>) -> Result<Self> {
        let content = content.into();
        if !validate_non_blank(&content) {
            return Err(Error::Validation("Message must not be empty".to_string()));
        }
        Ok(Self::at_now(MessageRole::User, content))
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::at_now(MessageRole::Assistant, content.into())
    }

    pub fn is_system(&self) -> bool {
        self.role == MessageRole::System
    }

    pub fn to_llm(&self) -> LlmMessage {
        LlmMessage {
            role: self.role.into(),
            content: self.content.clone(),
        }
    }
}

/// Conversation entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    pub id: ObjectId,
    /// Owner; never reassigned
    pub user_id: ObjectId,
    pub chat_name: String,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Create a conversation from its first exchange
    pub fn new(user_id: ObjectId, chat_name: String, messages: Vec<Message>) -> Result<Self> {
        TurnStateMachine::validate(&messages)?;

        let now = Utc::now();
        Ok(Conversation {
            id: ObjectId::generate_at(now)?,
            user_id,
            chat_name,
            messages,
            created_at: now,
            updated_at: now,
        })
    }

    /// Messages shown to the client: everything except system prompts
    pub fn visible_messages(&self) -> Vec<Message> {
        self.messages
            .iter()
            .filter(|m| !m.is_system())
            .cloned()
            .collect()
    }

    /// Full history in completion-request form
    pub fn llm_history(&self) -> Vec<LlmMessage> {
        self.messages.iter().map(Message::to_llm).collect()
    }

    pub fn summary(&self) -> ConversationSummary {
        ConversationSummary {
            id: self.id,
            chat_name: self.chat_name.clone(),
        }
    }
}

/// List projection of a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    pub id: ObjectId,
    pub chat_name: String,
}
