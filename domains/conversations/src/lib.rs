//! Conversations domain: chat threads, completion turns, chat naming

pub mod api;
pub mod config;
pub mod domain;
pub mod engine;
pub mod locks;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{Conversation, ConversationSummary, Message, MessageRole};
pub use domain::state::{StateError, TurnState, TurnStateMachine};
pub use domain::title::sanitize_title;

// Re-export repository types
pub use repository::{
    ConversationStore, ConversationsRepositories, MemoryConversationStore, PgConversationStore,
};

pub use config::ChatConfig;
pub use engine::ConversationEngine;

// Re-export API types
pub use api::routes;
pub use api::ConversationsState;
