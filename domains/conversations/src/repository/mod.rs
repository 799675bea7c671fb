//! Repository implementations for the Conversations domain

pub mod conversations;
pub mod memory;

use std::sync::Arc;

use sqlx::PgPool;

use converse_common::{ObjectId, RepositoryError};

use crate::domain::entities::{Conversation, ConversationSummary, Message};

pub use conversations::PgConversationStore;
pub use memory::MemoryConversationStore;

/// Conversation documents with their ordered message lists
#[async_trait::async_trait]
pub trait ConversationStore: Send + Sync {
    /// Persist a new conversation together with its first messages
    async fn create(&self, conversation: &Conversation) -> Result<(), RepositoryError>;

    /// Load a conversation only if `user_id` owns it
    async fn find_owned(
        &self,
        id: ObjectId,
        user_id: ObjectId,
    ) -> Result<Option<Conversation>, RepositoryError>;

    /// Every conversation owned by `user_id`, oldest first
    async fn list_by_user(
        &self,
        user_id: ObjectId,
    ) -> Result<Vec<ConversationSummary>, RepositoryError>;

    /// Atomically append `messages` after the current last message.
    ///
    /// `NotFound` if the conversation does not exist.
    async fn append_messages(
        &self,
        id: ObjectId,
        messages: &[Message],
    ) -> Result<(), RepositoryError>;
}

/// Combined repository access for the Conversations domain
#[derive(Clone)]
pub struct ConversationsRepositories {
    pub conversations: Arc<dyn ConversationStore>,
}

impl ConversationsRepositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            conversations: Arc::new(PgConversationStore::new(pool)),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            conversations: Arc::new(MemoryConversationStore::new()),
        }
    }
}
