//! In-memory conversation store
//!
//! Appends happen under one write lock, so each call is atomic.

use std::collections::HashMap;

use chrono::Utc;
use parking_lot::RwLock;

use converse_common::{ObjectId, RepositoryError};

use crate::domain::entities::{Conversation, ConversationSummary, Message};
use crate::repository::ConversationStore;

#[derive(Debug, Default)]
pub struct MemoryConversationStore {
    conversations: RwLock<HashMap<ObjectId, Conversation>>,
}

impl MemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.conversations.read().len()
    }
}

#[async_trait::async_trait]
impl ConversationStore for MemoryConversationStore {
    async fn create(&self, conversation: &Conversation) -> Result<(), RepositoryError> {
        let mut conversations = self.conversations.write();
        if conversations.contains_key(&conversation.id) {
            return Err(RepositoryError::AlreadyExists);
        }
        conversations.insert(conversation.id, conversation.clone());
        Ok(())
    }

    async fn find_owned(
        &self,
        id: ObjectId,
        user_id: ObjectId,
    ) -> Result<Option<Conversation>, RepositoryError> {
        Ok(self
            .conversations
            .read()
            .get(&id)
            .filter(|c| c.user_id == user_id)
            .cloned())
    }

    async fn list_by_user(
        &self,
        user_id: ObjectId,
    ) -> Result<Vec<ConversationSummary>, RepositoryError> {
        let conversations = self.conversations.read();
        let mut owned: Vec<&Conversation> = conversations
            .values()
            .filter(|c| c.user_id == user_id)
            .collect();
        owned.sort_by_key(|c| (c.created_at, c.id));
        Ok(owned.into_iter().map(Conversation::summary).collect())
    }

    async fn append_messages(
        &self,
        id: ObjectId,
        messages: &[Message],
    ) -> Result<(), RepositoryError> {
        let mut conversations = self.conversations.write();
        let conversation = conversations
            .get_mut(&id)
            .ok_or(RepositoryError::NotFound)?;
        conversation.messages.extend_from_slice(messages);
        conversation.updated_at = Utc::now();
        Ok(())
    }
}
