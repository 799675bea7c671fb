//! Conversation engine
//!
//! Creates conversations, runs completion turns and serves read paths. Every
//! query is scoped to the authenticated user's id; a conversation owned by
//! somebody else is indistinguishable from a missing one.

use std::sync::Arc;

use converse_common::{Error, ObjectId, Result};
use converse_llm::{CompletionRequest, LlmMessage, LlmService};

use crate::config::ChatConfig;
use crate::domain::entities::{Conversation, ConversationSummary, Message};
use crate::domain::state::TurnStateMachine;
use crate::domain::title::sanitize_title;
use crate::locks::ConversationLocks;
use crate::repository::{ConversationStore, ConversationsRepositories};

pub const CHAT_NOT_FOUND: &str = "Chat not found.";
pub const CONVERSATION_NOT_FOUND: &str = "Conversation not found.";

#[derive(Clone)]
pub struct ConversationEngine {
    store: Arc<dyn ConversationStore>,
    llm: Arc<dyn LlmService>,
    config: Arc<ChatConfig>,
    locks: ConversationLocks,
}

impl ConversationEngine {
    pub fn new(
        repos: ConversationsRepositories,
        llm: Arc<dyn LlmService>,
        config: ChatConfig,
    ) -> Self {
        Self {
            store: repos.conversations,
            llm,
            config: Arc::new(config),
            locks: ConversationLocks::new(),
        }
    }

    /// One completion call; never retried
    async fn complete(&self, messages: Vec<LlmMessage>, purpose: &'static str) -> Result<String> {
        let response = self
            .llm
            .complete(CompletionRequest::new(messages))
            .await
            .map_err(|e| {
                tracing::warn!(purpose, error = %e, "Completion request failed");
                Error::from(e)
            })?;

        tracing::debug!(
            purpose,
            model = %response.model,
            input_tokens = response.input_tokens,
            output_tokens = response.output_tokens,
            "Completion finished"
        );
        Ok(response.content)
    }

    /// Start a conversation from the user's first message.
    ///
    /// Names the chat, gets the first reply, then stores system prompt, user
    /// message and reply in one write. A failed completion stores nothing.
    pub async fn create_conversation(
        &self,
        user_id: ObjectId,
        initial_message: &str,
    ) -> Result<Conversation> {
        let user = Message::user(initial_message)?;
        let system = Message::system(self.config.system_prompt.clone());

        let raw_title = self
            .complete(
                vec![
                    LlmMessage::system(self.config.title_prompt.clone()),
                    user.to_llm(),
                ],
                "title",
            )
            .await?;
        let chat_name = sanitize_title(&raw_title);

        let reply = self
            .complete(vec![system.to_llm(), user.to_llm()], "reply")
            .await?;

        let conversation = Conversation::new(
            user_id,
            chat_name,
            vec![system, user, Message::assistant(reply)],
        )?;
        self.store.create(&conversation).await?;

        tracing::info!(
            user_id = %user_id,
            chat_id = %conversation.id,
            "Conversation created"
        );
        Ok(conversation)
    }

    /// Run one user → assistant turn and return the assistant's text.
    ///
    /// Turns on the same conversation are serialized; the user message and
    /// the reply are appended together only after the completion succeeds.
    pub async fn send_message(
        &self,
        user_id: ObjectId,
        chat_id: ObjectId,
        user_message: &str,
    ) -> Result<String> {
        let user = Message::user(user_message)?;

        let _guard = self.locks.acquire(chat_id).await;

        let conversation = self
            .store
            .find_owned(chat_id, user_id)
            .await?
            .ok_or_else(|| Error::NotFound(CHAT_NOT_FOUND.to_string()))?;

        let state = TurnStateMachine::validate(&conversation.messages)?;
        TurnStateMachine::validate_from(state, std::slice::from_ref(&user))?;

        let mut history = conversation.llm_history();
        history.push(user.to_llm());
        let reply = self.complete(history, "reply").await?;

        let assistant = Message::assistant(reply.clone());
        self.store
            .append_messages(chat_id, &[user, assistant])
            .await?;

        tracing::debug!(user_id = %user_id, chat_id = %chat_id, "Turn appended");
        Ok(reply)
    }

    pub async fn list_conversations(&self, user_id: ObjectId) -> Result<Vec<ConversationSummary>> {
        Ok(self.store.list_by_user(user_id).await?)
    }

    /// Client-visible messages in append order
    pub async fn get_messages(&self, user_id: ObjectId, chat_id: ObjectId) -> Result<Vec<Message>> {
        let conversation = self
            .store
            .find_owned(chat_id, user_id)
            .await?
            .ok_or_else(|| Error::NotFound(CONVERSATION_NOT_FOUND.to_string()))?;

        Ok(conversation.visible_messages())
    }

    /// Conversations with an in-flight or queued turn
    #[mutants::skip] // Delegates to ConversationLocks::len()
    pub fn active_turns(&self) -> usize {
        self.locks.len()
    }
}
