//! Route definitions for Conversations domain API

use axum::{routing::get, Router};

use super::handlers::{chats, messages};
use super::middleware::ConversationsState;

fn chat_routes() -> Router<ConversationsState> {
    Router::new().route("/chat", get(chats::list_chats).post(chats::create_chat))
}

fn message_routes() -> Router<ConversationsState> {
    Router::new().route(
        "/chat/{chat_id}/messages",
        get(messages::list_messages).post(messages::send_message),
    )
}

/// Create all Conversations domain API routes
pub fn routes() -> Router<ConversationsState> {
    Router::new().merge(chat_routes()).merge(message_routes())
}
