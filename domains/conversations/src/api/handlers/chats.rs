//! Chat handlers
//!
//! - POST /chat
//! - GET  /chat

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use converse_auth::AuthUser;
use converse_common::validation::non_blank_rule;
use converse_common::{ObjectId, Result, ValidatedJson};

use crate::api::middleware::ConversationsState;
use crate::domain::entities::ConversationSummary;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateChatRequest {
    #[validate(custom(function = "non_blank_rule"))]
    pub initial_message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChatResponse {
    pub message: String,
    pub chat_id: ObjectId,
    pub chat_name: String,
}

pub async fn create_chat(
    AuthUser(ctx): AuthUser,
    State(state): State<ConversationsState>,
    ValidatedJson(req): ValidatedJson<CreateChatRequest>,
) -> Result<(StatusCode, Json<CreateChatResponse>)> {
    let conversation = state
        .engine
        .create_conversation(ctx.user_id(), &req.initial_message)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateChatResponse {
            message: "Chat created successfully".to_string(),
            chat_id: conversation.id,
            chat_name: conversation.chat_name,
        }),
    ))
}

pub async fn list_chats(
    AuthUser(ctx): AuthUser,
    State(state): State<ConversationsState>,
) -> Result<Json<Vec<ConversationSummary>>> {
    let chats = state.engine.list_conversations(ctx.user_id()).await?;
    Ok(Json(chats))
}
