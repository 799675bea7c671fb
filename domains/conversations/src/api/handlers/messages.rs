//! Message handlers
//!
//! - POST /chat/{chat_id}/messages
//! - GET  /chat/{chat_id}/messages

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use converse_auth::AuthUser;
use converse_common::validation::non_blank_rule;
use converse_common::{ObjectId, Result, ValidatedJson};

use crate::api::middleware::ConversationsState;
use crate::domain::entities::Message;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    #[validate(custom(function = "non_blank_rule"))]
    pub user_message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResponse {
    pub assistant_message: String,
}

pub async fn send_message(
    AuthUser(ctx): AuthUser,
    State(state): State<ConversationsState>,
    Path(chat_id): Path<String>,
    ValidatedJson(req): ValidatedJson<SendMessageRequest>,
) -> Result<Json<SendMessageResponse>> {
    let chat_id = ObjectId::parse(&chat_id)?;
    let assistant_message = state
        .engine
        .send_message(ctx.user_id(), chat_id, &req.user_message)
        .await?;

    Ok(Json(SendMessageResponse { assistant_message }))
}

pub async fn list_messages(
    AuthUser(ctx): AuthUser,
    State(state): State<ConversationsState>,
    Path(chat_id): Path<String>,
) -> Result<Json<Vec<Message>>> {
    let chat_id = ObjectId::parse(&chat_id)?;
    let messages = state.engine.get_messages(ctx.user_id(), chat_id).await?;
    Ok(Json(messages))
}
