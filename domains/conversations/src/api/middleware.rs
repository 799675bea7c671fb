//! Conversations domain state and auth backend integration

use axum::extract::FromRef;
use converse_auth::AuthBackend;

use crate::engine::ConversationEngine;

/// Application state for the Conversations domain
#[derive(Clone)]
pub struct ConversationsState {
    pub engine: ConversationEngine,
    pub auth: AuthBackend,
}

impl FromRef<ConversationsState> for AuthBackend {
    fn from_ref(state: &ConversationsState) -> Self {
        state.auth.clone()
    }
}
