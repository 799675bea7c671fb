//! HTTP handlers for the Conversations domain

pub mod chats;
pub mod messages;
