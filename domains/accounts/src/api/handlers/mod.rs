//! HTTP handlers for the Accounts domain

pub mod auth;
pub mod profile;

use serde::Serialize;

/// `{"message": "..."}` body used by the auth routes
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}
