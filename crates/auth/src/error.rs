//! Authentication errors
//!
//! Every session failure renders the same 401 body, so a client cannot tell
//! a missing cookie from a forged or expired one.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

pub const NOT_AUTHENTICATED: &str = "Not authenticated";

/// Authentication error
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("session cookie missing")]
    MissingSession,
    #[error("session token invalid or expired")]
    InvalidToken,
    #[error("session subject is not a valid user id")]
    InvalidUserId,
    #[error("session user no longer exists")]
    UserNotFound,
    #[error("failed to load session user")]
    UserLoadError,
    #[error("failed to issue session token: {0}")]
    TokenIssueFailed(String),
    #[error("password hashing failed: {0}")]
    PasswordHashFailed(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingSession
            | AuthError::InvalidToken
            | AuthError::InvalidUserId
            | AuthError::UserNotFound => StatusCode::UNAUTHORIZED,
            AuthError::UserLoadError
            | AuthError::TokenIssueFailed(_)
            | AuthError::PasswordHashFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let (code, message) = if status == StatusCode::UNAUTHORIZED {
            tracing::debug!(reason = %self, "Session rejected");
            ("UNAUTHORIZED", NOT_AUTHENTICATED)
        } else {
            tracing::error!(error = %self, "Authentication backend failure");
            ("INTERNAL_ERROR", "Internal server error")
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

impl From<AuthError> for converse_common::Error {
    fn from(err: AuthError) -> Self {
        match err.status_code() {
            StatusCode::UNAUTHORIZED => converse_common::Error::Authentication(NOT_AUTHENTICATED.into()),
            _ => converse_common::Error::Internal(err.to_string()),
        }
    }
}
