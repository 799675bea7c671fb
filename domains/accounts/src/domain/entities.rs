//! Domain entities for the Accounts domain
//!
//! A `User` only ever holds an already-hashed password. Reset tokens are
//! stored as the SHA-256 digest of the emailed token.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use converse_auth::{AuthIdentity, PasswordHash};
use converse_common::{hash_token, random_hex, Error, ObjectId, Result};

use crate::domain::state::VerificationState;

/// Maximum display name length (varchar(100))
pub const MAX_NAME_LENGTH: usize = 100;

/// Random bytes in a reset token (rendered as 40 hex characters)
pub const RESET_TOKEN_BYTES: usize = 20;

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::Validation("Name is required".to_string()));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(Error::Validation(format!(
            "Name must be at most {} characters",
            MAX_NAME_LENGTH
        )));
    }
    Ok(())
}

/// Registered user
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: ObjectId,
    pub name: String,
    pub email: String,
    pub password_hash: PasswordHash,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new, unverified user
    pub fn new(name: String, email: String, password_hash: PasswordHash) -> Result<Self> {
        validate_name(&name)?;

        let now = Utc::now();
        Ok(User {
            id: ObjectId::generate_at(now)?,
            name: name.trim().to_string(),
            email,
            password_hash,
            is_verified: false,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn verification_state(&self) -> VerificationState {
        if self.is_verified {
            VerificationState::Verified
        } else {
            VerificationState::Unverified
        }
    }

    /// Session-facing view of this user
    pub fn identity(&self) -> AuthIdentity {
        AuthIdentity {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            is_verified: self.is_verified,
        }
    }

    /// Validate a display name change
    pub fn validate_rename(name: &str) -> Result<String> {
        validate_name(name)?;
        Ok(name.trim().to_string())
    }
}

/// Pending password reset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetToken {
    pub token_hash: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl ResetToken {
    /// Generate a fresh token for `email`.
    ///
    /// Returns the plaintext token (sent by email, never stored) and the
    /// record to persist.
    pub fn issue(email: &str) -> Result<(String, ResetToken)> {
        let token = random_hex(RESET_TOKEN_BYTES)?;
        let record = ResetToken {
            token_hash: hash_token(&token),
            email: email.to_string(),
            created_at: Utc::now(),
        };
        Ok((token, record))
    }

    /// Still usable at `now` given the token lifetime
    pub fn is_live(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        self.created_at + ttl > now
    }
}

/// Public profile; never carries the password hash
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: ObjectId,
    pub name: String,
    pub email: String,
    pub is_verified: bool,
}

impl From<&User> for Profile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            is_verified: user.is_verified,
        }
    }
}
