//! In-memory stores
//!
//! Used by tests and by local runs without a database. Each check-then-write
//! happens under a single write lock, matching the uniqueness guarantees of
//! the Postgres constraints.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use converse_auth::PasswordHash;
use converse_common::{ObjectId, RepositoryError};

use crate::domain::entities::{ResetToken, User};
use crate::repository::{ResetTokenStore, UserStore};

#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<ObjectId, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.users.read().len()
    }
}

#[async_trait::async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, user: &User) -> Result<(), RepositoryError> {
        let mut users = self.users.write();
        if users.values().any(|u| u.email == user.email) || users.contains_key(&user.id) {
            return Err(RepositoryError::AlreadyExists);
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .users
            .read()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<User>, RepositoryError> {
        Ok(self.users.read().get(&id).cloned())
    }

    async fn update_password(
        &self,
        email: &str,
        password_hash: &PasswordHash,
    ) -> Result<bool, RepositoryError> {
        let mut users = self.users.write();
        match users.values_mut().find(|u| u.email == email) {
            Some(user) => {
                user.password_hash = password_hash.clone();
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn mark_verified(&self, id: ObjectId) -> Result<bool, RepositoryError> {
        let mut users = self.users.write();
        match users.get_mut(&id) {
            Some(user) if !user.is_verified => {
                user.is_verified = true;
                user.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn update_name(&self, id: ObjectId, name: &str) -> Result<Option<User>, RepositoryError> {
        let mut users = self.users.write();
        Ok(users.get_mut(&id).map(|user| {
            user.name = name.to_string();
            user.updated_at = Utc::now();
            user.clone()
        }))
    }
}

/// Keyed by email, so one email holds at most one token
#[derive(Debug, Default)]
pub struct MemoryResetTokenStore {
    tokens: RwLock<HashMap<String, ResetToken>>,
}

impl MemoryResetTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored tokens, expired ones included
    pub fn count(&self) -> usize {
        self.tokens.read().len()
    }

    /// Insert a record as-is, bypassing the live-token check
    pub fn insert_raw(&self, token: ResetToken) {
        self.tokens.write().insert(token.email.clone(), token);
    }
}

#[async_trait::async_trait]
impl ResetTokenStore for MemoryResetTokenStore {
    async fn create(
        &self,
        token: &ResetToken,
        live_after: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let mut tokens = self.tokens.write();
        if let Some(existing) = tokens.get(&token.email) {
            if existing.created_at > live_after {
                return Err(RepositoryError::AlreadyExists);
            }
        }
        tokens.insert(token.email.clone(), token.clone());
        Ok(())
    }

    async fn take_live(
        &self,
        token_hash: &str,
        live_after: DateTime<Utc>,
    ) -> Result<Option<ResetToken>, RepositoryError> {
        let mut tokens = self.tokens.write();
        let email = tokens
            .values()
            .find(|t| t.token_hash == token_hash && t.created_at > live_after)
            .map(|t| t.email.clone());
        Ok(email.and_then(|email| tokens.remove(&email)))
    }

    async fn delete_expired(&self, live_after: DateTime<Utc>) -> Result<u64, RepositoryError> {
        let mut tokens = self.tokens.write();
        let before = tokens.len();
        tokens.retain(|_, t| t.created_at > live_after);
        Ok((before - tokens.len()) as u64)
    }
}
