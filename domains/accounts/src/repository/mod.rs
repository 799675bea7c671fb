//! Repository implementations for the Accounts domain
//!
//! Stores are async traits with a Postgres implementation for production and
//! an in-memory one for tests and local runs.

pub mod memory;
pub mod reset_tokens;
pub mod sweeper;
pub mod users;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use converse_auth::{AuthIdentity, IdentityStore, PasswordHash};
use converse_common::{ObjectId, RepositoryError};

use crate::domain::entities::{ResetToken, User};

pub use memory::{MemoryResetTokenStore, MemoryUserStore};
pub use reset_tokens::PgResetTokenStore;
pub use sweeper::spawn_reset_token_sweeper;
pub use users::PgUserStore;

/// Credential store
#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user; `AlreadyExists` if the email is taken
    async fn create(&self, user: &User) -> Result<(), RepositoryError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<User>, RepositoryError>;

    /// Overwrite the password of the user with `email`.
    ///
    /// Returns `false` when no such user exists.
    async fn update_password(
        &self,
        email: &str,
        password_hash: &PasswordHash,
    ) -> Result<bool, RepositoryError>;

    /// Set `is_verified`; returns `false` if the user was already verified
    /// or does not exist
    async fn mark_verified(&self, id: ObjectId) -> Result<bool, RepositoryError>;

    async fn update_name(&self, id: ObjectId, name: &str) -> Result<Option<User>, RepositoryError>;
}

/// Password reset tokens, at most one live token per email.
///
/// `live_after` is the cutoff: tokens created at or before it are expired and
/// behave as if they were already deleted.
#[async_trait::async_trait]
pub trait ResetTokenStore: Send + Sync {
    /// Insert a token; `AlreadyExists` if the email already has a live one
    async fn create(
        &self,
        token: &ResetToken,
        live_after: DateTime<Utc>,
    ) -> Result<(), RepositoryError>;

    /// Atomically remove a live token and return it; `None` if it was
    /// unknown, expired, or already taken by a concurrent caller
    async fn take_live(
        &self,
        token_hash: &str,
        live_after: DateTime<Utc>,
    ) -> Result<Option<ResetToken>, RepositoryError>;

    /// Purge expired tokens; returns how many were removed
    async fn delete_expired(&self, live_after: DateTime<Utc>) -> Result<u64, RepositoryError>;
}

/// Resolves session subjects against the user store
pub struct UserIdentities(pub Arc<dyn UserStore>);

#[async_trait::async_trait]
impl IdentityStore for UserIdentities {
    async fn find_identity(&self, id: ObjectId) -> Result<Option<AuthIdentity>, RepositoryError> {
        Ok(self.0.find_by_id(id).await?.map(|user| user.identity()))
    }
}

/// Combined repository access for the Accounts domain
#[derive(Clone)]
pub struct AccountsRepositories {
    pub users: Arc<dyn UserStore>,
    pub reset_tokens: Arc<dyn ResetTokenStore>,
}

impl AccountsRepositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserStore::new(pool.clone())),
            reset_tokens: Arc::new(PgResetTokenStore::new(pool)),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(MemoryUserStore::new()),
            reset_tokens: Arc::new(MemoryResetTokenStore::new()),
        }
    }

    /// Identity lookup for the auth backend
    pub fn identities(&self) -> Arc<dyn IdentityStore> {
        Arc::new(UserIdentities(self.users.clone()))
    }
}
