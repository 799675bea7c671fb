//! Concrete authentication backend
//!
//! Owns the token secret, the cookie signing key and the password hasher,
//! and resolves session tokens to identities through an `IdentityStore`
//! implemented by the accounts domain.

use std::sync::Arc;

use axum::http::HeaderMap;
use axum_extra::extract::cookie::{Key, SignedCookieJar};
use converse_common::{ObjectId, RepositoryError};

use crate::config::AuthConfig;
use crate::context::AuthContext;
use crate::cookie::{derive_cookie_key, read_session, with_session, without_session};
use crate::error::AuthError;
use crate::jwt::{issue_session_token, validate_session_token};
use crate::password::PasswordHasher;
use crate::types::AuthIdentity;

/// Read model used to resolve a session subject to a user
#[async_trait::async_trait]
pub trait IdentityStore: Send + Sync {
    async fn find_identity(&self, id: ObjectId) -> Result<Option<AuthIdentity>, RepositoryError>;
}

/// Concrete authentication backend.
///
/// Domain states expose this via `FromRef`:
/// ```ignore
/// impl FromRef<MyDomainState> for AuthBackend {
///     fn from_ref(state: &MyDomainState) -> Self {
///         state.auth.clone()
///     }
/// }
/// ```
#[derive(Clone)]
pub struct AuthBackend {
    identities: Arc<dyn IdentityStore>,
    config: Arc<AuthConfig>,
    key: Key,
    hasher: PasswordHasher,
}

impl AuthBackend {
    pub fn new(identities: Arc<dyn IdentityStore>, config: AuthConfig) -> Result<Self, AuthError> {
        let key = derive_cookie_key(&config.cookie_secret);
        let hasher = PasswordHasher::new(config.password)?;
        Ok(Self {
            identities,
            config: Arc::new(config),
            key,
            hasher,
        })
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub fn hasher(&self) -> &PasswordHasher {
        &self.hasher
    }

    /// Issue a session token and wrap it in a signed cookie jar for the response
    pub fn start_session(&self, user_id: ObjectId) -> Result<SignedCookieJar, AuthError> {
        let token = issue_session_token(user_id, &self.config)?;
        Ok(with_session(self.key.clone(), token, &self.config))
    }

    /// Cookie jar that clears the session on the client
    pub fn end_session(&self) -> SignedCookieJar {
        without_session(self.key.clone())
    }

    async fn find_user(&self, id: ObjectId) -> Result<Option<AuthIdentity>, AuthError> {
        self.identities.find_identity(id).await.map_err(|e| {
            tracing::error!(error = %e, user_id = %id, "Failed to load user");
            AuthError::UserLoadError
        })
    }

    /// Resolve the request's session cookie to an authenticated context.
    pub(crate) async fn authenticate_session(
        &self,
        headers: &HeaderMap,
    ) -> Result<AuthContext, AuthError> {
        let token = read_session(headers, self.key.clone()).ok_or(AuthError::MissingSession)?;
        let claims = validate_session_token(&token, &self.config)?;

        let user_id = ObjectId::parse(&claims.sub).map_err(|_| AuthError::InvalidUserId)?;

        let user = self
            .find_user(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(AuthContext::new(user))
    }
}
