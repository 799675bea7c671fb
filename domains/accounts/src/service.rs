//! Credential and session manager
//!
//! Registration, login, password reset and email verification. Handlers stay
//! thin and call into here; all request validation has already happened.

use axum_extra::extract::cookie::SignedCookieJar;
use chrono::{DateTime, Utc};

use converse_auth::AuthBackend;
use converse_common::{hash_token, Error, ObjectId, RepositoryError, Result, StateError};
use converse_email::Mailer;

use crate::config::AccountsConfig;
use crate::domain::entities::{Profile, ResetToken, User};
use crate::domain::state::{VerificationEvent, VerificationStateMachine};
use crate::repository::AccountsRepositories;

pub const EMAIL_TAKEN: &str = "A User with this email already exists.";
pub const USER_NOT_FOUND: &str = "User doesn't exists.";
pub const INVALID_CREDENTIALS: &str = "Invalid credentials.";
pub const RESET_ALREADY_REQUESTED: &str = "A password reset was already requested for this email.";
pub const RESET_TOKEN_INVALID: &str = "Invalid or expired reset token.";
pub const ALREADY_VERIFIED: &str = "Email is already verified.";

fn already_verified(_: StateError) -> Error {
    Error::Conflict(ALREADY_VERIFIED.to_string())
}

/// Borrowed view over the accounts state
pub struct CredentialManager<'a> {
    repos: &'a AccountsRepositories,
    auth: &'a AuthBackend,
    mailer: &'a Mailer,
    config: &'a AccountsConfig,
}

impl<'a> CredentialManager<'a> {
    pub fn new(
        repos: &'a AccountsRepositories,
        auth: &'a AuthBackend,
        mailer: &'a Mailer,
        config: &'a AccountsConfig,
    ) -> Self {
        Self {
            repos,
            auth,
            mailer,
            config,
        }
    }

    /// Tokens created at or before this instant are expired
    fn reset_cutoff(&self) -> DateTime<Utc> {
        Utc::now() - self.config.reset_token_ttl()
    }

    async fn user_by_id(&self, id: ObjectId) -> Result<User> {
        self.repos
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::NotFound(USER_NOT_FOUND.to_string()))
    }

    async fn user_by_email(&self, email: &str) -> Result<User> {
        self.repos
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| Error::NotFound(USER_NOT_FOUND.to_string()))
    }

    /// Create an unverified user and queue the verification email.
    ///
    /// No session is started.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<User> {
        if self.repos.users.find_by_email(email).await?.is_some() {
            return Err(Error::Conflict(EMAIL_TAKEN.to_string()));
        }

        let password_hash = self.auth.hasher().hash(password).await?;
        let user = User::new(name.to_string(), email.to_string(), password_hash)?;

        // A concurrent registration can still win the unique constraint
        self.repos.users.create(&user).await.map_err(|e| match e {
            RepositoryError::AlreadyExists => Error::Conflict(EMAIL_TAKEN.to_string()),
            other => other.into(),
        })?;

        tracing::info!(user_id = %user.id, "User registered");
        self.mailer
            .send_verification(&user.email, &user.name, &user.id.to_string());

        Ok(user)
    }

    /// Check credentials and start a session
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, SignedCookieJar)> {
        let user = self.user_by_email(email).await?;

        if !self.auth.hasher().verify(password, &user.password_hash).await? {
            tracing::debug!(user_id = %user.id, "Login rejected: wrong password");
            return Err(Error::Authentication(INVALID_CREDENTIALS.to_string()));
        }

        let jar = self.auth.start_session(user.id)?;
        tracing::info!(user_id = %user.id, "User logged in");
        Ok((user, jar))
    }

    pub fn logout(&self) -> SignedCookieJar {
        self.auth.end_session()
    }

    /// Issue a single-use reset token and mail it
    pub async fn forgot_password(&self, email: &str) -> Result<()> {
        let user = self.user_by_email(email).await?;

        let (token, record) = ResetToken::issue(&user.email)?;
        self.repos
            .reset_tokens
            .create(&record, self.reset_cutoff())
            .await
            .map_err(|e| match e {
                RepositoryError::AlreadyExists => {
                    Error::Conflict(RESET_ALREADY_REQUESTED.to_string())
                }
                other => other.into(),
            })?;

        tracing::info!(user_id = %user.id, "Password reset requested");
        self.mailer.send_password_reset(
            &user.email,
            &token,
            self.config.reset_token_ttl_minutes(),
        );
        Ok(())
    }

    /// Consume a reset token and overwrite the password
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<()> {
        let token_hash = hash_token(token);
        // Claiming the token first makes it single use under concurrent resets
        let record = self
            .repos
            .reset_tokens
            .take_live(&token_hash, self.reset_cutoff())
            .await?
            .ok_or_else(|| Error::NotFound(RESET_TOKEN_INVALID.to_string()))?;

        let password_hash = self.auth.hasher().hash(new_password).await?;
        let updated = self
            .repos
            .users
            .update_password(&record.email, &password_hash)
            .await?;

        if !updated {
            tracing::warn!("Reset token pointed at a missing user");
            return Err(Error::NotFound(USER_NOT_FOUND.to_string()));
        }

        tracing::info!("Password reset completed");
        Ok(())
    }

    /// Queue another verification email for the session user
    pub async fn resend_verification(&self, user_id: ObjectId) -> Result<()> {
        let user = self.user_by_id(user_id).await?;

        VerificationStateMachine::transition(user.verification_state(), VerificationEvent::Verify)
            .map_err(already_verified)?;

        self.mailer
            .send_verification(&user.email, &user.name, &user.id.to_string());
        Ok(())
    }

    /// Flip `is_verified` once; later attempts conflict
    pub async fn verify_email(&self, user_id: ObjectId) -> Result<()> {
        let user = self.user_by_id(user_id).await?;

        VerificationStateMachine::transition(user.verification_state(), VerificationEvent::Verify)
            .map_err(already_verified)?;

        if !self.repos.users.mark_verified(user.id).await? {
            return Err(Error::Conflict(ALREADY_VERIFIED.to_string()));
        }

        tracing::info!(user_id = %user.id, "Email verified");
        Ok(())
    }

    pub async fn profile(&self, user_id: ObjectId) -> Result<Profile> {
        let user = self.user_by_id(user_id).await?;
        Ok(Profile::from(&user))
    }

    pub async fn rename(&self, user_id: ObjectId, name: &str) -> Result<Profile> {
        let name = User::validate_rename(name)?;
        let user = self
            .repos
            .users
            .update_name(user_id, &name)
            .await?
            .ok_or_else(|| Error::NotFound(USER_NOT_FOUND.to_string()))?;
        Ok(Profile::from(&user))
    }
}
