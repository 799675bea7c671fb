//! Accounts domain state and auth backend integration

use axum::extract::FromRef;
use converse_auth::AuthBackend;
use converse_email::Mailer;

use crate::config::AccountsConfig;
use crate::repository::AccountsRepositories;
use crate::service::CredentialManager;

/// Application state for the Accounts domain
#[derive(Clone)]
pub struct AccountsState {
    pub repos: AccountsRepositories,
    pub auth: AuthBackend,
    pub mailer: Mailer,
    pub config: AccountsConfig,
}

impl AccountsState {
    pub fn credentials(&self) -> CredentialManager<'_> {
        CredentialManager::new(&self.repos, &self.auth, &self.mailer, &self.config)
    }
}

impl FromRef<AccountsState> for AuthBackend {
    fn from_ref(state: &AccountsState) -> Self {
        state.auth.clone()
    }
}
