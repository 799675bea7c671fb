//! Accounts domain: users, credentials, reset tokens, email verification, profile

pub mod api;
pub mod config;
pub mod domain;
pub mod repository;
pub mod service;

// Re-export domain types at the crate root for convenience
pub use domain::entities::*;
pub use domain::state::{VerificationEvent, VerificationState, VerificationStateMachine};

// Re-export repository types
pub use repository::{
    spawn_reset_token_sweeper, AccountsRepositories, MemoryResetTokenStore, MemoryUserStore,
    PgResetTokenStore, PgUserStore, ResetTokenStore, UserIdentities, UserStore,
};

pub use config::AccountsConfig;
pub use service::CredentialManager;

// Re-export API types
pub use api::routes;
pub use api::AccountsState;
