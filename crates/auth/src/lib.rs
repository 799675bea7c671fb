//! Session authentication for Converse
//!
//! Provides session token issuance and validation, the signed session
//! cookie, password hashing, and axum extractors that work with any domain
//! state implementing `FromRef<S>` for `AuthBackend`.

mod backend;
mod claims;
mod config;
mod context;
mod cookie;
mod error;
mod extractors;
mod jwt;
mod password;
mod types;

pub use backend::{AuthBackend, IdentityStore};
pub use claims::SessionClaims;
pub use config::{AuthConfig, PasswordHashConfig, DEFAULT_SESSION_TTL_SECS};
pub use context::AuthContext;
pub use cookie::{derive_cookie_key, SESSION_COOKIE};
pub use error::{AuthError, NOT_AUTHENTICATED};
pub use extractors::AuthUser;
pub use jwt::issue_session_token;
pub use password::{PasswordHash, PasswordHasher};
pub use types::AuthIdentity;
