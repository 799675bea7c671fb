//! Authentication configuration

use std::fmt;

use converse_common::config::{parse_or, require};
use converse_common::Result;

/// Default session lifetime (one hour)
pub const DEFAULT_SESSION_TTL_SECS: i64 = 3600;

/// Argon2id cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordHashConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordHashConfig {
    fn default() -> Self {
        Self {
            memory_kib: argon2::Params::DEFAULT_M_COST,
            iterations: argon2::Params::DEFAULT_T_COST,
            parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}

/// Authentication configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub cookie_secret: String,
    /// Mark the session cookie `Secure`; only turned off for plain-http local runs
    pub cookie_secure: bool,
    pub session_ttl_secs: i64,
    pub password: PasswordHashConfig,
}

impl AuthConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = PasswordHashConfig::default();

        Ok(Self {
            jwt_secret: require(&lookup, "JWT_SECRET")?,
            cookie_secret: require(&lookup, "COOKIE_SECRET")?,
            cookie_secure: parse_or(&lookup, "COOKIE_SECURE", true)?,
            session_ttl_secs: parse_or(&lookup, "SESSION_TTL_SECS", DEFAULT_SESSION_TTL_SECS)?,
            password: PasswordHashConfig {
                memory_kib: parse_or(&lookup, "PASSWORD_HASH_MEMORY_KIB", defaults.memory_kib)?,
                iterations: parse_or(&lookup, "PASSWORD_HASH_ITERATIONS", defaults.iterations)?,
                parallelism: parse_or(&lookup, "PASSWORD_HASH_PARALLELISM", defaults.parallelism)?,
            },
        })
    }
}

impl fmt::Debug for AuthConfig {
    #[mutants::skip] // Redacting Debug output, not behavior
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("cookie_secret", &"[REDACTED]")
            .field("cookie_secure", &self.cookie_secure)
            .field("session_ttl_secs", &self.session_ttl_secs)
            .field("password", &self.password)
            .finish()
    }
}
