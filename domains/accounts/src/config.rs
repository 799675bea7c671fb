//! Accounts configuration

use std::time::Duration as StdDuration;

use converse_common::config::parse_or;
use converse_common::Result;

pub const DEFAULT_RESET_TOKEN_TTL_SECS: i64 = 3600;
pub const DEFAULT_RESET_TOKEN_SWEEP_SECS: u64 = 300;

#[derive(Debug, Clone)]
pub struct AccountsConfig {
    /// Lifetime of a password reset token
    pub reset_token_ttl_secs: i64,
    /// How often expired reset tokens are purged
    pub reset_token_sweep_secs: u64,
}

impl Default for AccountsConfig {
    fn default() -> Self {
        Self {
            reset_token_ttl_secs: DEFAULT_RESET_TOKEN_TTL_SECS,
            reset_token_sweep_secs: DEFAULT_RESET_TOKEN_SWEEP_SECS,
        }
    }
}

impl AccountsConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let reset_token_ttl_secs =
            parse_or(&lookup, "RESET_TOKEN_TTL_SECS", DEFAULT_RESET_TOKEN_TTL_SECS)?;
        if reset_token_ttl_secs <= 0 {
            return Err(converse_common::Error::Internal(
                "RESET_TOKEN_TTL_SECS must be positive".to_string(),
            ));
        }

        let reset_token_sweep_secs =
            parse_or(&lookup, "RESET_TOKEN_SWEEP_SECS", DEFAULT_RESET_TOKEN_SWEEP_SECS)?;
        if reset_token_sweep_secs == 0 {
            return Err(converse_common::Error::Internal(
                "RESET_TOKEN_SWEEP_SECS must be positive".to_string(),
            ));
        }

        Ok(Self {
            reset_token_ttl_secs,
            reset_token_sweep_secs,
        })
    }

    pub fn reset_token_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.reset_token_ttl_secs)
    }

    /// Lifetime quoted in the reset email
    pub fn reset_token_ttl_minutes(&self) -> i64 {
        self.reset_token_ttl_secs / 60
    }

    pub fn sweep_interval(&self) -> StdDuration {
        StdDuration::from_secs(self.reset_token_sweep_secs)
    }
}
