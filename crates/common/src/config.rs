//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config. Each crate owns the
//! settings it consumes; this module holds the process-level ones and
//! the lookup helpers the per-crate configs share.
//!
//! Every `from_env` has a `from_lookup` twin taking a closure, so tests can
//! feed a map instead of mutating the process environment.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{Error, Result};

/// Look up a required variable.
pub fn require<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::Internal(format!("{} is required", key)))
}

/// Look up a variable, falling back to `default` when unset.
pub fn string_or<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).unwrap_or_else(|| default.to_string())
}

/// Look up and parse a variable, falling back to `default` when unset.
///
/// A value that is set but does not parse is an error rather than a
/// silent fallback.
pub fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| Error::Internal(format!("{} has an invalid value: '{}'", key, raw))),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Database connection URL (PostgreSQL)
    pub database_url: String,

    /// Runtime configuration
    pub rust_log: String,
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            database_url: require(&lookup, "DATABASE_URL")?,
            rust_log: string_or(&lookup, "RUST_LOG", "converse=debug,tower_http=info"),
            port: parse_or(&lookup, "PORT", 4000)?,
        })
    }
}
