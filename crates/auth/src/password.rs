//! Password hashing service (Argon2id, PHC strings)
//!
//! Hashing is CPU-bound and runs on tokio's blocking pool.

use std::fmt;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash as PhcString, PasswordHasher as _, SaltString},
    Algorithm, Argon2, Params, PasswordVerifier, Version,
};
use serde::{Deserialize, Serialize};

use crate::config::PasswordHashConfig;
use crate::error::AuthError;

/// An already-hashed password in PHC string form.
///
/// Stores only accept this type for password writes, so plaintext never
/// reaches them.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap a PHC string loaded from storage
    pub fn from_stored(phc: String) -> Self {
        Self(phc)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash([REDACTED])")
    }
}

/// Salted one-way hashing with tunable cost
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    pub fn new(config: PasswordHashConfig) -> Result<Self, AuthError> {
        let params = Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            None,
        )
        .map_err(|e| AuthError::PasswordHashFailed(format!("invalid argon2 params: {}", e)))?;

        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    pub async fn hash(&self, password: &str) -> Result<PasswordHash, AuthError> {
        let argon2 = self.argon2();
        let password = password.to_owned();

        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            argon2
                .hash_password(password.as_bytes(), &salt)
                .map(|phc| PasswordHash(phc.to_string()))
                .map_err(|e| AuthError::PasswordHashFailed(e.to_string()))
        })
        .await
        .map_err(|e| AuthError::PasswordHashFailed(format!("hashing task failed: {}", e)))?
    }

    /// Verify `password` against a stored hash.
    ///
    /// A stored value that is not a parseable PHC string verifies as `false`.
    pub async fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, AuthError> {
        let argon2 = self.argon2();
        let password = password.to_owned();
        let stored = hash.0.clone();

        tokio::task::spawn_blocking(move || match PhcString::new(&stored) {
            Ok(parsed) => argon2
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                tracing::warn!(error = %e, "Stored password hash is malformed");
                false
            }
        })
        .await
        .map_err(|e| AuthError::PasswordHashFailed(format!("verification task failed: {}", e)))
    }
}
