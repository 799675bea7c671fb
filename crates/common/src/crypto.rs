//! Cryptographic utilities shared across Converse crates
//!
//! Random secrets come from the OS RNG. Secrets that are looked up by value
//! (reset tokens) are persisted only as their SHA-256 digest.

use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// Fill a buffer with cryptographically secure random bytes.
pub fn random_bytes<const N: usize>() -> Result<[u8; N]> {
    let mut bytes = [0u8; N];
    getrandom::getrandom(&mut bytes)
        .map_err(|e| Error::Internal(format!("Failed to generate random bytes: {}", e)))?;
    Ok(bytes)
}

/// Generate `byte_len` random bytes rendered as lowercase hex (`2 * byte_len` chars).
pub fn random_hex(byte_len: usize) -> Result<String> {
    let mut bytes = vec![0u8; byte_len];
    getrandom::getrandom(&mut bytes)
        .map_err(|e| Error::Internal(format!("Failed to generate random bytes: {}", e)))?;
    Ok(hex::encode(bytes))
}

/// SHA-256 digest of a secret token, hex encoded.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_hex_length_and_alphabet() {
        let token = random_hex(20).unwrap();
        assert_eq!(token.len(), 40);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_random_hex_is_not_repeated() {
        let a = random_hex(20).unwrap();
        let b = random_hex(20).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_random_bytes_fills_buffer() {
        let a: [u8; 16] = random_bytes().unwrap();
        let b: [u8; 16] = random_bytes().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_hash_token_is_deterministic() {
        let token = "a".repeat(40);
        assert_eq!(hash_token(&token), hash_token(&token));
        assert_eq!(hash_token(&token).len(), 64);
        assert_ne!(hash_token(&token), token);
    }

    #[test]
    fn test_hash_token_distinguishes_inputs() {
        assert_ne!(hash_token("abc"), hash_token("abd"));
    }
}
