use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine as _;
use pbkdf2::pbkdf2_hmac;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::error::AppError;

pub const DEFAULT_PBKDF2_ITERATIONS: u32 = 100_000;

const SALT_LEN: usize = 16;
const HASH_LEN: usize = 32;

/// Error type for crypto operations.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("Stored credential is malformed: {0}")]
    Malformed(String),
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),
}

impl From<CryptoError> for AppError {
    fn from(e: CryptoError) -> Self {
        AppError::Internal(e.to_string())
    }
}

/// Salted PBKDF2-HMAC-SHA256 password hash as persisted in the account
/// mapping. The password itself is never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordHash {
    pub salt: String,
    pub hash: String,
    pub iterations: u32,
}

impl PasswordHash {
    /// Hash `password` under a fresh random salt.
    pub fn derive(password: &str) -> Self {
        Self::derive_with(password, DEFAULT_PBKDF2_ITERATIONS)
    }

    pub fn derive_with(password: &str, iterations: u32) -> Self {
        let iterations = iterations.max(1);
        let mut salt = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut salt);
        let key = derive_key(password, &salt, iterations);
        Self {
            salt: B64.encode(salt),
            hash: B64.encode(key),
            iterations,
        }
    }

    /// Check `password` against this hash.
    pub fn verify(&self, password: &str) -> Result<bool, CryptoError> {
        let salt = B64.decode(&self.salt)?;
        let expected = B64.decode(&self.hash)?;
        if expected.len() != HASH_LEN {
            return Err(CryptoError::Malformed(format!(
                "hash has wrong length: {} (expected {HASH_LEN})",
                expected.len()
            )));
        }
        let actual = derive_key(password, &salt, self.iterations.max(1));
        Ok(constant_time_eq(&actual, &expected))
    }
}

fn derive_key(password: &str, salt: &[u8], iterations: u32) -> [u8; HASH_LEN] {
    let mut key = [0u8; HASH_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut key);
    key
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
