//! Password hashing
//!
//! New hashes are Argon2id PHC strings with a random salt. Accounts imported
//! from the previous system carry an unsalted SHA-256 hex digest; those still
//! verify, and `needs_rehash` tells the caller to replace them.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use sha2::{Digest, Sha256};
use thiserror::Error;
use wf_core::error::WfError;

/// Password hashing errors
#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    Hash(String),
}

impl From<PasswordError> for WfError {
    fn from(err: PasswordError) -> Self {
        WfError::Storage(err.to_string())
    }
}

/// Length of a legacy hex digest
const LEGACY_DIGEST_LEN: usize = 64;

/// Password hashing service
#[derive(Clone)]
pub struct PasswordService {
    argon2: Argon2<'static>,
}

impl Default for PasswordService {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordService {
    /// Argon2id with the crate's recommended parameters
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }

    /// Argon2id with the smallest allowed cost
    ///
    /// Verification reads the parameters from the stored hash, so hashes
    /// produced here verify with any instance. Intended for test fixtures.
    pub fn minimal() -> Self {
        let params = Params::new(Params::MIN_M_COST, Params::MIN_T_COST, Params::MIN_P_COST, None)
            .unwrap_or_default();
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }

    /// Hash a plaintext password with a fresh salt
    pub fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::Hash(e.to_string()))
    }

    /// Verify a plaintext password against a stored hash
    ///
    /// Unparseable hashes never verify.
    pub fn verify(&self, plaintext: &str, stored_hash: &str) -> bool {
        if is_legacy_digest(stored_hash) {
            return constant_time_compare(&legacy_digest(plaintext), &stored_hash.to_ascii_lowercase());
        }

        match PasswordHash::new(stored_hash) {
            Ok(parsed) => self.argon2.verify_password(plaintext.as_bytes(), &parsed).is_ok(),
            Err(_) => false,
        }
    }

    /// Whether a stored hash should be replaced after a successful login
    pub fn needs_rehash(stored_hash: &str) -> bool {
        !stored_hash.starts_with("$argon2")
    }
}

/// Unsalted SHA-256 hex digest used by imported accounts
pub fn legacy_digest(plaintext: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(plaintext.as_bytes());
    hex::encode(hasher.finalize())
}

fn is_legacy_digest(stored_hash: &str) -> bool {
    stored_hash.len() == LEGACY_DIGEST_LEN && stored_hash.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Constant-time comparison to prevent timing attacks
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let service = PasswordService::minimal();
        let hash = service.hash("admin123").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(service.verify("admin123", &hash));
        assert!(!service.verify("admin124", &hash));
        assert!(!PasswordService::needs_rehash(&hash));
    }

    #[test]
    fn test_salted_hashes_differ() {
        let service = PasswordService::minimal();
        let a = service.hash("secret1").unwrap();
        let b = service.hash("secret1").unwrap();
        assert_ne!(a, b);
        assert!(service.verify("secret1", &a));
        assert!(service.verify("secret1", &b));
    }

    #[test]
    fn test_default_instance_verifies_minimal_hash() {
        let hash = PasswordService::minimal().hash("secret1").unwrap();
        assert!(PasswordService::new().verify("secret1", &hash));
    }

    #[test]
    fn test_legacy_digest() {
        let service = PasswordService::minimal();
        let digest = legacy_digest("admin123");
        assert_eq!(
            digest,
            "240be518fabd2724ddb6f04eeb1da5967448d7e831c08c8fa822809f74c720a9"
        );
        assert!(service.verify("admin123", &digest));
        assert!(service.verify("admin123", &digest.to_uppercase()));
        assert!(!service.verify("wrong", &digest));
        assert!(PasswordService::needs_rehash(&digest));
    }

    #[test]
    fn test_garbage_hash_never_verifies() {
        let service = PasswordService::minimal();
        assert!(!service.verify("anything", "not-a-hash"));
        assert!(!service.verify("", ""));
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("abc", "abc"));
        assert!(!constant_time_compare("abc", "abd"));
        assert!(!constant_time_compare("abc", "ab"));
    }
}
