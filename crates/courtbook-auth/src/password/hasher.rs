//! Argon2id password hashing and verification.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use courtbook_core::config::auth::AuthConfig;
use courtbook_core::error::AppError;

/// Handles password hashing and verification using Argon2id.
///
/// The work factor comes from configuration so the test suite can run
/// with reduced parameters; the defaults are production-strength.
/// Verification runs in time independent of where a mismatch occurs.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Creates a hasher with the configured Argon2 parameters.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        let params = Params::new(
            config.hash_memory_kib,
            config.hash_iterations,
            config.hash_parallelism,
            None,
        )
        .map_err(|e| AppError::configuration(format!("Invalid Argon2 parameters: {e}")))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hashes a plaintext password with a fresh random salt.
    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

        Ok(hash.to_string())
    }

    /// Verifies a plaintext password against a stored Argon2id hash.
    ///
    /// Returns `Ok(true)` if the password matches, `Ok(false)` if not.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::internal(format!("Invalid password hash format: {e}")))?;

        match self.argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AppError::internal(format!(
                "Password verification failed: {e}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_hasher() -> PasswordHasher {
        // Minimal work factor to keep the suite fast.
        let config = AuthConfig {
            hash_memory_kib: 8,
            hash_iterations: 1,
            hash_parallelism: 1,
            ..AuthConfig::default()
        };
        PasswordHasher::new(&config).unwrap()
    }

    #[test]
    fn hash_and_verify_roundtrip() {
        let hasher = test_hasher();
        let hash = hasher.hash("secret1").unwrap();

        assert!(hasher.verify("secret1", &hash).unwrap());
        assert!(!hasher.verify("secret2", &hash).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let hasher = test_hasher();
        let first = hasher.hash("secret1").unwrap();
        let second = hasher.hash("secret1").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn malformed_hash_is_an_error_not_a_mismatch() {
        let hasher = test_hasher();
        assert!(hasher.verify("secret1", "not-a-phc-string").is_err());
    }
}
