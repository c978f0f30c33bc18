//! Password hashing utilities using Argon2

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as Argon2PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use std::fmt::Debug;

use crate::config::HashingConfig;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Trait for password hashing operations
#[cfg_attr(test, automock)]
pub trait PasswordHasher: Send + Sync + Debug {
    /// Hash a password with a freshly generated salt
    fn hash(&self, password: &str) -> Result<String, DomainError>;

    /// Verify a password against a hash produced by `hash`
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Argon2id hasher with fixed cost parameters
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    params: Params,
}

impl Argon2Hasher {
    /// Create a hasher with the library's recommended parameters
    pub fn new() -> Self {
        Self {
            params: Params::default(),
        }
    }

    /// Create a hasher from configured cost parameters
    pub fn from_config(config: &HashingConfig) -> Result<Self, DomainError> {
        let params = Params::new(config.memory_kib, config.iterations, config.parallelism, None)
            .map_err(|e| DomainError::configuration(format!("Invalid hashing parameters: {}", e)))?;

        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DomainError::hashing(format!("Failed to hash password: {}", e)))
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(h) => h,
            Err(_) => return false,
        };

        // Parameters and salt come from the PHC string; the output comparison is constant time
        self.argon2()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

#[cfg(test)]
pub(crate) fn test_hasher() -> Argon2Hasher {
    Argon2Hasher::from_config(&HashingConfig {
        memory_kib: 64,
        iterations: 1,
        parallelism: 1,
    })
    .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = test_hasher();
        let password = "my_secure_password";

        let hash = hasher.hash(password).unwrap();

        assert!(hasher.verify(password, &hash));
        assert!(!hasher.verify("wrong_password", &hash));
    }

    #[test]
    fn test_hash_is_unique() {
        let hasher = test_hasher();
        let password = "my_secure_password";

        let hash1 = hasher.hash(password).unwrap();
        let hash2 = hasher.hash(password).unwrap();

        // Hashes should be different due to random salt
        assert_ne!(hash1, hash2);

        // But both should verify correctly
        assert!(hasher.verify(password, &hash1));
        assert!(hasher.verify(password, &hash2));
    }

    #[test]
    fn test_hash_never_contains_plaintext() {
        let hasher = test_hasher();

        let hash = hasher.hash("plaintext-secret").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("plaintext-secret"));
    }

    #[test]
    fn test_verify_invalid_hash() {
        let hasher = test_hasher();

        assert!(!hasher.verify("password", "invalid_hash_format"));
        assert!(!hasher.verify("password", ""));
    }

    #[test]
    fn test_empty_password() {
        let hasher = test_hasher();
        let password = "";

        let hash = hasher.hash(password).unwrap();
        assert!(hasher.verify(password, &hash));
        assert!(!hasher.verify(" ", &hash));
    }

    #[test]
    fn test_verify_uses_embedded_parameters() {
        let cheap = test_hasher();
        let other = Argon2Hasher::from_config(&HashingConfig {
            memory_kib: 128,
            iterations: 2,
            parallelism: 1,
        })
        .unwrap();

        let hash = cheap.hash("pw1").unwrap();
        assert!(other.verify("pw1", &hash));
        assert!(!other.verify("pw2", &hash));
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        let result = Argon2Hasher::from_config(&HashingConfig {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        });

        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }
}
