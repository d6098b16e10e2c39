//! Password hashing and verification
//!
//! Passwords are hashed with Argon2id into PHC-format strings. Each call
//! generates a fresh random salt, so two hashes of the same plaintext differ.
//! Cost parameters come from [`AuthConfig`] so deployments can tune the
//! brute-force work factor.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use crate::config::AuthConfig;

/// One-way salted password hasher
///
/// `verify` never raises on a wrong password; a structurally invalid stored
/// hash is the only error path and maps to the gateway's `CorruptCredential`.
pub struct CredentialHasher {
    argon2: Argon2<'static>,
}

impl CredentialHasher {
    /// Create a hasher with cost parameters from configuration
    pub fn new(config: &AuthConfig) -> Result<Self, HashError> {
        let params = Params::new(
            config.hash_memory_kib,
            config.hash_iterations,
            config.hash_parallelism,
            None,
        )
        .map_err(|e| HashError::InvalidParams(e.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Create a hasher with the argon2 crate's default parameters
    pub fn with_defaults() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }

    /// Hash a plaintext password into a PHC-format string
    pub fn hash(&self, plaintext: &str) -> Result<String, HashError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| HashError::HashFailed(e.to_string()))
    }

    /// Verify a plaintext candidate against a stored hash
    ///
    /// Returns `Ok(false)` for a wrong password. Returns
    /// [`HashError::CorruptHash`] only when the stored hash itself cannot be
    /// interpreted; the caller decides how to surface that.
    pub fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, HashError> {
        let parsed =
            PasswordHash::new(hash).map_err(|e| HashError::CorruptHash(e.to_string()))?;

        match self.argon2.verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(HashError::CorruptHash(e.to_string())),
        }
    }
}

/// Error type for password hashing operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HashError {
    /// Hashing failed
    #[error("Hash failed: {0}")]
    HashFailed(String),

    /// Configured cost parameters are out of range
    #[error("Invalid hash parameters: {0}")]
    InvalidParams(String),

    /// Stored hash is structurally invalid
    #[error("Corrupt credential hash: {0}")]
    CorruptHash(String),
}
