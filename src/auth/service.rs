//! Request-level authentication orchestration
//!
//! [`AuthFlow`] wires the credential store and the password hasher into the
//! register and login operations. It is HTTP-agnostic: handlers translate
//! its [`AuthError`] results into responses and drive the session
//! transitions separately.

use std::sync::Arc;

use tracing::{info, warn};

use crate::auth::password::{CredentialHasher, HashError};
use crate::database::CredentialStore;
use crate::error::{AuthError, StoreError};
use crate::models::{NewUser, User};

/// Registration and credential-verification service
pub struct AuthFlow<S> {
    store: Arc<S>,
    hasher: CredentialHasher,
}

impl<S: CredentialStore> AuthFlow<S> {
    /// Create a new auth flow over a credential store
    pub fn new(store: Arc<S>, hasher: CredentialHasher) -> Self {
        Self { store, hasher }
    }

    /// Register a new user
    ///
    /// Hashes the password and inserts the record in one atomic store
    /// operation: a uniqueness conflict surfaces as
    /// [`AuthError::DuplicateIdentity`] with nothing partially committed,
    /// and the plaintext is dropped either way.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        require_field("username", username)?;
        require_field("email", email)?;
        require_field("password", password)?;

        let password_hash = self
            .hasher
            .hash(password)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        let new_user = NewUser::new(username, email, password_hash);
        match self.store.insert_user(&new_user).await {
            Ok(user) => {
                info!(username = %user.username, user_id = user.id, "user registered");
                Ok(user)
            }
            Err(StoreError::Duplicate) => Err(AuthError::DuplicateIdentity),
            Err(e) => Err(e.into()),
        }
    }

    /// Verify a (username, password) pair against the store
    ///
    /// Unknown username and wrong password are indistinguishable to the
    /// caller: both are [`AuthError::LoginFailed`]. An unreadable stored
    /// hash is logged as an operational anomaly and surfaced as
    /// [`AuthError::CorruptCredential`]; the HTTP layer renders it exactly
    /// like a failed login.
    pub async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        require_field("username", username)?;
        require_field("password", password)?;

        let Some(user) = self.store.find_by_username(username).await? else {
            warn!(username, "login attempt for unknown username");
            return Err(AuthError::LoginFailed);
        };

        match self.hasher.verify(password, &user.password_hash) {
            Ok(true) => Ok(user),
            Ok(false) => {
                warn!(username = %user.username, "login attempt with wrong password");
                Err(AuthError::LoginFailed)
            }
            Err(HashError::CorruptHash(reason)) => {
                warn!(
                    username = %user.username,
                    %reason,
                    "stored password hash is unreadable"
                );
                Err(AuthError::CorruptCredential)
            }
            Err(e) => Err(AuthError::Internal(e.to_string())),
        }
    }
}

/// Reject missing or empty form fields
fn require_field(field: &'static str, value: &str) -> Result<(), AuthError> {
    if value.trim().is_empty() {
        return Err(AuthError::Validation { field });
    }
    Ok(())
}
