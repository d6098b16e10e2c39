//! User-related domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user row as stored in the credential store
///
/// `password_hash` is an opaque PHC-format string. It is never compared by
/// equality against a plaintext value; only `auth::password` may interpret it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Stable unique id (primary key)
    pub id: i64,

    /// Unique, non-empty username
    pub username: String,

    /// Unique, non-empty email address
    pub email: String,

    /// Argon2id hash of the password (PHC format)
    pub password_hash: String,

    /// When the record was created
    pub created_at: Option<DateTime<Utc>>,
}

/// Insert shape for a new user record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

impl NewUser {
    /// Create a new insert shape
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password_hash: password_hash.into(),
        }
    }
}

/// The identity bound to the current request
///
/// Handlers read this instead of any implicit global; it is reconstructed per
/// request from the session and the credential store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// No authenticated user on this session
    Anonymous,

    /// An authenticated user, re-resolved against the store
    Authenticated(UserView),
}

impl Identity {
    /// True if no user is authenticated
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Identity::Anonymous)
    }

    /// The authenticated user view, if any
    pub fn user(&self) -> Option<&UserView> {
        match self {
            Identity::Anonymous => None,
            Identity::Authenticated(user) => Some(user),
        }
    }
}

/// User data exposed to request handlers and views
///
/// Deliberately excludes the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserView {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}
