//! Application error types for login-gate
//!
//! This module defines common error types used throughout the application.
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Authentication and request-orchestration errors
///
/// User-facing messages here are deliberately generic: the same `LoginFailed`
/// is produced for an unknown username and a wrong password, and the
/// `DuplicateIdentity` message never reveals which field collided.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A required form field is missing or empty
    #[error("{field} is required")]
    Validation {
        /// Name of the offending field
        field: &'static str,
    },

    /// Bad credentials: unknown username or wrong password
    #[error("Login failed")]
    LoginFailed,

    /// The caller already holds an authenticated session
    #[error("Already logged in.")]
    AlreadyAuthenticated,

    /// Registration conflicts with an existing username or email
    #[error("Username or email already in use.")]
    DuplicateIdentity,

    /// The requested `next` target resolves off-origin
    #[error("Unsafe redirect target")]
    UnsafeRedirect,

    /// A stored password hash could not be parsed
    #[error("Stored credential is unreadable")]
    CorruptCredential,

    /// Session state could not be read or written
    #[error("Session error: {0}")]
    Session(String),

    /// Credential store failure
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Credential-store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite error
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The database worker connection failed
    #[error("Database connection error: {0}")]
    Connection(String),

    /// Uniqueness violation on username or email
    #[error("Duplicate username or email")]
    Duplicate,

    /// Record not found
    #[error("Record not found")]
    NotFound,
}

impl From<tokio_rusqlite::Error> for StoreError {
    fn from(err: tokio_rusqlite::Error) -> Self {
        match err {
            tokio_rusqlite::Error::Rusqlite(e) => StoreError::Sqlite(e),
            other => StoreError::Connection(other.to_string()),
        }
    }
}
