//! Credential store for login-gate
//!
//! This module defines the credential store trait and its SQLite
//! implementation. The store owns the durable mapping from username to
//! user record and enforces uniqueness on username and email.

pub mod migrations;
pub mod sqlite;

pub use sqlite::SqliteStore;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::{NewUser, User};

/// Credential store trait
///
/// Each operation is a single atomic round-trip: an insert either fully
/// commits a new row or fails with [`StoreError::Duplicate`] leaving nothing
/// behind. It uses `async_trait` for async methods and `mockall::automock`
/// for testing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Look up a user by username
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Look up a user by id
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError>;

    /// Insert a new user record
    ///
    /// Fails with [`StoreError::Duplicate`] if the username or email is
    /// already taken.
    async fn insert_user(&self, new_user: &NewUser) -> Result<User, StoreError>;
}
