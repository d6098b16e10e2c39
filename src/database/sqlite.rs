//! SQLite implementation of the credential store
//!
//! This module provides a SQLite-based implementation of the
//! [`CredentialStore`] trait using rusqlite and tokio-rusqlite for async
//! operations.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::OptionalExtension;
use tokio_rusqlite::Connection;

use super::migrations::CREATE_SCHEMA;
use super::CredentialStore;
use crate::error::StoreError;
use crate::models::{NewUser, User};

/// SQLite credential store
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Create a new SQLite store
    ///
    /// Use `:memory:` for an in-memory database or a file path for
    /// persistent storage.
    pub async fn new(path: &str) -> Result<Self, StoreError> {
        let conn = Connection::open(path).await?;

        // Run migrations
        conn.call(|conn| {
            conn.execute_batch(CREATE_SCHEMA)?;
            Ok(())
        })
        .await?;

        Ok(Self { conn })
    }

    /// Create a new in-memory store (useful for testing)
    pub async fn in_memory() -> Result<Self, StoreError> {
        Self::new(":memory:").await
    }
}

#[async_trait]
impl CredentialStore for SqliteStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let username = username.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT id, username, email, password_hash, created_at
                    FROM users
                    WHERE username = ?1
                    "#,
                )?;

                let user = stmt.query_row([&username], map_user_row).optional()?;
                Ok(user)
            })
            .await
            .map_err(Into::into)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT id, username, email, password_hash, created_at
                    FROM users
                    WHERE id = ?1
                    "#,
                )?;

                let user = stmt.query_row([id], map_user_row).optional()?;
                Ok(user)
            })
            .await
            .map_err(Into::into)
    }

    async fn insert_user(&self, new_user: &NewUser) -> Result<User, StoreError> {
        let username = new_user.username.clone();
        let email = new_user.email.clone();
        let password_hash = new_user.password_hash.clone();

        let inserted = self
            .conn
            .call(move |conn| {
                let result = conn.execute(
                    r#"
                    INSERT INTO users (username, email, password_hash)
                    VALUES (?1, ?2, ?3)
                    "#,
                    rusqlite::params![username, email, password_hash],
                );

                match result {
                    Ok(_) => {
                        let id = conn.last_insert_rowid();
                        let user = conn.query_row(
                            r#"
                            SELECT id, username, email, password_hash, created_at
                            FROM users
                            WHERE id = ?1
                            "#,
                            [id],
                            map_user_row,
                        )?;
                        Ok(Ok(user))
                    }
                    Err(e) if is_unique_violation(&e) => Ok(Err(StoreError::Duplicate)),
                    Err(e) => Err(e.into()),
                }
            })
            .await?;

        inserted
    }
}

/// Map a SELECT row to a [`User`]
fn map_user_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        created_at: parse_datetime(row.get::<_, Option<String>>(4)?),
    })
}

/// Check whether a rusqlite error is a UNIQUE constraint violation
fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

/// Parse a SQLite datetime string (CURRENT_TIMESTAMP or RFC 3339)
fn parse_datetime(value: Option<String>) -> Option<DateTime<Utc>> {
    let value = value?;
    if let Ok(dt) = DateTime::parse_from_rfc3339(&value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&value, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}
