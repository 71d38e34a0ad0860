//! User entity - an account that owns characters

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::ids::UserId;

/// A registered account.
///
/// The password hash is opaque to the domain; hashing and verification live
/// behind the engine's password port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new account. Username and email are trimmed and must be non-empty;
    /// email must contain `@`.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let username = username.into().trim().to_string();
        let email = email.into().trim().to_string();

        if username.is_empty() {
            return Err(DomainError::validation("Username cannot be empty"));
        }
        if email.is_empty() {
            return Err(DomainError::validation("Email cannot be empty"));
        }
        if !email.contains('@') {
            return Err(DomainError::validation("Email must contain '@'"));
        }

        Ok(Self {
            id: UserId::new(),
            username,
            email,
            password_hash: password_hash.into(),
            created_at: now,
        })
    }
}
