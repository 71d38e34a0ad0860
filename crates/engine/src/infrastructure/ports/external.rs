//! Credential ports: password hashing and bearer sessions.

use chrono::{DateTime, Utc};

use jojo_domain::UserId;

use super::SessionError;

#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasherPort: Send + Sync {
    /// Hash a password into a self-describing string suitable for storage.
    fn hash(&self, password: &str) -> String;
    /// Check a password against a stored hash. Malformed hashes never verify.
    fn verify(&self, password: &str, stored: &str) -> bool;
}

/// A freshly issued bearer credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[cfg_attr(test, mockall::automock)]
pub trait SessionPort: Send + Sync {
    fn issue(&self, user_id: UserId) -> SessionToken;
    fn verify(&self, token: &str) -> Result<UserId, SessionError>;
}
