//! Account registration and login.

use std::sync::Arc;

use jojo_domain::User;

use crate::infrastructure::ports::{
    ClockPort, PasswordHasherPort, RepoError, SessionPort, SessionToken, UserRepo,
};

use super::validation::{require_max_length, require_non_empty, ValidationError};

pub const MAX_USERNAME_LEN: usize = 64;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("Username or email already taken")]
    AlreadyTaken,
    /// Unknown email and wrong password share one message.
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
    /// The blocking hash task panicked or was cancelled.
    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

impl From<ValidationError> for AuthError {
    fn from(e: ValidationError) -> Self {
        AuthError::InvalidInput(e.to_string())
    }
}

/// A signed-in account and its bearer session.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub session: SessionToken,
}

pub struct AuthUseCases {
    users: Arc<dyn UserRepo>,
    passwords: Arc<dyn PasswordHasherPort>,
    sessions: Arc<dyn SessionPort>,
    clock: Arc<dyn ClockPort>,
}

impl AuthUseCases {
    pub fn new(
        users: Arc<dyn UserRepo>,
        passwords: Arc<dyn PasswordHasherPort>,
        sessions: Arc<dyn SessionPort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            users,
            passwords,
            sessions,
            clock,
        }
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, AuthError> {
        require_non_empty(username, "Username")?;
        require_max_length(username.trim(), MAX_USERNAME_LEN, "Username")?;
        require_non_empty(email, "Email")?;
        require_non_empty(password, "Password")?;

        let username = username.trim();
        let email = email.trim();
        if self
            .users
            .exists_with_username_or_email(username, email)
            .await?
        {
            tracing::info!(username = %username, "Registration rejected, identity taken");
            return Err(AuthError::AlreadyTaken);
        }

        let hash = self.hash_password(password).await?;
        let user = User::new(username, email, hash, self.clock.now())
            .map_err(|e| AuthError::InvalidInput(e.to_string()))?;

        // A concurrent registration can still win the unique index.
        self.users.save(&user).await.map_err(|e| {
            if e.is_constraint() {
                AuthError::AlreadyTaken
            } else {
                AuthError::Repo(e)
            }
        })?;

        let session = self.sessions.issue(user.id);
        tracing::info!(user_id = %user.id, "User registered");
        Ok(AuthSession { user, session })
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let Some(user) = self.users.find_by_email(email.trim()).await? else {
            tracing::info!("Login rejected, unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        if !self
            .verify_password(password, user.password_hash.clone())
            .await?
        {
            tracing::info!(user_id = %user.id, "Login rejected, wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let session = self.sessions.issue(user.id);
        tracing::info!(user_id = %user.id, "User logged in");
        Ok(AuthSession { user, session })
    }

    /// Hashing is CPU-bound and runs on the blocking pool, off the async workers.
    async fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let passwords = self.passwords.clone();
        let password = password.to_string();
        tokio::task::spawn_blocking(move || passwords.hash(&password))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))
    }

    async fn verify_password(&self, password: &str, stored: String) -> Result<bool, AuthError> {
        let passwords = self.passwords.clone();
        let password = password.to_string();
        tokio::task::spawn_blocking(move || passwords.verify(&password, &stored))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))
    }
}
