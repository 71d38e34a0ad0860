//! Repository port traits.

use async_trait::async_trait;

use chrono::{DateTime, Utc};

use jojo_domain::{Character, CharacterId, PlayStateUpdate, User, UserId};

use super::RepoError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn get(&self, id: UserId) -> Result<Option<User>, RepoError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
    /// True if any account already uses this username or this email.
    async fn exists_with_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<bool, RepoError>;
    async fn save(&self, user: &User) -> Result<(), RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CharacterRepo: Send + Sync {
    /// Load a character together with its Stand.
    async fn get(&self, id: CharacterId) -> Result<Option<Character>, RepoError>;
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Character>, RepoError>;
    /// Insert a new character together with its Stand.
    async fn create(&self, character: &Character) -> Result<(), RepoError>;
    /// Write only the supplied play-state fields and `updated_at`, then
    /// return the stored character. `NotFound` if the row is gone.
    async fn update_play_state(
        &self,
        id: CharacterId,
        update: &PlayStateUpdate,
        updated_at: DateTime<Utc>,
    ) -> Result<Character, RepoError>;
    /// Delete a character and its Stand.
    async fn delete(&self, id: CharacterId) -> Result<(), RepoError>;
}
