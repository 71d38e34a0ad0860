//! SQLite-backed account storage.

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use jojo_domain::{User, UserId};

use super::{map_write_error, parse_timestamp};
use crate::infrastructure::ports::{RepoError, UserRepo};

pub struct SqliteUserRepo {
    pool: SqlitePool,
}

impl SqliteUserRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_user(row: &SqliteRow) -> Result<User, RepoError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| RepoError::database("users", e))?;
        let created_at: String = row
            .try_get("created_at")
            .map_err(|e| RepoError::database("users", e))?;

        Ok(User {
            id: id.parse::<UserId>().map_err(RepoError::serialization)?,
            username: row
                .try_get("username")
                .map_err(|e| RepoError::database("users", e))?,
            email: row
                .try_get("email")
                .map_err(|e| RepoError::database("users", e))?,
            password_hash: row
                .try_get("password_hash")
                .map_err(|e| RepoError::database("users", e))?,
            created_at: parse_timestamp(&created_at)?,
        })
    }
}

#[async_trait]
impl UserRepo for SqliteUserRepo {
    async fn get(&self, id: UserId) -> Result<Option<User>, RepoError> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("get_user", e))?;
        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let row = sqlx::query("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("find_user_by_email", e))?;
        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn exists_with_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<bool, RepoError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ? OR email = ?")
                .bind(username)
                .bind(email)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| RepoError::database("user_exists", e))?;
        Ok(count > 0)
    }

    async fn save(&self, user: &User) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash, created_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                username = excluded.username,
                email = excluded.email,
                password_hash = excluded.password_hash
            "#,
        )
        .bind(user.id.to_string())
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error("save_user", e))?;
        Ok(())
    }
}
