//! SQLite persistence for accounts and characters.

mod character_repo;
mod user_repo;

pub use character_repo::SqliteCharacterRepo;
pub use user_repo::SqliteUserRepo;

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use jojo_domain::Action;

use crate::infrastructure::ports::RepoError;

/// Open the database and make sure the schema exists.
pub async fn connect(database_url: &str) -> Result<SqlitePool, RepoError> {
    let pool = SqlitePool::connect(database_url)
        .await
        .map_err(|e| RepoError::database("connect", e))?;
    ensure_schema(&pool).await?;
    Ok(pool)
}

/// Private in-memory database. A single connection keeps every query on the
/// same database.
pub async fn connect_in_memory() -> Result<SqlitePool, RepoError> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .map_err(|e| RepoError::database("connect", e))?;
    ensure_schema(&pool).await?;
    Ok(pool)
}

/// Create tables and indexes if they do not exist.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), RepoError> {
    let action_columns: String = Action::ALL
        .iter()
        .map(|a| format!("    {} INTEGER NOT NULL DEFAULT 0,\n", a.as_str()))
        .collect();

    let statements = [
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#
        .to_string(),
        format!(
            r#"
        CREATE TABLE IF NOT EXISTS characters (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL REFERENCES users(id),
            name TEXT NOT NULL,
            origin TEXT,
            vice TEXT,
            vice_purveyor TEXT,
            friends TEXT,
            rivals TEXT,
        {action_columns}
            stress INTEGER NOT NULL DEFAULT 0,
            max_stress INTEGER NOT NULL,
            harm TEXT,
            special_armor INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#
        ),
        "CREATE INDEX IF NOT EXISTS idx_characters_user_id ON characters(user_id)".to_string(),
        r#"
        CREATE TABLE IF NOT EXISTS stands (
            id TEXT PRIMARY KEY,
            character_id TEXT NOT NULL UNIQUE REFERENCES characters(id) ON DELETE CASCADE,
            name TEXT,
            ability TEXT,
            power TEXT NOT NULL,
            speed TEXT NOT NULL,
            "range" TEXT NOT NULL,
            durability TEXT NOT NULL,
            precision TEXT NOT NULL,
            potential TEXT NOT NULL
        )
        "#
        .to_string(),
    ];

    for statement in statements {
        sqlx::query(&statement)
            .execute(pool)
            .await
            .map_err(|e| RepoError::database("ensure_schema", e))?;
    }
    Ok(())
}

/// Map a sqlx error, surfacing constraint failures separately.
pub(crate) fn map_write_error(operation: &'static str, error: sqlx::Error) -> RepoError {
    if let sqlx::Error::Database(db) = &error {
        if db.is_unique_violation() || db.is_foreign_key_violation() {
            return RepoError::constraint(db.message());
        }
    }
    RepoError::database(operation, error)
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, RepoError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepoError::serialization(format!("invalid timestamp {}: {}", raw, e)))
}

pub(crate) fn to_u32(column: &str, value: i64) -> Result<u32, RepoError> {
    u32::try_from(value)
        .map_err(|_| RepoError::serialization(format!("{} out of range: {}", column, value)))
}
