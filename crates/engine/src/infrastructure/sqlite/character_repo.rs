//! SQLite-backed character storage.
//!
//! A character row carries the narrative fields, one column per action and
//! the play state. The Stand lives in `stands`, at most one per character,
//! and is always written and removed in the same transaction as its owner.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use jojo_domain::{
    Action, ActionDots, Character, CharacterId, Grade, PlayStateUpdate, Stand, StandId,
    StandStats, UserId,
};

use super::{map_write_error, parse_timestamp, to_u32};
use crate::infrastructure::ports::{CharacterRepo, RepoError};

const SELECT_WITH_STAND: &str = r#"
    SELECT c.*,
        s.id AS stand_id,
        s.name AS stand_name,
        s.ability AS stand_ability,
        s.power AS stand_power,
        s.speed AS stand_speed,
        s."range" AS stand_range,
        s.durability AS stand_durability,
        s.precision AS stand_precision,
        s.potential AS stand_potential
    FROM characters c
    LEFT JOIN stands s ON s.character_id = c.id
"#;

pub struct SqliteCharacterRepo {
    pool: SqlitePool,
}

impl SqliteCharacterRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn insert_sql() -> String {
        let mut columns = vec![
            "id",
            "user_id",
            "name",
            "origin",
            "vice",
            "vice_purveyor",
            "friends",
            "rivals",
        ];
        columns.extend(Action::ALL.iter().map(|a| a.as_str()));
        columns.extend([
            "stress",
            "max_stress",
            "harm",
            "special_armor",
            "created_at",
            "updated_at",
        ]);

        let placeholders = vec!["?"; columns.len()].join(", ");
        format!(
            "INSERT INTO characters ({}) VALUES ({})",
            columns.join(", "),
            placeholders
        )
    }

    /// `SET` clause naming only the supplied fields, always ending with
    /// `updated_at`. Bind order follows the field order here.
    fn play_state_assignments(update: &PlayStateUpdate) -> String {
        let mut assignments = Vec::new();
        if update.stress.is_some() {
            assignments.push("stress = ?");
        }
        if update.harm.is_some() {
            assignments.push("harm = ?");
        }
        if update.special_armor.is_some() {
            assignments.push("special_armor = ?");
        }
        assignments.push("updated_at = ?");
        assignments.join(", ")
    }

    fn row_to_character(row: &SqliteRow) -> Result<Character, RepoError> {
        let get_str = |col: &str| -> Result<String, RepoError> {
            row.try_get(col).map_err(|e| RepoError::database("characters", e))
        };
        let get_opt = |col: &str| -> Result<Option<String>, RepoError> {
            row.try_get(col).map_err(|e| RepoError::database("characters", e))
        };
        let get_u32 = |col: &str| -> Result<u32, RepoError> {
            let value: i64 = row
                .try_get(col)
                .map_err(|e| RepoError::database("characters", e))?;
            to_u32(col, value)
        };

        let mut actions = ActionDots::default();
        for action in Action::ALL {
            actions.set(action, get_u32(action.as_str())?);
        }

        let stand = match get_opt("stand_id")? {
            Some(stand_id) => {
                let grade = |col: &str| -> Result<Grade, RepoError> {
                    get_str(col)?.parse().map_err(RepoError::serialization)
                };
                Some(Stand {
                    id: stand_id
                        .parse::<StandId>()
                        .map_err(RepoError::serialization)?,
                    name: get_opt("stand_name")?,
                    ability: get_opt("stand_ability")?,
                    stats: StandStats {
                        power: grade("stand_power")?,
                        speed: grade("stand_speed")?,
                        range: grade("stand_range")?,
                        durability: grade("stand_durability")?,
                        precision: grade("stand_precision")?,
                        potential: grade("stand_potential")?,
                    },
                })
            }
            None => None,
        };

        Ok(Character {
            id: get_str("id")?
                .parse::<CharacterId>()
                .map_err(RepoError::serialization)?,
            user_id: get_str("user_id")?
                .parse::<UserId>()
                .map_err(RepoError::serialization)?,
            name: get_str("name")?,
            origin: get_opt("origin")?,
            vice: get_opt("vice")?,
            vice_purveyor: get_opt("vice_purveyor")?,
            friends: get_opt("friends")?,
            rivals: get_opt("rivals")?,
            actions,
            stand,
            stress: get_u32("stress")?,
            max_stress: get_u32("max_stress")?,
            harm: get_opt("harm")?,
            special_armor: get_u32("special_armor")?,
            created_at: parse_timestamp(&get_str("created_at")?)?,
            updated_at: parse_timestamp(&get_str("updated_at")?)?,
        })
    }
}

#[async_trait]
impl CharacterRepo for SqliteCharacterRepo {
    async fn get(&self, id: CharacterId) -> Result<Option<Character>, RepoError> {
        let row = sqlx::query(&format!("{SELECT_WITH_STAND} WHERE c.id = ?"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("get_character", e))?;
        row.as_ref().map(Self::row_to_character).transpose()
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Character>, RepoError> {
        let rows = sqlx::query(&format!(
            "{SELECT_WITH_STAND} WHERE c.user_id = ? ORDER BY c.created_at, c.id"
        ))
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("list_characters", e))?;
        rows.iter().map(Self::row_to_character).collect()
    }

    async fn create(&self, character: &Character) -> Result<(), RepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("create_character", e))?;

        let sql = Self::insert_sql();
        let mut query = sqlx::query(&sql)
            .bind(character.id.to_string())
            .bind(character.user_id.to_string())
            .bind(&character.name)
            .bind(&character.origin)
            .bind(&character.vice)
            .bind(&character.vice_purveyor)
            .bind(&character.friends)
            .bind(&character.rivals);
        for action in Action::ALL {
            query = query.bind(i64::from(character.actions.get(action)));
        }
        query
            .bind(i64::from(character.stress))
            .bind(i64::from(character.max_stress))
            .bind(&character.harm)
            .bind(i64::from(character.special_armor))
            .bind(character.created_at.to_rfc3339())
            .bind(character.updated_at.to_rfc3339())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_write_error("create_character", e))?;

        if let Some(stand) = &character.stand {
            sqlx::query(
                r#"
                INSERT INTO stands
                    (id, character_id, name, ability, power, speed, "range", durability, precision, potential)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(stand.id.to_string())
            .bind(character.id.to_string())
            .bind(&stand.name)
            .bind(&stand.ability)
            .bind(stand.stats.power.as_str())
            .bind(stand.stats.speed.as_str())
            .bind(stand.stats.range.as_str())
            .bind(stand.stats.durability.as_str())
            .bind(stand.stats.precision.as_str())
            .bind(stand.stats.potential.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_write_error("create_stand", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| RepoError::database("create_character", e))?;
        Ok(())
    }

    async fn update_play_state(
        &self,
        id: CharacterId,
        update: &PlayStateUpdate,
        updated_at: DateTime<Utc>,
    ) -> Result<Character, RepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("update_play_state", e))?;

        let sql = format!(
            "UPDATE characters SET {} WHERE id = ?",
            Self::play_state_assignments(update)
        );
        let mut query = sqlx::query(&sql);
        if let Some(stress) = update.stress {
            query = query.bind(i64::from(stress));
        }
        if let Some(harm) = &update.harm {
            query = query.bind(harm.clone());
        }
        if let Some(armor) = update.special_armor {
            query = query.bind(i64::from(armor));
        }
        let result = query
            .bind(updated_at.to_rfc3339())
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepoError::database("update_play_state", e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("Character", id));
        }

        let row = sqlx::query(&format!("{SELECT_WITH_STAND} WHERE c.id = ?"))
            .bind(id.to_string())
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| RepoError::database("update_play_state", e))?;
        let character = Self::row_to_character(&row)?;

        tx.commit()
            .await
            .map_err(|e| RepoError::database("update_play_state", e))?;
        Ok(character)
    }

    async fn delete(&self, id: CharacterId) -> Result<(), RepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("delete_character", e))?;

        sqlx::query("DELETE FROM stands WHERE character_id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepoError::database("delete_character", e))?;

        let result = sqlx::query("DELETE FROM characters WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepoError::database("delete_character", e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("Character", id));
        }

        tx.commit()
            .await
            .map_err(|e| RepoError::database("delete_character", e))?;
        Ok(())
    }
}
