//! REST response bodies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use jojo_domain::{ActionDots, Grade};

/// Body used for every plain acknowledgement and every error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// =============================================================================
// Accounts
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub message: String,
    pub user: UserData,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

// =============================================================================
// Characters
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandData {
    pub id: Uuid,
    pub character_id: Uuid,
    pub name: Option<String>,
    pub ability: Option<String>,
    pub power: Grade,
    pub speed: Grade,
    pub range: Grade,
    pub durability: Grade,
    pub precision: Grade,
    pub potential: Grade,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterData {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub origin: Option<String>,
    pub vice: Option<String>,
    pub vice_purveyor: Option<String>,
    pub friends: Option<String>,
    pub rivals: Option<String>,
    #[serde(flatten)]
    pub actions: ActionDots,
    pub stand: Option<StandData>,
    pub stress: u32,
    pub max_stress: u32,
    pub harm: Option<String>,
    pub special_armor: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCharacterResponse {
    pub message: String,
    pub character: CharacterData,
}
