//! REST request bodies.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Distinguishes an explicit `null` from an absent key.
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

// =============================================================================
// Accounts
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// =============================================================================
// Characters
// =============================================================================

/// Stand payload on character creation.
///
/// Grades are kept as raw JSON so the rules engine can reject anything that
/// is not a grade symbol, naming the offending stat.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StandRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ability: Option<String>,
    #[serde(default)]
    pub power: Value,
    #[serde(default)]
    pub speed: Value,
    #[serde(default)]
    pub range: Value,
    #[serde(default)]
    pub durability: Value,
    #[serde(default)]
    pub precision: Value,
    #[serde(default)]
    pub potential: Value,
}

/// Character creation body.
///
/// Every top-level key that is not a narrative field or `stand` lands in
/// `actions` and is handed to the action dot validator as-is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCharacterRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub vice: Option<String>,
    #[serde(default)]
    pub vice_purveyor: Option<String>,
    #[serde(default)]
    pub friends: Option<String>,
    #[serde(default)]
    pub rivals: Option<String>,
    #[serde(default)]
    pub stand: Option<StandRequest>,
    #[serde(flatten)]
    pub actions: Map<String, Value>,
}

/// Partial play-state update. Absent keys are left unchanged; `"harm": null`
/// clears harm.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCharacterRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stress: Option<u32>,
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub harm: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_armor: Option<u32>,
}
