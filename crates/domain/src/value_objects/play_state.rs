//! Play-state updates applied to a character between sessions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// How a partial update may change special armor.
///
/// Special armor starts at the durability-derived value. Whether later
/// updates may diverge from it is a table decision, so it is configured
/// rather than fixed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialArmorPolicy {
    /// Any non-negative value is accepted.
    #[default]
    Overwrite,
    /// Only the durability-derived value is accepted.
    Locked,
}

impl fmt::Display for SpecialArmorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecialArmorPolicy::Overwrite => write!(f, "overwrite"),
            SpecialArmorPolicy::Locked => write!(f, "locked"),
        }
    }
}

impl FromStr for SpecialArmorPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "overwrite" => Ok(SpecialArmorPolicy::Overwrite),
            "locked" | "lock" => Ok(SpecialArmorPolicy::Locked),
            _ => Err(DomainError::parse(format!(
                "Unknown special armor policy: {}",
                s
            ))),
        }
    }
}

/// Fields a player may change on an existing character.
///
/// `None` leaves the field alone. For `harm`, `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayStateUpdate {
    pub stress: Option<u32>,
    pub harm: Option<Option<String>>,
    pub special_armor: Option<u32>,
}

impl PlayStateUpdate {
    pub fn is_empty(&self) -> bool {
        self.stress.is_none() && self.harm.is_none() && self.special_armor.is_none()
    }
}
