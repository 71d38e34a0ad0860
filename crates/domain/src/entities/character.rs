//! Character entity - a player's character and its optional Stand
//!
//! Characters are created once through the validated creation path, after
//! which only play-state fields (stress, harm, special armor) change.

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::ids::{CharacterId, StandId, UserId};
use crate::rules::{
    derive_durability_effects, ActionDots, CreationRules, DurabilityEffects, StandStats,
};
use crate::value_objects::{PlayStateUpdate, SpecialArmorPolicy};

/// Narrative fields chosen at creation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterProfile {
    pub name: String,
    pub origin: Option<String>,
    pub vice: Option<String>,
    pub vice_purveyor: Option<String>,
    pub friends: Option<String>,
    pub rivals: Option<String>,
}

/// A character's Stand, owned by exactly one character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stand {
    pub id: StandId,
    pub name: Option<String>,
    pub ability: Option<String>,
    pub stats: StandStats,
}

impl Stand {
    pub fn new(stats: StandStats) -> Self {
        Self {
            id: StandId::new(),
            name: None,
            ability: None,
            stats,
        }
    }

    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    pub fn with_ability(mut self, ability: Option<String>) -> Self {
        self.ability = ability;
        self
    }
}

/// A player character
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Character {
    pub id: CharacterId,
    pub user_id: UserId,

    // Narrative
    pub name: String,
    pub origin: Option<String>,
    pub vice: Option<String>,
    pub vice_purveyor: Option<String>,
    pub friends: Option<String>,
    pub rivals: Option<String>,

    pub actions: ActionDots,
    pub stand: Option<Stand>,

    // Play state
    pub stress: u32,
    pub max_stress: u32,
    pub harm: Option<String>,
    pub special_armor: u32,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Character {
    /// Build a freshly created character from already-validated parts.
    ///
    /// Stress starts at zero; max stress and special armor come from the
    /// durability effects.
    pub fn new(
        user_id: UserId,
        profile: CharacterProfile,
        actions: ActionDots,
        stand: Option<Stand>,
        effects: DurabilityEffects,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let name = profile.name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("Character name cannot be empty"));
        }

        Ok(Self {
            id: CharacterId::new(),
            user_id,
            name,
            origin: profile.origin,
            vice: profile.vice,
            vice_purveyor: profile.vice_purveyor,
            friends: profile.friends,
            rivals: profile.rivals,
            actions,
            stand,
            stress: 0,
            max_stress: effects.max_stress,
            harm: None,
            special_armor: effects.special_armor,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }

    /// Special armor as derived from the Stand's durability.
    pub fn derived_effects(&self, rules: &CreationRules) -> DurabilityEffects {
        derive_durability_effects(self.stand.as_ref().map(|s| s.stats.durability), rules)
    }

    /// Check a partial play-state update against the special armor policy.
    ///
    /// Under [`SpecialArmorPolicy::Locked`] a special armor value that differs
    /// from the durability-derived one is rejected. The update itself is
    /// written field by field by the store, so only the supplied keys change.
    pub fn check_play_state(
        &self,
        update: &PlayStateUpdate,
        policy: SpecialArmorPolicy,
        rules: &CreationRules,
    ) -> Result<(), DomainError> {
        if let (Some(armor), SpecialArmorPolicy::Locked) = (update.special_armor, policy) {
            let derived = self.derived_effects(rules).special_armor;
            if armor != derived {
                return Err(DomainError::constraint(format!(
                    "Special armor is locked to {} by the Stand's durability",
                    derived
                )));
            }
        }
        Ok(())
    }
}
