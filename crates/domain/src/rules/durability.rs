//! Durability-derived max stress and special armor.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{CreationRules, Grade};

/// Table entry for one durability grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurabilityEffect {
    pub stress_modifier: i32,
    pub special_armor: u32,
}

impl DurabilityEffect {
    /// Used when the durability grade is absent or unrecognized.
    pub const NONE: DurabilityEffect = DurabilityEffect {
        stress_modifier: 0,
        special_armor: 0,
    };

    pub fn for_grade(grade: Grade) -> Self {
        let (stress_modifier, special_armor) = match grade {
            Grade::S => (4, 4),
            Grade::A => (3, 3),
            Grade::B => (2, 2),
            Grade::C => (1, 1),
            Grade::D => (0, 1),
            Grade::F => (-3, 0),
        };
        Self {
            stress_modifier,
            special_armor,
        }
    }

    pub fn apply(self, rules: &CreationRules) -> DurabilityEffects {
        DurabilityEffects {
            max_stress: rules.max_stress_for(self.stress_modifier),
            special_armor: self.special_armor,
        }
    }
}

/// Secondary attributes fixed at creation from the Stand's durability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DurabilityEffects {
    pub max_stress: u32,
    pub special_armor: u32,
}

/// Derive max stress and special armor from a durability grade.
///
/// Never fails: a character without a Stand gets the base values.
pub fn derive_durability_effects(grade: Option<Grade>, rules: &CreationRules) -> DurabilityEffects {
    grade
        .map(DurabilityEffect::for_grade)
        .unwrap_or(DurabilityEffect::NONE)
        .apply(rules)
}

/// Same as [`derive_durability_effects`] for a value that has not been shaped
/// into a [`Grade`]. Unrecognized values fall back to the defaults.
pub fn derive_durability_effects_from_value(
    value: Option<&Value>,
    rules: &CreationRules,
) -> DurabilityEffects {
    derive_durability_effects(value.and_then(Grade::from_value), rules)
}
