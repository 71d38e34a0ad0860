//! Character creation rules.
//!
//! Pure evaluation only: every function here takes one input snapshot and
//! returns a value or a rejection. Nothing touches storage, so the engine may
//! call these from any number of concurrent requests.
//!
//! - [`validate_stand_stats`] - Stand grade point-buy budget
//! - [`validate_action_dots`] - action dot budget and per-action cap
//! - [`derive_durability_effects`] - durability grade to max stress / special armor
//!
//! The budgets themselves live in [`CreationRules`] so a rules revision
//! changes one value instead of scattered literals.

mod actions;
mod dice;
mod durability;
mod grade;
mod stand_stats;

use serde::{Deserialize, Serialize};

pub use actions::{validate_action_dots, Action, ActionDots, ActionValidationError};
pub use dice::{DicePool, PoolRoll, RollOutcome, MAX_ROLL_DICE};
pub use durability::{
    derive_durability_effects, derive_durability_effects_from_value, DurabilityEffect,
    DurabilityEffects,
};
pub use grade::Grade;
pub use stand_stats::{
    validate_stand_stats, ProposedStandStats, StandField, StandStats, StatValidationError,
};

/// Budgets, caps and base values enforced at character creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreationRules {
    /// Maximum total grade cost across the six Stand stats.
    pub stand_point_budget: u32,
    /// Maximum total dots across the twelve actions.
    pub action_dot_budget: u32,
    /// Maximum dots in any single action.
    pub action_dot_cap: u32,
    /// Max stress before the durability modifier is applied.
    pub base_stress: i32,
}

impl CreationRules {
    pub const DEFAULT_STAND_POINT_BUDGET: u32 = 10;
    pub const DEFAULT_ACTION_DOT_BUDGET: u32 = 7;
    pub const DEFAULT_ACTION_DOT_CAP: u32 = 2;
    pub const DEFAULT_BASE_STRESS: i32 = 9;

    pub fn new() -> Self {
        Self {
            stand_point_budget: Self::DEFAULT_STAND_POINT_BUDGET,
            action_dot_budget: Self::DEFAULT_ACTION_DOT_BUDGET,
            action_dot_cap: Self::DEFAULT_ACTION_DOT_CAP,
            base_stress: Self::DEFAULT_BASE_STRESS,
        }
    }

    /// Max stress for a durability modifier, floored at zero.
    pub fn max_stress_for(&self, stress_modifier: i32) -> u32 {
        let max_stress = self.base_stress.saturating_add(stress_modifier).max(0);
        u32::try_from(max_stress).unwrap_or(0)
    }
}

impl Default for CreationRules {
    fn default() -> Self {
        Self::new()
    }
}
