//! Stand stat block point-buy validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{CreationRules, Grade};

/// The six Stand stats, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StandField {
    Power,
    Speed,
    Range,
    Durability,
    Precision,
    Potential,
}

impl StandField {
    pub const ALL: [StandField; 6] = [
        StandField::Power,
        StandField::Speed,
        StandField::Range,
        StandField::Durability,
        StandField::Precision,
        StandField::Potential,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StandField::Power => "power",
            StandField::Speed => "speed",
            StandField::Range => "range",
            StandField::Durability => "durability",
            StandField::Precision => "precision",
            StandField::Potential => "potential",
        }
    }
}

impl fmt::Display for StandField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stand stats exactly as the client sent them.
///
/// Each field is the raw JSON value; a missing field deserializes as null
/// and is rejected as an invalid grade.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProposedStandStats {
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

impl ProposedStandStats {
    pub fn get(&self, field: StandField) -> &Value {
        match field {
            StandField::Power => &self.power,
            StandField::Speed => &self.speed,
            StandField::Range => &self.range,
            StandField::Durability => &self.durability,
            StandField::Precision => &self.precision,
            StandField::Potential => &self.potential,
        }
    }
}

/// A Stand stat block that passed creation validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandStats {
    pub power: Grade,
    pub speed: Grade,
    pub range: Grade,
    pub durability: Grade,
    pub precision: Grade,
    pub potential: Grade,
}

impl StandStats {
    pub fn get(&self, field: StandField) -> Grade {
        match field {
            StandField::Power => self.power,
            StandField::Speed => self.speed,
            StandField::Range => self.range,
            StandField::Durability => self.durability,
            StandField::Precision => self.precision,
            StandField::Potential => self.potential,
        }
    }

    /// Total point-buy cost of the six grades.
    pub fn total_cost(&self) -> u32 {
        StandField::ALL.iter().map(|f| self.get(*f).cost()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatValidationError {
    #[error("Invalid grade for {field}: must be S, A, B, C, D, or F")]
    InvalidGrade { field: StandField },

    #[error("Total points exceed {limit} (got {total})")]
    BudgetExceeded { total: u32, limit: u32 },
}

/// Validate a proposed Stand against the point-buy budget.
///
/// Fields are shaped in [`StandField::ALL`] order and the first invalid one
/// is reported; the budget is only checked once all six are valid grades.
pub fn validate_stand_stats(
    proposed: &ProposedStandStats,
    rules: &CreationRules,
) -> Result<StandStats, StatValidationError> {
    let mut grades = [Grade::F; 6];
    for (slot, field) in grades.iter_mut().zip(StandField::ALL) {
        *slot = Grade::from_value(proposed.get(field))
            .ok_or(StatValidationError::InvalidGrade { field })?;
    }

    let [power, speed, range, durability, precision, potential] = grades;
    let stats = StandStats {
        power,
        speed,
        range,
        durability,
        precision,
        potential,
    };

    let total = stats.total_cost();
    if total > rules.stand_point_budget {
        return Err(StatValidationError::BudgetExceeded {
            total,
            limit: rules.stand_point_budget,
        });
    }

    Ok(stats)
}
