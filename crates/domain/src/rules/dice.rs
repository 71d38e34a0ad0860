//! d6 dice pools for action rolls.
//!
//! - Roll the pool, take the highest die
//! - A pool of zero dice rolls two and takes the lowest
//! - Two or more sixes is a critical

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Largest pool the roll channel accepts.
pub const MAX_ROLL_DICE: u8 = 10;

/// Action roll outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollOutcome {
    /// Multiple 6s - success with increased effect
    Critical,
    /// Result is 6 - clean success
    Success,
    /// Result is 4-5 - success with complication
    PartialSuccess,
    /// Result is 1-3 - failure with consequence
    Failure,
}

impl RollOutcome {
    /// Determine outcome from the dice that count toward the result.
    pub fn from_dice(dice: &[u8]) -> Self {
        let Some(highest) = dice.iter().copied().max() else {
            return RollOutcome::Failure;
        };
        let sixes = dice.iter().filter(|&&d| d == 6).count();

        if sixes >= 2 {
            RollOutcome::Critical
        } else if highest == 6 {
            RollOutcome::Success
        } else if highest >= 4 {
            RollOutcome::PartialSuccess
        } else {
            RollOutcome::Failure
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(
            self,
            RollOutcome::Critical | RollOutcome::Success | RollOutcome::PartialSuccess
        )
    }
}

/// A validated number of d6 to roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DicePool(u8);

/// Dice rolled for a pool and the result they produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolRoll {
    pub dice: Vec<u8>,
    pub result: u8,
    pub outcome: RollOutcome,
}

impl DicePool {
    pub fn new(count: u8) -> Result<Self, DomainError> {
        if count > MAX_ROLL_DICE {
            return Err(DomainError::validation(format!(
                "Cannot roll more than {} dice (requested {})",
                MAX_ROLL_DICE, count
            )));
        }
        Ok(Self(count))
    }

    pub fn count(&self) -> u8 {
        self.0
    }

    /// Roll the pool. `d6` must return a value in `1..=6`.
    pub fn roll(self, mut d6: impl FnMut() -> u8) -> PoolRoll {
        if self.0 == 0 {
            let dice = vec![d6(), d6()];
            let lowest = dice.iter().copied().min().unwrap_or(1);
            return PoolRoll {
                outcome: RollOutcome::from_dice(&[lowest]),
                result: lowest,
                dice,
            };
        }

        let dice: Vec<u8> = (0..self.0).map(|_| d6()).collect();
        let result = dice.iter().copied().max().unwrap_or(1);
        PoolRoll {
            outcome: RollOutcome::from_dice(&dice),
            result,
            dice,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scripted(values: &[u8]) -> impl FnMut() -> u8 + '_ {
        let mut iter = values.iter().copied();
        move || iter.next().unwrap_or(1)
    }

    #[test]
    fn outcome_from_dice() {
        // Critical (multiple 6s)
        assert_eq!(RollOutcome::from_dice(&[6, 6, 3]), RollOutcome::Critical);

        // Success (single 6)
        assert_eq!(RollOutcome::from_dice(&[6, 3, 2]), RollOutcome::Success);

        // Partial (4-5)
        assert_eq!(RollOutcome::from_dice(&[5, 3, 2]), RollOutcome::PartialSuccess);
        assert_eq!(RollOutcome::from_dice(&[4, 2, 1]), RollOutcome::PartialSuccess);

        // Failure (1-3)
        assert_eq!(RollOutcome::from_dice(&[3, 2, 1]), RollOutcome::Failure);
        assert_eq!(RollOutcome::from_dice(&[]), RollOutcome::Failure);
    }

    #[test]
    fn pool_takes_highest() {
        let roll = DicePool::new(3).expect("valid pool").roll(scripted(&[2, 5, 3]));
        assert_eq!(roll.dice, vec![2, 5, 3]);
        assert_eq!(roll.result, 5);
        assert_eq!(roll.outcome, RollOutcome::PartialSuccess);
        assert!(roll.outcome.is_success());
    }

    #[test]
    fn zero_dice_takes_lowest_of_two() {
        let roll = DicePool::new(0).expect("valid pool").roll(scripted(&[6, 6]));
        assert_eq!(roll.dice, vec![6, 6]);
        assert_eq!(roll.result, 6);
        // Two sixes on a zero-dice roll are not a critical
        assert_eq!(roll.outcome, RollOutcome::Success);

        let roll = DicePool::new(0).expect("valid pool").roll(scripted(&[5, 2]));
        assert_eq!(roll.result, 2);
        assert_eq!(roll.outcome, RollOutcome::Failure);
    }

    #[test]
    fn rejects_oversized_pool() {
        assert!(DicePool::new(MAX_ROLL_DICE).is_ok());
        assert!(DicePool::new(MAX_ROLL_DICE + 1).is_err());
    }
}
