//! Action rolls for the dice channel.

use std::sync::Arc;

use jojo_domain::{DicePool, DomainError, PoolRoll, MAX_ROLL_DICE};

use crate::infrastructure::ports::RandomPort;

pub struct RollDice {
    random: Arc<dyn RandomPort>,
}

impl RollDice {
    pub fn new(random: Arc<dyn RandomPort>) -> Self {
        Self { random }
    }

    /// Roll `dice` d6 chosen by the server.
    pub fn execute(&self, dice: i64) -> Result<PoolRoll, DomainError> {
        let count = u8::try_from(dice).map_err(|_| {
            DomainError::validation(format!(
                "Dice count must be between 0 and {} (requested {})",
                MAX_ROLL_DICE, dice
            ))
        })?;
        let pool = DicePool::new(count)?;
        Ok(pool.roll(|| self.random.gen_range(1, 6).clamp(1, 6) as u8))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::ScriptedRandom;
    use jojo_domain::RollOutcome;

    fn roll(script: &[i32], dice: i64) -> Result<PoolRoll, DomainError> {
        RollDice::new(Arc::new(ScriptedRandom::new(script.to_vec()))).execute(dice)
    }

    #[test]
    fn takes_highest_die() {
        let result = roll(&[2, 5, 3], 3).expect("valid pool");
        assert_eq!(result.dice, vec![2, 5, 3]);
        assert_eq!(result.result, 5);
        assert_eq!(result.outcome, RollOutcome::PartialSuccess);
    }

    #[test]
    fn two_sixes_is_critical() {
        let result = roll(&[6, 1, 6], 3).expect("valid pool");
        assert_eq!(result.result, 6);
        assert_eq!(result.outcome, RollOutcome::Critical);
    }

    #[test]
    fn zero_dice_rolls_two_and_keeps_lowest() {
        let result = roll(&[6, 2], 0).expect("valid pool");
        assert_eq!(result.dice, vec![6, 2]);
        assert_eq!(result.result, 2);
        assert_eq!(result.outcome, RollOutcome::Failure);
    }

    #[test]
    fn oversized_pool_is_rejected() {
        let max = i64::from(MAX_ROLL_DICE);
        assert!(roll(&[6], max).is_ok());
        assert!(matches!(
            roll(&[6], max + 1),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn counts_outside_u8_are_validation_errors() {
        for dice in [300, -1, i64::MAX] {
            assert!(
                matches!(roll(&[6], dice), Err(DomainError::Validation(_))),
                "{dice}"
            );
        }
    }
}
