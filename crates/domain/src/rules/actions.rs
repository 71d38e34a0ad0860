//! Action dot allocation validation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use super::CreationRules;
use crate::error::DomainError;

/// The twelve actions a character can hold dots in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Hunt,
    Study,
    Survey,
    Tinker,
    Finesse,
    Prowl,
    Skirmish,
    Wreck,
    Bizarre,
    Command,
    Consort,
    Sway,
}

impl Action {
    pub const ALL: [Action; 12] = [
        Action::Hunt,
        Action::Study,
        Action::Survey,
        Action::Tinker,
        Action::Finesse,
        Action::Prowl,
        Action::Skirmish,
        Action::Wreck,
        Action::Bizarre,
        Action::Command,
        Action::Consort,
        Action::Sway,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Hunt => "hunt",
            Action::Study => "study",
            Action::Survey => "survey",
            Action::Tinker => "tinker",
            Action::Finesse => "finesse",
            Action::Prowl => "prowl",
            Action::Skirmish => "skirmish",
            Action::Wreck => "wreck",
            Action::Bizarre => "bizarre",
            Action::Command => "command",
            Action::Consort => "consort",
            Action::Sway => "sway",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| DomainError::parse(format!("Unknown action: {}", s)))
    }
}

/// Dots held in each of the twelve actions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDots {
    #[serde(default)]
    pub hunt: u32,
    #[serde(default)]
    pub study: u32,
    #[serde(default)]
    pub survey: u32,
    #[serde(default)]
    pub tinker: u32,
    #[serde(default)]
    pub finesse: u32,
    #[serde(default)]
    pub prowl: u32,
    #[serde(default)]
    pub skirmish: u32,
    #[serde(default)]
    pub wreck: u32,
    #[serde(default)]
    pub bizarre: u32,
    #[serde(default)]
    pub command: u32,
    #[serde(default)]
    pub consort: u32,
    #[serde(default)]
    pub sway: u32,
}

impl ActionDots {
    pub fn get(&self, action: Action) -> u32 {
        match action {
            Action::Hunt => self.hunt,
            Action::Study => self.study,
            Action::Survey => self.survey,
            Action::Tinker => self.tinker,
            Action::Finesse => self.finesse,
            Action::Prowl => self.prowl,
            Action::Skirmish => self.skirmish,
            Action::Wreck => self.wreck,
            Action::Bizarre => self.bizarre,
            Action::Command => self.command,
            Action::Consort => self.consort,
            Action::Sway => self.sway,
        }
    }

    pub fn set(&mut self, action: Action, dots: u32) {
        let slot = match action {
            Action::Hunt => &mut self.hunt,
            Action::Study => &mut self.study,
            Action::Survey => &mut self.survey,
            Action::Tinker => &mut self.tinker,
            Action::Finesse => &mut self.finesse,
            Action::Prowl => &mut self.prowl,
            Action::Skirmish => &mut self.skirmish,
            Action::Wreck => &mut self.wreck,
            Action::Bizarre => &mut self.bizarre,
            Action::Command => &mut self.command,
            Action::Consort => &mut self.consort,
            Action::Sway => &mut self.sway,
        };
        *slot = dots;
    }

    pub fn total(&self) -> u32 {
        Action::ALL
            .iter()
            .fold(0u32, |sum, a| sum.saturating_add(self.get(*a)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionValidationError {
    #[error("Total action dots cannot exceed {limit} (got {total})")]
    BudgetExceeded { total: u32, limit: u32 },

    /// `action` is the payload key, which need not be one of the twelve actions.
    #[error("Action {action} cannot exceed {cap} dots at character creation (got {value})")]
    PerActionCapExceeded {
        action: String,
        value: Number,
        cap: u32,
    },

    #[error("Action {action} must be a non-negative whole number of dots")]
    InvalidDots { action: Action },
}

/// Validate the action portion of a creation payload.
///
/// The budget only counts the twelve recognized actions, while the cap sweep
/// inspects every numeric value in the payload, recognized or not. The two
/// key sets differ on purpose: unifying them would change which payloads are
/// accepted. The sum is checked first; the sweep reports the first offending
/// key in payload order.
///
/// A recognized action that is absent or null counts as zero dots.
pub fn validate_action_dots(
    payload: &Map<String, Value>,
    rules: &CreationRules,
) -> Result<ActionDots, ActionValidationError> {
    let mut dots = ActionDots::default();
    let mut total = 0u32;
    for (key, value) in payload {
        let Ok(action) = key.parse::<Action>() else {
            continue;
        };
        if value.is_null() {
            continue;
        }
        let count = value
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or(ActionValidationError::InvalidDots { action })?;
        dots.set(action, count);
        total = total.saturating_add(count);
    }

    if total > rules.action_dot_budget {
        return Err(ActionValidationError::BudgetExceeded {
            total,
            limit: rules.action_dot_budget,
        });
    }

    for (key, value) in payload {
        let Value::Number(number) = value else {
            continue;
        };
        let exceeds = match number.as_u64() {
            Some(n) => n > u64::from(rules.action_dot_cap),
            None => number
                .as_f64()
                .is_some_and(|n| n > f64::from(rules.action_dot_cap)),
        };
        if exceeds {
            return Err(ActionValidationError::PerActionCapExceeded {
                action: key.clone(),
                value: number.clone(),
                cap: rules.action_dot_cap,
            });
        }
    }

    Ok(dots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected an object, got {other}"),
        }
    }

    #[test]
    fn accepts_exactly_the_budget() {
        let actions = payload(json!({
            "hunt": 2, "study": 2, "survey": 1, "tinker": 1, "finesse": 1,
            "prowl": 0, "skirmish": 0, "wreck": 0, "bizarre": 0,
            "command": 0, "consort": 0, "sway": 0
        }));
        let dots = validate_action_dots(&actions, &CreationRules::default())
            .expect("7 dots is legal");
        assert_eq!(dots.total(), 7);
        assert_eq!(dots.hunt, 2);
        assert_eq!(dots.finesse, 1);
        assert_eq!(dots.sway, 0);
    }

    #[test]
    fn cap_violation_regardless_of_total() {
        let actions = payload(json!({"skirmish": 3}));
        let err = validate_action_dots(&actions, &CreationRules::default()).unwrap_err();
        assert_eq!(
            err,
            ActionValidationError::PerActionCapExceeded {
                action: "skirmish".to_string(),
                value: Number::from(3),
                cap: 2
            }
        );
        assert_eq!(
            err.to_string(),
            "Action skirmish cannot exceed 2 dots at character creation (got 3)"
        );
    }

    #[test]
    fn raising_one_action_of_a_full_budget_to_three_hits_the_budget_first() {
        // 7 -> 8 total: the sum check runs before the cap sweep
        let actions = payload(json!({
            "hunt": 3, "study": 2, "survey": 1, "tinker": 1, "finesse": 1
        }));
        let err = validate_action_dots(&actions, &CreationRules::default()).unwrap_err();
        assert_eq!(
            err,
            ActionValidationError::BudgetExceeded { total: 8, limit: 7 }
        );
    }

    #[test]
    fn budget_violation_without_any_cap_violation() {
        let actions = payload(json!({
            "hunt": 2, "study": 2, "survey": 2, "tinker": 2
        }));
        let err = validate_action_dots(&actions, &CreationRules::default()).unwrap_err();
        assert_eq!(
            err,
            ActionValidationError::BudgetExceeded { total: 8, limit: 7 }
        );
        assert_eq!(err.to_string(), "Total action dots cannot exceed 7 (got 8)");
    }

    #[test]
    fn unrecognized_keys_are_not_summed() {
        let actions = payload(json!({
            "hunt": 2, "study": 2, "survey": 2, "tinker": 1,
            "playbook": 2, "notes": "lots of dots"
        }));
        let dots = validate_action_dots(&actions, &CreationRules::default())
            .expect("unrecognized keys do not count toward the budget");
        assert_eq!(dots.total(), 7);
    }

    #[test]
    fn cap_sweep_covers_unrecognized_keys() {
        let actions = payload(json!({"hunt": 1, "stress": 5}));
        let err = validate_action_dots(&actions, &CreationRules::default()).unwrap_err();
        assert!(matches!(
            err,
            ActionValidationError::PerActionCapExceeded { ref action, .. } if action == "stress"
        ));
    }

    #[test]
    fn cap_sweep_catches_fractional_values() {
        let actions = payload(json!({"xp": 2.5}));
        let err = validate_action_dots(&actions, &CreationRules::default()).unwrap_err();
        assert!(matches!(
            err,
            ActionValidationError::PerActionCapExceeded { ref action, .. } if action == "xp"
        ));
    }

    #[test]
    fn cap_sweep_reports_first_key_in_payload_order() {
        let actions = payload(json!({"zeal": 4, "alpha": 9}));
        let err = validate_action_dots(&actions, &CreationRules::default()).unwrap_err();
        assert!(matches!(
            err,
            ActionValidationError::PerActionCapExceeded { ref action, .. } if action == "zeal"
        ));
    }

    #[test]
    fn recognized_action_must_hold_whole_dots() {
        for bad in [json!(-1), json!("2"), json!(1.5), json!(true)] {
            let actions = payload(json!({"wreck": bad}));
            let err = validate_action_dots(&actions, &CreationRules::default()).unwrap_err();
            assert_eq!(
                err,
                ActionValidationError::InvalidDots {
                    action: Action::Wreck
                }
            );
        }
    }

    #[test]
    fn absent_and_null_actions_are_zero() {
        let actions = payload(json!({"bizarre": null}));
        let dots = validate_action_dots(&actions, &CreationRules::default()).expect("valid");
        assert_eq!(dots, ActionDots::default());
    }

    #[test]
    fn is_idempotent() {
        let actions = payload(json!({"sway": 2, "consort": 1}));
        let rules = CreationRules::default();
        assert_eq!(
            validate_action_dots(&actions, &rules),
            validate_action_dots(&actions, &rules)
        );
    }

    #[test]
    fn action_names_round_trip() {
        for action in Action::ALL {
            assert_eq!(action.as_str().parse::<Action>().ok(), Some(action));
        }
        assert!("Hunt".parse::<Action>().is_err());
    }
}
