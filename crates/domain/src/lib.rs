//! JoJo TTRPG Domain - entities, IDs and the character creation rules.
//!
//! The [`rules`] module is pure and has no I/O; everything the engine
//! persists is built from the types re-exported here.

pub mod entities;
pub mod error;
pub mod ids;
pub mod rules;
pub mod value_objects;

pub use entities::{Character, CharacterProfile, Stand, User};

pub use error::DomainError;

// Re-export ID types
pub use ids::{CharacterId, StandId, UserId};

// Re-export the rules engine
pub use rules::{
    derive_durability_effects, derive_durability_effects_from_value, validate_action_dots,
    validate_stand_stats, Action, ActionDots, ActionValidationError, CreationRules, DicePool,
    DurabilityEffect, DurabilityEffects, Grade, PoolRoll, ProposedStandStats, RollOutcome,
    StandField, StandStats, StatValidationError, MAX_ROLL_DICE,
};

pub use value_objects::{PlayStateUpdate, SpecialArmorPolicy};
