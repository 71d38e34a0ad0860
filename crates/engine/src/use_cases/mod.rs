//! Use cases - user stories orchestrated over the ports.

pub mod auth;
pub mod character;
pub mod roll;
pub mod validation;

pub use auth::{AuthError, AuthSession, AuthUseCases};
pub use character::{CharacterCrud, CharacterError, NewCharacter, NewStand};
pub use roll::RollDice;
