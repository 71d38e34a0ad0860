//! Domain entities - Core business objects with identity

mod character;
mod user;

pub use character::{Character, CharacterProfile, Stand};
pub use user::User;
