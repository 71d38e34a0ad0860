//! JoJo TTRPG Protocol - wire types shared by the engine and its clients
//!
//! This crate contains:
//! - REST request/response bodies (`requests`, `responses`)
//! - WebSocket message types (`ClientMessage`, `ServerMessage`)
//!
//! # Design Principles
//!
//! 1. **No business logic** - Pure data types and serialization
//! 2. **No domain IDs** - use raw `uuid::Uuid` in DTOs
//! 3. **camelCase JSON** - field names match what existing clients send

pub mod messages;
pub mod requests;
pub mod responses;

pub use messages::{ClientMessage, ServerMessage};
pub use requests::{
    CreateCharacterRequest, LoginRequest, RegisterRequest, StandRequest, UpdateCharacterRequest,
};
pub use responses::{
    AuthResponse, CharacterData, CreateCharacterResponse, MessageResponse, StandData, UserData,
};
