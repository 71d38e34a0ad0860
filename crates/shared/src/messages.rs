//! WebSocket message types for the dice-roll channel
//!
//! ## Versioning Policy
//!
//! - New variants can be added at the end (forward compatible)
//! - Renaming variants is a breaking change
//! - Unknown client message types deserialize to `Unknown`

use serde::{Deserialize, Serialize};

use jojo_domain::RollOutcome;

// =============================================================================
// Client Messages (client → engine)
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Roll a pool of d6 for an action. Out-of-range counts are rejected by
    /// the roll itself, not by deserialization.
    Roll { action: String, dice: i64 },
    /// Heartbeat ping
    Heartbeat,
    /// Unrecognized message type
    #[serde(other)]
    Unknown,
}

// =============================================================================
// Server Messages (engine → client)
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// A roll made by any connected client
    RollResult {
        action: String,
        dice: Vec<u8>,
        result: u8,
        outcome: RollOutcome,
    },
    /// Request could not be handled
    Error { code: String, message: String },
    /// Heartbeat response
    Pong,
}
