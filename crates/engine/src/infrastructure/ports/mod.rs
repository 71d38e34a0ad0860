//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Database access (could swap SQLite -> Postgres)
//! - Credentials (password hashing, bearer sessions)
//! - Clock/Random (for testing)

mod error;
mod external;
mod repos;
mod testing;

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::{CharacterRepo, UserRepo};

pub use error::{RepoError, SessionError};

// =============================================================================
// Credential Ports
// =============================================================================
pub use external::{PasswordHasherPort, SessionPort, SessionToken};

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use repos::{MockCharacterRepo, MockUserRepo};

#[cfg(test)]
pub use external::{MockPasswordHasherPort, MockSessionPort};

#[cfg(test)]
pub use testing::MockClockPort;

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::{ClockPort, RandomPort};
