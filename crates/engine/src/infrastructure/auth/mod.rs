//! Credential adapters.

pub mod password;
pub mod session;

pub use password::Sha256PasswordHasher;
pub use session::InMemorySessionStore;
