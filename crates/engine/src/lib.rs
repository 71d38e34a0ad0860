//! JoJo TTRPG Engine library.
//!
//! ## Structure
//!
//! - `use_cases/` - account, character and roll orchestration
//! - `infrastructure/` - ports and their adapters (SQLite, sessions, clock)
//! - `api/` - HTTP and WebSocket entry points
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod infrastructure;
pub mod use_cases;

/// Test fixtures for handler and socket tests.
#[cfg(test)]
pub mod test_fixtures;

pub use app::App;
