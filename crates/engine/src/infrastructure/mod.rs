//! Infrastructure layer - ports and their adapters.

pub mod auth;
pub mod clock;
pub mod config;
pub mod ports;
pub mod sqlite;
