//! Value objects - immutable types without identity

mod play_state;

pub use play_state::{PlayStateUpdate, SpecialArmorPolicy};
