//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into [`crate::types::GameAction`]. Every action
//! is a single press; there is no key repeat handling.

pub mod map;

pub use run21_types as types;

pub use map::{handle_key_event, lane_for_key, should_quit};
