//! Window-system and gamepad event translation.

#[cfg(feature = "gamepad")]
pub mod gamepad;
pub mod winit;
