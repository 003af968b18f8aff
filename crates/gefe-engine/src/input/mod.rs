//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! `platform` translates window-system events into `InputEvent`s; the frame
//! driver applies them to `InputState` during the poll step of each frame.

mod keyboard;
mod mouse;
mod state;
mod types;

pub mod platform;

pub use keyboard::KeyboardState;
pub use mouse::{MouseState, TRACKED_BUTTONS};
pub use state::InputState;
pub use types::{ButtonState, InputEvent, Key, MouseButton};
