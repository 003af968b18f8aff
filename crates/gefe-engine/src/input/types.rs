use std::fmt;

/// Keyboard key identifier.
///
/// The platform layer maps its key codes into these variants where possible;
/// anything else arrives as `Key::Unknown` carrying the platform code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Tab,
    Backspace,
    Space,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    Shift,
    Control,
    Alt,

    // Letters
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,

    // Digits
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    /// Platform-dependent key not represented above.
    Unknown(u32),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Press/release transition shared by keys and mouse buttons.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ButtonState {
    Pressed,
    Released,
}

/// Mouse button identifier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

impl MouseButton {
    /// Slot of this button in the tracked-button array.
    ///
    /// Left, right and middle map to 0, 1 and 2; every other button is
    /// untracked and returns `None`.
    #[inline]
    pub fn index(self) -> Option<usize> {
        match self {
            MouseButton::Left => Some(0),
            MouseButton::Right => Some(1),
            MouseButton::Middle => Some(2),
            _ => None,
        }
    }
}

/// Platform-agnostic input events.
///
/// The platform layer translates window-system events into these; they are
/// applied to [`InputState`](super::InputState) only while events are polled.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Cursor position in window coordinates (origin top-left).
    CursorMoved { x: f64, y: f64 },

    MouseButton {
        button: MouseButton,
        state: ButtonState,
    },

    /// Scroll offsets for this event, in lines.
    Scroll { x: f64, y: f64 },

    Key {
        key: Key,
        state: ButtonState,
        /// True when the event is an OS key-repeat.
        repeat: bool,
    },

    /// Window focus change.
    Focused(bool),

    /// New drawable size of the window, in the same units as the cursor.
    Resized { width: f64, height: f64 },

    /// A gamepad was connected or disconnected. Log-only.
    Gamepad { id: u32, connected: bool },
}
