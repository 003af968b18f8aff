use super::types::{ButtonState, MouseButton};

/// Number of mouse buttons whose pressed state is tracked.
pub const TRACKED_BUTTONS: usize = 3;

/// Cursor, button and scroll state for the current frame.
///
/// Positions are window coordinates. `last_*` holds the position before the
/// most recent cursor event and is re-synchronized by [`end_frame`](Self::end_frame).
#[derive(Debug, Default, Clone)]
pub struct MouseState {
    x: f64,
    y: f64,
    last_x: f64,
    last_y: f64,
    scroll_x: f64,
    scroll_y: f64,
    pressed: [bool; TRACKED_BUTTONS],
    dragging: bool,
}

impl MouseState {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn on_cursor_moved(&mut self, x: f64, y: f64) {
        self.last_x = self.x;
        self.last_y = self.y;
        self.x = x;
        self.y = y;

        // Movement with any tracked button held is a drag.
        self.dragging = self.pressed.iter().any(|p| *p);
    }

    pub(crate) fn on_button(&mut self, button: MouseButton, state: ButtonState) {
        let Some(slot) = button.index() else { return };

        match state {
            ButtonState::Pressed => self.pressed[slot] = true,
            ButtonState::Released => {
                self.pressed[slot] = false;
                self.dragging = false;
            }
        }
    }

    pub(crate) fn on_scroll(&mut self, x: f64, y: f64) {
        self.scroll_x = x;
        self.scroll_y = y;
    }

    /// Drops held buttons, e.g. after focus loss.
    pub(crate) fn release_all(&mut self) {
        self.pressed = [false; TRACKED_BUTTONS];
        self.dragging = false;
    }

    /// Resets per-frame values: scroll offsets go to zero and the last
    /// position catches up with the current one.
    pub fn end_frame(&mut self) {
        self.scroll_x = 0.0;
        self.scroll_y = 0.0;
        self.last_x = self.x;
        self.last_y = self.y;
    }

    pub fn x(&self) -> f32 {
        self.x as f32
    }

    pub fn y(&self) -> f32 {
        self.y as f32
    }

    /// Horizontal movement during the current frame, `last_x - x`.
    pub fn dx(&self) -> f32 {
        (self.last_x - self.x) as f32
    }

    /// Vertical movement during the current frame, `last_y - y`.
    pub fn dy(&self) -> f32 {
        (self.last_y - self.y) as f32
    }

    pub fn scroll_x(&self) -> f32 {
        self.scroll_x as f32
    }

    pub fn scroll_y(&self) -> f32 {
        self.scroll_y as f32
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Pressed state of tracked button `index`; untracked indices are never down.
    pub fn button_down(&self, index: usize) -> bool {
        self.pressed.get(index).copied().unwrap_or(false)
    }
}
