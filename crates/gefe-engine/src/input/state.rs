use super::keyboard::KeyboardState;
use super::mouse::MouseState;
use super::types::InputEvent;

/// Input state consumed by scenes.
///
/// Owned by the frame driver and mutated only while platform events are
/// polled, so it is stable for the remainder of a frame.
#[derive(Debug, Default)]
pub struct InputState {
    pub mouse: MouseState,
    pub keyboard: KeyboardState,

    /// Whether the window has focus.
    pub focused: bool,

    /// Window size in cursor units, once the platform has reported it.
    pub window_size: Option<(f64, f64)>,
}

impl InputState {
    /// Applies one platform-agnostic event.
    pub fn apply_event(&mut self, ev: InputEvent) {
        match ev {
            InputEvent::CursorMoved { x, y } => self.mouse.on_cursor_moved(x, y),

            InputEvent::MouseButton { button, state } => self.mouse.on_button(button, state),

            InputEvent::Scroll { x, y } => self.mouse.on_scroll(x, y),

            InputEvent::Key { key, state, repeat } => {
                if !repeat {
                    self.keyboard.on_key(key, state);
                }
            }

            InputEvent::Focused(focused) => {
                self.focused = focused;
                if !focused {
                    // Avoids stuck keys/buttons when focus changes mid-press.
                    self.keyboard.release_all();
                    self.mouse.release_all();
                }
            }

            InputEvent::Resized { width, height } => {
                self.window_size = Some((width, height));
            }

            InputEvent::Gamepad { id, connected } => {
                if connected {
                    log::info!("gamepad {id} connected");
                } else {
                    log::info!("gamepad {id} disconnected");
                }
            }
        }
    }

    /// Clears per-frame values once the frame has been presented.
    pub fn end_frame(&mut self) {
        self.mouse.end_frame();
        self.keyboard.end_frame();
    }
}
