use std::collections::HashSet;

use super::types::{ButtonState, Key};

/// Held keys plus the keys that went down during the current frame.
#[derive(Debug, Default, Clone)]
pub struct KeyboardState {
    down: HashSet<Key>,
    pressed: HashSet<Key>,
}

impl KeyboardState {
    pub(crate) fn on_key(&mut self, key: Key, state: ButtonState) {
        match state {
            ButtonState::Pressed => {
                if self.down.insert(key) {
                    self.pressed.insert(key);
                }
            }
            ButtonState::Released => {
                self.down.remove(&key);
            }
        }
    }

    pub(crate) fn release_all(&mut self) {
        self.down.clear();
    }

    pub fn end_frame(&mut self) {
        self.pressed.clear();
    }

    /// True while `key` is held.
    pub fn key_down(&self, key: Key) -> bool {
        self.down.contains(&key)
    }

    /// True only during the frame in which `key` went down.
    pub fn key_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }
}
