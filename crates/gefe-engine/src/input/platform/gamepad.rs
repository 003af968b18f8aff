use gilrs::{Event, EventType, Gilrs};

use crate::input::InputEvent;

/// Translates a gilrs event into an engine `InputEvent`.
///
/// Only connection changes are represented; button and axis events are
/// dropped.
pub fn translate_gamepad_event(id: usize, event: &EventType) -> Option<InputEvent> {
    let connected = match event {
        EventType::Connected => true,
        EventType::Disconnected => false,
        _ => return None,
    };
    Some(InputEvent::Gamepad {
        id: id as u32,
        connected,
    })
}

/// Gamepad event source polled alongside the window.
pub struct GamepadSource {
    gilrs: Gilrs,
}

impl GamepadSource {
    /// Opens the platform gamepad backend.
    ///
    /// Returns `None` when gamepads cannot be read at all; unsupported
    /// platforms still get a source that never yields events.
    pub fn new() -> Option<Self> {
        match Gilrs::new() {
            Ok(gilrs) => Some(Self { gilrs }),
            Err(gilrs::Error::NotImplemented(gilrs)) => {
                log::warn!("gamepads are not supported on this platform");
                Some(Self { gilrs })
            }
            Err(e) => {
                log::warn!("gamepad input unavailable: {e}");
                None
            }
        }
    }

    /// Appends pending connection changes to `out`.
    pub fn drain_into(&mut self, out: &mut Vec<InputEvent>) {
        while let Some(Event { id, event, .. }) = self.gilrs.next_event() {
            if let Some(ev) = translate_gamepad_event(usize::from(id), &event) {
                out.push(ev);
            }
        }
    }
}
