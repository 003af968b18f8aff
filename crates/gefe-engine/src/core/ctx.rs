use crate::input::InputState;
use crate::render::{ClearColor, CommandList};
use crate::scene::SceneId;

/// Per-frame context handed to `Scene::update`.
///
/// Input is read-only here: it was applied while events were polled and is
/// stable for the rest of the frame.
pub struct SceneCtx<'a> {
    pub input: &'a InputState,
    pub clear_color: &'a mut ClearColor,
    pub commands: &'a mut CommandList,
    switch_request: &'a mut Option<SceneId>,
}

impl<'a> SceneCtx<'a> {
    pub fn new(
        input: &'a InputState,
        clear_color: &'a mut ClearColor,
        commands: &'a mut CommandList,
        switch_request: &'a mut Option<SceneId>,
    ) -> Self {
        Self {
            input,
            clear_color,
            commands,
            switch_request,
        }
    }

    /// Asks the driver to switch scenes once the current frame is presented.
    ///
    /// The last request made during a frame wins.
    pub fn request_scene(&mut self, id: SceneId) {
        *self.switch_request = Some(id);
    }

    pub fn requested_scene(&self) -> Option<SceneId> {
        *self.switch_request
    }

    /// One fade step on the clear color. See [`ClearColor::fade_to_black`].
    pub fn fade_to_black(&mut self) -> bool {
        self.clear_color.fade_to_black()
    }
}
