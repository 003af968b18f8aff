use glam::Vec2;

use crate::core::SceneCtx;
use crate::input::Key;
use crate::render::{Camera, GraphicsBackend, ProjectionBounds, Vertex};

use super::{Scene, SceneConfig, SceneError, SceneId, ShadedMesh};

/// How long the fade-out lasts before switching to the level.
pub const TRANSITION_SECONDS: f32 = 2.0;

const QUAD_VERTICES: [Vertex; 4] = [
    Vertex::new([100.5, -0.5, 0.0], [1.0, 0.0, 0.0, 1.0]),
    Vertex::new([-0.5, 100.5, 0.0], [0.0, 1.0, 0.0, 1.0]),
    Vertex::new([100.5, 100.5, 0.0], [0.0, 0.0, 1.0, 1.0]),
    Vertex::new([-0.5, -0.5, 0.0], [1.0, 1.0, 0.0, 1.0]),
];

// Counter-clockwise.
const QUAD_INDICES: [u32; 6] = [2, 1, 0, 0, 1, 3];

/// Editor scene: one colored quad.
///
/// Dragging pans the camera with the cursor. Space fades the clear color to
/// black for [`TRANSITION_SECONDS`], then switches to [`SceneId::Level`].
pub struct LevelEditorScene {
    config: SceneConfig,
    camera: Option<Camera>,
    quad: Option<ShadedMesh>,

    /// Seconds left in the fade-out, if one is running.
    transition: Option<f32>,
}

impl LevelEditorScene {
    pub fn new(config: SceneConfig) -> Self {
        Self {
            config,
            camera: None,
            quad: None,
            transition: None,
        }
    }

    pub fn quad(&self) -> Option<&ShadedMesh> {
        self.quad.as_ref()
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    fn advance_transition(&mut self, dt: f32, ctx: &mut SceneCtx<'_>) {
        match self.transition.as_mut() {
            Some(remaining) => {
                ctx.fade_to_black();
                *remaining -= dt;
                if *remaining <= 0.0 {
                    self.transition = None;
                    ctx.request_scene(SceneId::Level);
                }
            }
            None => {
                if ctx.input.keyboard.key_pressed(Key::Space) {
                    log::debug!("editor: starting transition");
                    self.transition = Some(TRANSITION_SECONDS);
                }
            }
        }
    }
}

/// World units spanned by one cursor unit on each axis.
///
/// Falls back to 1:1 until the platform has reported a window size.
fn world_per_cursor_unit(bounds: ProjectionBounds, window_size: Option<(f64, f64)>) -> Vec2 {
    match window_size {
        Some((w, h)) if w > 0.0 && h > 0.0 => Vec2::new(
            (bounds.right - bounds.left) / w as f32,
            (bounds.top - bounds.bottom) / h as f32,
        ),
        _ => Vec2::ONE,
    }
}

impl Scene for LevelEditorScene {
    fn name(&self) -> &'static str {
        "level-editor"
    }

    fn init(&mut self, backend: &mut dyn GraphicsBackend) -> Result<(), SceneError> {
        self.camera = Some(Camera::with_bounds(Vec2::ZERO, self.config.projection));
        self.quad = Some(ShadedMesh::create(
            backend,
            &self.config.shader_path,
            "editor quad",
            &QUAD_VERTICES,
            &QUAD_INDICES,
        )?);
        Ok(())
    }

    fn update(&mut self, dt: f32, ctx: &mut SceneCtx<'_>) {
        self.advance_transition(dt, ctx);

        let Some(camera) = self.camera.as_mut() else {
            return;
        };

        let mouse = &ctx.input.mouse;
        if mouse.is_dragging() {
            // dx/dy are last - current; screen y grows downward.
            let scale = world_per_cursor_unit(camera.bounds(), ctx.input.window_size);
            camera.translate(Vec2::new(mouse.dx(), -mouse.dy()) * scale);
        }

        if let Some(quad) = &self.quad {
            quad.draw(camera, ctx.commands);
        }
    }

    fn release(&mut self, backend: &mut dyn GraphicsBackend) {
        if let Some(quad) = self.quad.take() {
            quad.release(backend);
        }
    }

    fn camera(&self) -> Option<&Camera> {
        self.camera.as_ref()
    }
}
