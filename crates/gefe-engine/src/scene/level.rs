use glam::Vec2;

use crate::core::SceneCtx;
use crate::input::Key;
use crate::render::{Camera, ClearColor, GraphicsBackend, Vertex};

use super::{Scene, SceneConfig, SceneError, SceneId, ShadedMesh};

const TRIANGLE_VERTICES: [Vertex; 3] = [
    Vertex::new([0.0, 0.0, 0.0], [1.0, 0.5, 0.0, 1.0]),
    Vertex::new([200.0, 0.0, 0.0], [0.0, 0.5, 1.0, 1.0]),
    Vertex::new([100.0, 173.0, 0.0], [1.0, 1.0, 1.0, 1.0]),
];

const TRIANGLE_INDICES: [u32; 3] = [0, 1, 2];

/// Level scene: a single triangle. Space goes back to the editor.
pub struct LevelScene {
    config: SceneConfig,
    camera: Option<Camera>,
    triangle: Option<ShadedMesh>,
}

impl LevelScene {
    pub fn new(config: SceneConfig) -> Self {
        Self {
            config,
            camera: None,
            triangle: None,
        }
    }

    pub fn triangle(&self) -> Option<&ShadedMesh> {
        self.triangle.as_ref()
    }
}

impl Scene for LevelScene {
    fn name(&self) -> &'static str {
        "level"
    }

    fn init(&mut self, backend: &mut dyn GraphicsBackend) -> Result<(), SceneError> {
        log::info!("inside level scene");
        self.camera = Some(Camera::with_bounds(Vec2::ZERO, self.config.projection));
        self.triangle = Some(ShadedMesh::create(
            backend,
            &self.config.shader_path,
            "level triangle",
            &TRIANGLE_VERTICES,
            &TRIANGLE_INDICES,
        )?);
        Ok(())
    }

    fn update(&mut self, _dt: f32, ctx: &mut SceneCtx<'_>) {
        if ctx.input.keyboard.key_pressed(Key::Space) {
            *ctx.clear_color = ClearColor::WHITE;
            ctx.request_scene(SceneId::LevelEditor);
        }

        if let (Some(camera), Some(triangle)) = (&self.camera, &self.triangle) {
            triangle.draw(camera, ctx.commands);
        }
    }

    fn release(&mut self, backend: &mut dyn GraphicsBackend) {
        if let Some(triangle) = self.triangle.take() {
            triangle.release(backend);
        }
    }

    fn camera(&self) -> Option<&Camera> {
        self.camera.as_ref()
    }
}
