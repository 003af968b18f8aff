//! Scenes.
//!
//! A scene owns a camera and the GPU resources it draws with. The frame
//! driver keeps exactly one scene active and replaces it wholesale on a
//! switch: the old scene releases every handle before the new one is built.

mod editor;
mod level;
mod shaded;

use std::path::PathBuf;

use thiserror::Error;

use crate::core::{EngineError, SceneCtx};
use crate::render::shader::ShaderError;
use crate::render::{Camera, GraphicsBackend, ProjectionBounds, RenderError};

pub use editor::{LevelEditorScene, TRANSITION_SECONDS};
pub use level::LevelScene;
pub use shaded::ShadedMesh;

/// Why a scene failed to initialize. Never fatal to the frame loop.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error(transparent)]
    Shader(#[from] ShaderError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Scene lifecycle contract.
pub trait Scene {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Acquires GPU resources. On failure, whatever was acquired is released.
    fn init(&mut self, backend: &mut dyn GraphicsBackend) -> Result<(), SceneError> {
        let _ = backend;
        Ok(())
    }

    /// Advances the scene by `dt` seconds and records its draw commands.
    fn update(&mut self, dt: f32, ctx: &mut SceneCtx<'_>);

    /// Releases every GPU handle the scene owns. Must be idempotent.
    fn release(&mut self, backend: &mut dyn GraphicsBackend) {
        let _ = backend;
    }

    /// The scene camera, once initialized.
    fn camera(&self) -> Option<&Camera>;
}

/// Selectable scenes.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum SceneId {
    #[default]
    LevelEditor = 0,
    Level = 1,
}

impl TryFrom<i32> for SceneId {
    type Error = EngineError;

    fn try_from(id: i32) -> Result<Self, Self::Error> {
        match id {
            0 => Ok(SceneId::LevelEditor),
            1 => Ok(SceneId::Level),
            other => Err(EngineError::UnknownScene(other)),
        }
    }
}

impl SceneId {
    /// Constructs the scene. Nothing touches the GPU until `init`.
    pub fn build(self, config: &SceneConfig) -> Box<dyn Scene> {
        match self {
            SceneId::LevelEditor => Box::new(LevelEditorScene::new(config.clone())),
            SceneId::Level => Box::new(LevelScene::new(config.clone())),
        }
    }
}

/// Assets and camera setup shared by the built-in scenes.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub shader_path: PathBuf,
    pub projection: ProjectionBounds,
}

impl SceneConfig {
    /// Path of the shader shipped with this crate.
    pub fn default_shader_path() -> PathBuf {
        PathBuf::from(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/assets/shaders/default.glsl"
        ))
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            shader_path: Self::default_shader_path(),
            projection: ProjectionBounds::default(),
        }
    }
}
