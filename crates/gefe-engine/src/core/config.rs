use crate::device::GpuInit;
use crate::render::ClearColor;
use crate::scene::{SceneConfig, SceneId};
use crate::window::WindowConfig;

/// Everything the frame driver needs up front.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub window: WindowConfig,
    pub gpu: GpuInit,
    pub scenes: SceneConfig,

    /// Scene entered right after the context is created.
    pub default_scene: SceneId,

    /// Initial clear color.
    pub clear_color: ClearColor,
}
