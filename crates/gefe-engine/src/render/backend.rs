use std::fmt;

use super::clear::ClearColor;
use super::cmd::CommandList;
use super::error::RenderError;
use super::shader::ShaderStage;

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
        pub struct $name(u64);

        impl $name {
            /// Wraps a backend-assigned id.
            #[inline]
            pub const fn from_raw(raw: u64) -> Self {
                Self(raw)
            }

            #[inline]
            pub const fn raw(self) -> u64 {
                self.0
            }

            pub(crate) const KIND: &'static str = $kind;
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", $kind, self.0)
            }
        }
    };
}

handle!(
    /// GPU buffer owned by exactly one mesh.
    BufferId,
    "buffer"
);
handle!(
    /// Compiled shader stage owned by exactly one shader program.
    StageId,
    "stage"
);
handle!(
    /// Linked shader program.
    ProgramId,
    "program"
);

/// What a buffer will be bound as.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BufferKind {
    Vertex,
    Index,
}

/// Stages that read a uniform block.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct StageVisibility {
    pub vertex: bool,
    pub fragment: bool,
}

impl StageVisibility {
    pub(crate) fn insert(&mut self, stage: ShaderStage) {
        match stage {
            ShaderStage::Vertex => self.vertex = true,
            ShaderStage::Fragment => self.fragment = true,
        }
    }
}

/// One uniform block of a linked program, in bind group 0.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct UniformBlock {
    pub binding: u32,
    /// Block size in bytes.
    pub size: u32,
    pub visibility: StageVisibility,
}

/// Everything a backend needs to link two compiled stages.
#[derive(Debug, Clone)]
pub struct ProgramDesc<'a> {
    pub label: &'a str,
    pub vertex: StageId,
    pub fragment: StageId,
    pub uniform_blocks: &'a [UniformBlock],
}

/// Outcome of acquiring the next frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameStatus {
    /// A target was acquired; record and present.
    Ready,
    /// Transient surface problem; nothing will be presented this iteration.
    Skipped,
    /// The surface cannot be recovered.
    Lost,
}

/// The seam between the engine and the GPU.
///
/// All calls happen on the frame-loop thread. Handles are never shared
/// between owners: whoever creates a handle destroys it. Destroying an
/// unknown handle is a no-op.
pub trait GraphicsBackend {
    /// Creates an immutable buffer initialized with `contents`.
    fn create_buffer(
        &mut self,
        label: &str,
        kind: BufferKind,
        contents: &[u8],
    ) -> Result<BufferId, RenderError>;

    fn destroy_buffer(&mut self, id: BufferId);

    /// Creates a GPU shader module from a validated naga module.
    fn create_shader_stage(
        &mut self,
        label: &str,
        stage: ShaderStage,
        module: &wgpu::naga::Module,
    ) -> Result<StageId, RenderError>;

    fn destroy_shader_stage(&mut self, id: StageId);

    /// Links two stages into a program with one uniform buffer per block.
    fn create_program(&mut self, desc: &ProgramDesc<'_>) -> Result<ProgramId, RenderError>;

    fn destroy_program(&mut self, id: ProgramId);

    /// Acquires the next frame, to be cleared with `clear`.
    fn begin_frame(&mut self, clear: ClearColor) -> FrameStatus;

    /// Replays `commands` into the acquired frame and presents it.
    ///
    /// Does nothing when the last `begin_frame` did not return `Ready`.
    fn present(&mut self, commands: &CommandList) -> Result<(), RenderError>;

    /// Notifies the backend of a new drawable size in physical pixels.
    fn resize(&mut self, width: u32, height: u32) {
        let _ = (width, height);
    }
}
