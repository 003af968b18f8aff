//! GPU rendering subsystem.
//!
//! Scenes never touch wgpu directly. They own handles created through a
//! [`GraphicsBackend`] and record per-frame [`RenderCmd`]s into a
//! [`CommandList`]; the backend replays that list in order when the frame is
//! presented.
//!
//! Convention:
//! - world space is +X right, +Y up, in camera projection units
//! - vertex layout is fixed: position at location 0, color at location 1

mod backend;
mod camera;
mod clear;
mod cmd;
mod error;
mod mesh;

pub mod shader;

pub use backend::{
    BufferId, BufferKind, FrameStatus, GraphicsBackend, ProgramDesc, ProgramId, StageId,
    StageVisibility, UniformBlock,
};
pub use camera::{Camera, ProjectionBounds, CAMERA_Z};
pub use clear::{ClearColor, FADE_STEP, FADE_THRESHOLD};
pub use cmd::{CommandList, RenderCmd};
pub use error::RenderError;
pub use mesh::{Mesh, Vertex};
