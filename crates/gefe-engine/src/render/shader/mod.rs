//! Dual-stage shader programs.
//!
//! A shader asset is one text file holding both stages, each introduced by a
//! `#type vertex` or `#type fragment` marker line. Stages are GLSL 4.50,
//! compiled on the CPU with naga and handed to the graphics backend as IR.
//!
//! Lifecycle: `Parsed -> Compiled -> Linked -> Released`.

mod compile;
mod error;
mod program;
mod reflect;
mod source;

pub use error::ShaderError;
pub use program::{ProgramPhase, ShaderProgram};
pub use reflect::{UniformKind, UniformSlot, UniformTable};
pub use source::{ShaderSource, ShaderStage};
