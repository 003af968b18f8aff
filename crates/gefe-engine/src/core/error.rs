use thiserror::Error;

use super::driver::DriverPhase;
use crate::render::RenderError;

/// Fatal frame-driver errors. Everything here ends the run.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to initialize the window context: {0}")]
    ContextInit(String),

    #[error("unknown scene {0}")]
    UnknownScene(i32),

    #[error("frame driver is {actual:?}, expected {expected:?}")]
    InvalidState {
        expected: DriverPhase,
        actual: DriverPhase,
    },

    #[error("the presentation surface was lost")]
    SurfaceLost,

    #[error(transparent)]
    Render(#[from] RenderError),
}
