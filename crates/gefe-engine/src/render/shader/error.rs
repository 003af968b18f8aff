use std::path::PathBuf;

use thiserror::Error;

use super::program::ProgramPhase;
use super::source::ShaderStage;
use crate::render::RenderError;

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("failed to read shader `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unexpected shader stage `{token}` (expected `vertex` or `fragment`)")]
    UnexpectedToken { token: String },

    #[error("expected exactly 2 `#type` markers, found {found}")]
    MarkerCount { found: usize },

    #[error("shader stage `{stage}` declared twice")]
    DuplicateStage { stage: ShaderStage },

    #[error("failed to compile {stage} stage of `{}`:\n{log}", path.display())]
    Compile {
        path: PathBuf,
        stage: ShaderStage,
        log: String,
    },

    #[error("failed to link `{}`:\n{log}", path.display())]
    Link { path: PathBuf, log: String },

    #[error("cannot {op} shader `{}` in phase {phase:?}", path.display())]
    InvalidState {
        path: PathBuf,
        op: &'static str,
        phase: ProgramPhase,
    },

    #[error(transparent)]
    Backend(#[from] RenderError),
}
