use thiserror::Error;

/// Failures raised by a graphics backend or by geometry validation.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid mesh `{label}`: {reason}")]
    InvalidMesh { label: String, reason: String },

    #[error("unknown {kind} handle {id}")]
    UnknownResource { kind: &'static str, id: u64 },

    #[error("failed to create pipeline `{label}`: {reason}")]
    Pipeline { label: String, reason: String },
}
