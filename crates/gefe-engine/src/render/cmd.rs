use super::backend::{BufferId, ProgramId};

/// Backend-agnostic GPU command stream for one frame.
///
/// Commands mirror a bind/draw/unbind state machine: a draw uses whatever
/// program and buffers are bound at that point in the stream.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCmd {
    /// Makes `program` the active program.
    UseProgram(ProgramId),

    /// Writes a column-major 4x4 matrix into a uniform block of `program`.
    UploadMat4 {
        program: ProgramId,
        binding: u32,
        offset: u32,
        matrix: [f32; 16],
    },

    BindVertexBuffer(BufferId),
    BindIndexBuffer(BufferId),

    /// Indexed triangle-list draw over the bound index buffer.
    DrawIndexed { index_count: u32 },

    /// Unbinds vertex and index buffers.
    UnbindBuffers,

    /// Unbinds the active program.
    DetachProgram,
}

/// Recorded command stream for a frame.
///
/// Cleared by the frame driver at the start of every frame; allocation is
/// kept for reuse.
#[derive(Debug, Default, Clone)]
pub struct CommandList {
    cmds: Vec<RenderCmd>,
}

impl CommandList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.cmds.clear();
    }

    #[inline]
    pub fn push(&mut self, cmd: RenderCmd) {
        self.cmds.push(cmd);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cmds.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[RenderCmd] {
        &self.cmds
    }

    pub fn iter(&self) -> impl Iterator<Item = &RenderCmd> {
        self.cmds.iter()
    }
}
