use bytemuck::{Pod, Zeroable};

use super::backend::{BufferId, BufferKind, GraphicsBackend};
use super::cmd::{CommandList, RenderCmd};
use super::error::RenderError;

/// Interleaved vertex: position at location 0, RGBA color at location 1.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x4];

    pub const STRIDE: u64 = std::mem::size_of::<Vertex>() as u64;

    #[inline]
    pub const fn new(position: [f32; 3], color: [f32; 4]) -> Self {
        Self { position, color }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: Self::STRIDE,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Indexed triangle-list geometry living on the GPU.
///
/// Both buffers are immutable after upload and are released together.
#[derive(Debug, PartialEq, Eq)]
pub struct Mesh {
    vertex_buffer: BufferId,
    index_buffer: BufferId,
    index_count: u32,
}

impl Mesh {
    /// Validates and uploads `vertices` and `indices`.
    ///
    /// Indices must describe whole triangles and stay within the vertex range.
    pub fn upload(
        backend: &mut dyn GraphicsBackend,
        label: &str,
        vertices: &[Vertex],
        indices: &[u32],
    ) -> Result<Self, RenderError> {
        validate(label, vertices, indices)?;

        let vertex_buffer = backend.create_buffer(
            &format!("{label} vertices"),
            BufferKind::Vertex,
            bytemuck::cast_slice(vertices),
        )?;

        let index_buffer = match backend.create_buffer(
            &format!("{label} indices"),
            BufferKind::Index,
            bytemuck::cast_slice(indices),
        ) {
            Ok(id) => id,
            Err(e) => {
                backend.destroy_buffer(vertex_buffer);
                return Err(e);
            }
        };

        Ok(Self {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
        })
    }

    #[inline]
    pub fn vertex_buffer(&self) -> BufferId {
        self.vertex_buffer
    }

    #[inline]
    pub fn index_buffer(&self) -> BufferId {
        self.index_buffer
    }

    #[inline]
    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    pub fn bind(&self, cmds: &mut CommandList) {
        cmds.push(RenderCmd::BindVertexBuffer(self.vertex_buffer));
        cmds.push(RenderCmd::BindIndexBuffer(self.index_buffer));
    }

    /// Records one draw over the whole index buffer.
    pub fn draw(&self, cmds: &mut CommandList) {
        cmds.push(RenderCmd::DrawIndexed {
            index_count: self.index_count,
        });
    }

    pub fn unbind(&self, cmds: &mut CommandList) {
        cmds.push(RenderCmd::UnbindBuffers);
    }

    pub fn release(self, backend: &mut dyn GraphicsBackend) {
        backend.destroy_buffer(self.vertex_buffer);
        backend.destroy_buffer(self.index_buffer);
    }
}

fn validate(label: &str, vertices: &[Vertex], indices: &[u32]) -> Result<(), RenderError> {
    let invalid = |reason: String| RenderError::InvalidMesh {
        label: label.to_string(),
        reason,
    };

    if vertices.is_empty() || indices.is_empty() {
        return Err(invalid("mesh has no geometry".into()));
    }
    if indices.len() % 3 != 0 {
        return Err(invalid(format!(
            "index count {} is not a multiple of 3",
            indices.len()
        )));
    }
    if let Some(&bad) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
        return Err(invalid(format!(
            "index {bad} out of range for {} vertices",
            vertices.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri() -> [Vertex; 3] {
        [
            Vertex::new([0.0, 0.0, 0.0], [1.0, 0.0, 0.0, 1.0]),
            Vertex::new([1.0, 0.0, 0.0], [0.0, 1.0, 0.0, 1.0]),
            Vertex::new([0.0, 1.0, 0.0], [0.0, 0.0, 1.0, 1.0]),
        ]
    }

    #[test]
    fn vertex_is_tightly_packed() {
        assert_eq!(Vertex::STRIDE, 28);
        let layout = Vertex::layout();
        assert_eq!(layout.attributes[0].shader_location, 0);
        assert_eq!(layout.attributes[1].shader_location, 1);
        assert_eq!(layout.attributes[1].offset, 12);
    }

    #[test]
    fn rejects_partial_triangles() {
        let err = validate("t", &tri(), &[0, 1]).unwrap_err();
        assert!(matches!(err, RenderError::InvalidMesh { .. }));
    }

    #[test]
    fn rejects_out_of_range_index() {
        let err = validate("t", &tri(), &[0, 1, 3]).unwrap_err();
        assert!(err.to_string().contains("index 3 out of range"));
    }

    #[test]
    fn rejects_empty_mesh() {
        assert!(validate("t", &[], &[]).is_err());
        assert!(validate("t", &tri(), &[0, 1, 2]).is_ok());
    }
}
