use std::path::Path;

use crate::render::shader::ShaderProgram;
use crate::render::{Camera, CommandList, GraphicsBackend, Mesh, Vertex};

use super::SceneError;

/// A mesh drawn with its own shader program.
///
/// Both halves are acquired together and released together.
#[derive(Debug)]
pub struct ShadedMesh {
    shader: ShaderProgram,
    mesh: Mesh,
}

impl ShadedMesh {
    /// Loads, compiles and links the shader at `shader_path`, then uploads the
    /// geometry. Nothing is left on the GPU if any step fails.
    pub fn create(
        backend: &mut dyn GraphicsBackend,
        shader_path: &Path,
        label: &str,
        vertices: &[Vertex],
        indices: &[u32],
    ) -> Result<Self, SceneError> {
        let mut shader = ShaderProgram::load(shader_path)?;
        shader.compile(backend)?;
        shader.link(backend)?;

        let mesh = match Mesh::upload(backend, label, vertices, indices) {
            Ok(mesh) => mesh,
            Err(e) => {
                shader.release(backend);
                return Err(e.into());
            }
        };

        Ok(Self { shader, mesh })
    }

    pub fn shader(&self) -> &ShaderProgram {
        &self.shader
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Records the full draw sequence for one frame.
    pub fn draw(&self, camera: &Camera, cmds: &mut CommandList) {
        self.shader.use_program(cmds);
        self.shader
            .upload_mat4(cmds, "uProjectionMatrix", &camera.projection_matrix());
        self.shader
            .upload_mat4(cmds, "uViewMatrix", &camera.view_matrix());

        self.mesh.bind(cmds);
        self.mesh.draw(cmds);
        self.mesh.unbind(cmds);

        self.shader.detach(cmds);
    }

    pub fn release(mut self, backend: &mut dyn GraphicsBackend) {
        self.mesh.release(backend);
        self.shader.release(backend);
    }
}
