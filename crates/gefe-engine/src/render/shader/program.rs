use std::path::{Path, PathBuf};

use glam::Mat4;
use wgpu::naga;

use super::compile::compile_stage;
use super::error::ShaderError;
use super::reflect::{link_interface, UniformKind, UniformSlot, UniformTable};
use super::source::{ShaderSource, ShaderStage};
use crate::render::backend::{GraphicsBackend, ProgramDesc, ProgramId, StageId};
use crate::render::cmd::{CommandList, RenderCmd};

/// Observable lifecycle phase of a [`ShaderProgram`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ProgramPhase {
    Parsed,
    Compiled,
    Linked,
    Released,
}

struct CompiledStage {
    id: StageId,
    module: naga::Module,
}

enum State {
    Parsed,
    Compiled {
        vertex: CompiledStage,
        fragment: CompiledStage,
    },
    Linked {
        program: ProgramId,
        vertex: StageId,
        fragment: StageId,
        uniforms: UniformTable,
    },
    Released,
}

/// Vertex + fragment program built from one shader asset.
///
/// Owns its stage and program handles exclusively. Handles are only ever
/// released through [`ShaderProgram::release`] (or a failed compile/link),
/// so a scene must call it before the backend goes away.
pub struct ShaderProgram {
    path: PathBuf,
    source: ShaderSource,
    state: State,
}

impl std::fmt::Debug for ShaderProgram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShaderProgram")
            .field("path", &self.path)
            .field("phase", &self.phase())
            .finish()
    }
}

impl ShaderProgram {
    /// Reads and parses the asset at `path`. Nothing is sent to the GPU yet.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ShaderError> {
        let path = path.as_ref();
        let source = ShaderSource::load(path)?;
        log::debug!("parsed shader `{}`", path.display());
        Ok(Self::from_parts(path.to_path_buf(), source))
    }

    /// Parses in-memory asset text; `label` stands in for the path in diagnostics.
    pub fn from_source(label: impl Into<PathBuf>, text: &str) -> Result<Self, ShaderError> {
        Ok(Self::from_parts(label.into(), ShaderSource::parse(text)?))
    }

    fn from_parts(path: PathBuf, source: ShaderSource) -> Self {
        Self {
            path,
            source,
            state: State::Parsed,
        }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub fn source(&self) -> &ShaderSource {
        &self.source
    }

    pub fn phase(&self) -> ProgramPhase {
        match self.state {
            State::Parsed => ProgramPhase::Parsed,
            State::Compiled { .. } => ProgramPhase::Compiled,
            State::Linked { .. } => ProgramPhase::Linked,
            State::Released => ProgramPhase::Released,
        }
    }

    /// Program handle, once linked.
    pub fn id(&self) -> Option<ProgramId> {
        match self.state {
            State::Linked { program, .. } => Some(program),
            _ => None,
        }
    }

    /// Stage handles currently owned by this program.
    pub fn stage_ids(&self) -> Option<(StageId, StageId)> {
        match &self.state {
            State::Compiled { vertex, fragment } => Some((vertex.id, fragment.id)),
            State::Linked {
                vertex, fragment, ..
            } => Some((*vertex, *fragment)),
            _ => None,
        }
    }

    /// Reflected uniform slot for `name`, once linked.
    pub fn uniform(&self, name: &str) -> Option<UniformSlot> {
        match &self.state {
            State::Linked { uniforms, .. } => uniforms.get(name),
            _ => None,
        }
    }

    fn invalid(&self, op: &'static str) -> ShaderError {
        ShaderError::InvalidState {
            path: self.path.clone(),
            op,
            phase: self.phase(),
        }
    }

    /// Compiles both stages and uploads them to the backend.
    ///
    /// On failure no stage handle is left behind and the program stays `Parsed`.
    pub fn compile(&mut self, backend: &mut dyn GraphicsBackend) -> Result<(), ShaderError> {
        if !matches!(self.state, State::Parsed) {
            return Err(self.invalid("compile"));
        }

        let vertex = self.compile_one(backend, ShaderStage::Vertex)?;
        let fragment = match self.compile_one(backend, ShaderStage::Fragment) {
            Ok(stage) => stage,
            Err(e) => {
                backend.destroy_shader_stage(vertex.id);
                return Err(e);
            }
        };

        self.state = State::Compiled { vertex, fragment };
        Ok(())
    }

    fn compile_one(
        &self,
        backend: &mut dyn GraphicsBackend,
        stage: ShaderStage,
    ) -> Result<CompiledStage, ShaderError> {
        let text = self.source.stage(stage);
        let module = compile_stage(stage, text).map_err(|log| {
            log::error!(
                "failed to compile {stage} stage of `{}`:\n{log}",
                self.path.display()
            );
            ShaderError::Compile {
                path: self.path.clone(),
                stage,
                log,
            }
        })?;

        let label = format!("{} ({stage})", self.path.display());
        let id = backend.create_shader_stage(&label, stage, &module)?;
        Ok(CompiledStage { id, module })
    }

    /// Checks the stage interfaces and links the program.
    ///
    /// On failure both stages are released and the program returns to `Parsed`.
    pub fn link(&mut self, backend: &mut dyn GraphicsBackend) -> Result<(), ShaderError> {
        if !matches!(self.state, State::Compiled { .. }) {
            return Err(self.invalid("link"));
        }
        let State::Compiled { vertex, fragment } = std::mem::replace(&mut self.state, State::Parsed)
        else {
            return Err(self.invalid("link"));
        };

        let uniforms = match link_interface(&vertex.module, &fragment.module) {
            Ok(table) => table,
            Err(problems) => {
                release_stages(backend, vertex.id, fragment.id);
                let log = problems.join("\n");
                log::error!("failed to link `{}`:\n{log}", self.path.display());
                return Err(ShaderError::Link {
                    path: self.path.clone(),
                    log,
                });
            }
        };

        let label = self.path.display().to_string();
        let desc = ProgramDesc {
            label: &label,
            vertex: vertex.id,
            fragment: fragment.id,
            uniform_blocks: uniforms.blocks(),
        };
        let program = match backend.create_program(&desc) {
            Ok(id) => id,
            Err(e) => {
                release_stages(backend, vertex.id, fragment.id);
                log::error!("failed to link `{}`: {e}", self.path.display());
                return Err(ShaderError::Link {
                    path: self.path.clone(),
                    log: e.to_string(),
                });
            }
        };

        log::debug!(
            "linked `{}` with {} uniform(s)",
            self.path.display(),
            uniforms.len()
        );
        self.state = State::Linked {
            program,
            vertex: vertex.id,
            fragment: fragment.id,
            uniforms,
        };
        Ok(())
    }

    /// Records binding this program. No-op unless linked.
    pub fn use_program(&self, cmds: &mut CommandList) {
        if let Some(id) = self.id() {
            cmds.push(RenderCmd::UseProgram(id));
        }
    }

    /// Records unbinding this program. No-op unless linked.
    pub fn detach(&self, cmds: &mut CommandList) {
        if self.id().is_some() {
            cmds.push(RenderCmd::DetachProgram);
        }
    }

    /// Records a matrix upload to the uniform called `name`.
    ///
    /// Unknown names, non-`mat4` uniforms and unlinked programs are ignored.
    pub fn upload_mat4(&self, cmds: &mut CommandList, name: &str, matrix: &Mat4) {
        let State::Linked {
            program, uniforms, ..
        } = &self.state
        else {
            log::trace!("upload of `{name}` ignored: `{}` is not linked", self.path.display());
            return;
        };

        match uniforms.get(name) {
            Some(UniformSlot {
                binding,
                offset,
                kind: UniformKind::Mat4,
            }) => cmds.push(RenderCmd::UploadMat4 {
                program: *program,
                binding,
                offset,
                matrix: matrix.to_cols_array(),
            }),
            Some(_) => log::trace!("upload of `{name}` ignored: not a mat4"),
            None => log::trace!("upload of `{name}` ignored: no such uniform"),
        }
    }

    /// Releases every GPU handle this program owns. Idempotent.
    pub fn release(&mut self, backend: &mut dyn GraphicsBackend) {
        match std::mem::replace(&mut self.state, State::Released) {
            State::Parsed | State::Released => {}
            State::Compiled { vertex, fragment } => {
                release_stages(backend, vertex.id, fragment.id);
            }
            State::Linked {
                program,
                vertex,
                fragment,
                ..
            } => {
                backend.destroy_program(program);
                release_stages(backend, vertex, fragment);
            }
        }
    }
}

fn release_stages(backend: &mut dyn GraphicsBackend, vertex: StageId, fragment: StageId) {
    backend.destroy_shader_stage(vertex);
    backend.destroy_shader_stage(fragment);
}
