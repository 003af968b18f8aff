use std::borrow::Cow;
use std::collections::HashMap;

use wgpu::util::DeviceExt;

use super::gpu::{Gpu, GpuFrame, SurfaceErrorAction};
use crate::render::shader::ShaderStage;
use crate::render::{
    BufferId, BufferKind, ClearColor, CommandList, FrameStatus, GraphicsBackend, ProgramDesc,
    ProgramId, RenderCmd, RenderError, StageId, Vertex,
};

struct GpuBuffer {
    buffer: wgpu::Buffer,
    kind: BufferKind,
}

struct GpuProgram {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    /// One buffer per uniform block, keyed by binding.
    uniforms: Vec<(u32, wgpu::Buffer)>,
}

impl GpuProgram {
    fn uniform(&self, binding: u32) -> Option<&wgpu::Buffer> {
        self.uniforms
            .iter()
            .find(|(b, _)| *b == binding)
            .map(|(_, buf)| buf)
    }
}

struct PendingFrame {
    frame: GpuFrame,
    clear: ClearColor,
}

/// [`GraphicsBackend`] on top of wgpu.
///
/// Resources live in id-keyed tables. Uniform uploads recorded for a frame
/// are written to their buffers before the frame's render pass runs, so the
/// last upload to a slot wins for the whole frame.
pub struct WgpuBackend {
    gpu: Gpu,
    next_id: u64,

    buffers: HashMap<BufferId, GpuBuffer>,
    stages: HashMap<StageId, wgpu::ShaderModule>,
    programs: HashMap<ProgramId, GpuProgram>,

    frame: Option<PendingFrame>,
}

impl WgpuBackend {
    pub fn new(gpu: Gpu) -> Self {
        Self {
            gpu,
            next_id: 1,
            buffers: HashMap::new(),
            stages: HashMap::new(),
            programs: HashMap::new(),
            frame: None,
        }
    }

    pub fn gpu(&self) -> &Gpu {
        &self.gpu
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Rejects command streams that reference handles this backend does not own.
    fn check(&self, commands: &CommandList) -> Result<(), RenderError> {
        for cmd in commands.iter() {
            match *cmd {
                RenderCmd::UseProgram(id) => self.program(id).map(|_| ())?,
                RenderCmd::UploadMat4 {
                    program, binding, ..
                } => {
                    self.program(program)?
                        .uniform(binding)
                        .ok_or(RenderError::UnknownResource {
                            kind: "uniform block",
                            id: binding as u64,
                        })?;
                }
                RenderCmd::BindVertexBuffer(id) => self.buffer(id, BufferKind::Vertex)?,
                RenderCmd::BindIndexBuffer(id) => self.buffer(id, BufferKind::Index)?,
                RenderCmd::DrawIndexed { .. }
                | RenderCmd::UnbindBuffers
                | RenderCmd::DetachProgram => {}
            }
        }
        Ok(())
    }

    fn program(&self, id: ProgramId) -> Result<&GpuProgram, RenderError> {
        self.programs.get(&id).ok_or(RenderError::UnknownResource {
            kind: ProgramId::KIND,
            id: id.raw(),
        })
    }

    fn buffer(&self, id: BufferId, kind: BufferKind) -> Result<(), RenderError> {
        match self.buffers.get(&id) {
            Some(b) if b.kind == kind => Ok(()),
            _ => Err(RenderError::UnknownResource {
                kind: BufferId::KIND,
                id: id.raw(),
            }),
        }
    }

    fn write_uniforms(&self, commands: &CommandList) {
        for cmd in commands.iter() {
            if let RenderCmd::UploadMat4 {
                program,
                binding,
                offset,
                ref matrix,
            } = *cmd
            {
                if let Some(buf) = self.programs.get(&program).and_then(|p| p.uniform(binding)) {
                    self.gpu
                        .queue()
                        .write_buffer(buf, offset as u64, bytemuck::cast_slice(matrix));
                }
            }
        }
    }

    fn replay(&self, rpass: &mut wgpu::RenderPass<'_>, commands: &CommandList) {
        let mut program_bound = false;
        let mut vertex_bound = false;
        let mut index_bound = false;

        for cmd in commands.iter() {
            match *cmd {
                RenderCmd::UseProgram(id) => {
                    if let Some(p) = self.programs.get(&id) {
                        rpass.set_pipeline(&p.pipeline);
                        rpass.set_bind_group(0, &p.bind_group, &[]);
                        program_bound = true;
                    }
                }
                RenderCmd::UploadMat4 { .. } => {}
                RenderCmd::BindVertexBuffer(id) => {
                    if let Some(b) = self.buffers.get(&id) {
                        rpass.set_vertex_buffer(0, b.buffer.slice(..));
                        vertex_bound = true;
                    }
                }
                RenderCmd::BindIndexBuffer(id) => {
                    if let Some(b) = self.buffers.get(&id) {
                        rpass.set_index_buffer(b.buffer.slice(..), wgpu::IndexFormat::Uint32);
                        index_bound = true;
                    }
                }
                RenderCmd::DrawIndexed { index_count } => {
                    if program_bound && vertex_bound && index_bound {
                        rpass.draw_indexed(0..index_count, 0, 0..1);
                    } else {
                        log::warn!("draw skipped: program or buffers not bound");
                    }
                }
                RenderCmd::UnbindBuffers => {
                    vertex_bound = false;
                    index_bound = false;
                }
                RenderCmd::DetachProgram => program_bound = false,
            }
        }
    }
}

impl GraphicsBackend for WgpuBackend {
    fn create_buffer(
        &mut self,
        label: &str,
        kind: BufferKind,
        contents: &[u8],
    ) -> Result<BufferId, RenderError> {
        let usage = match kind {
            BufferKind::Vertex => wgpu::BufferUsages::VERTEX,
            BufferKind::Index => wgpu::BufferUsages::INDEX,
        };
        let buffer = self
            .gpu
            .device()
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage,
            });

        let id = BufferId::from_raw(self.next_id());
        self.buffers.insert(id, GpuBuffer { buffer, kind });
        Ok(id)
    }

    fn destroy_buffer(&mut self, id: BufferId) {
        if let Some(b) = self.buffers.remove(&id) {
            b.buffer.destroy();
        }
    }

    fn create_shader_stage(
        &mut self,
        label: &str,
        _stage: ShaderStage,
        module: &wgpu::naga::Module,
    ) -> Result<StageId, RenderError> {
        let module = self
            .gpu
            .device()
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(label),
                source: wgpu::ShaderSource::Naga(Cow::Owned(module.clone())),
            });

        let id = StageId::from_raw(self.next_id());
        self.stages.insert(id, module);
        Ok(id)
    }

    fn destroy_shader_stage(&mut self, id: StageId) {
        self.stages.remove(&id);
    }

    fn create_program(&mut self, desc: &ProgramDesc<'_>) -> Result<ProgramId, RenderError> {
        let stage = |id: StageId| {
            self.stages.get(&id).ok_or(RenderError::UnknownResource {
                kind: StageId::KIND,
                id: id.raw(),
            })
        };
        let vs = stage(desc.vertex)?;
        let fs = stage(desc.fragment)?;
        let device = self.gpu.device();

        let layout_entries: Vec<wgpu::BindGroupLayoutEntry> = desc
            .uniform_blocks
            .iter()
            .map(|block| {
                let mut visibility = wgpu::ShaderStages::NONE;
                if block.visibility.vertex {
                    visibility |= ShaderStage::Vertex.to_wgpu();
                }
                if block.visibility.fragment {
                    visibility |= ShaderStage::Fragment.to_wgpu();
                }
                wgpu::BindGroupLayoutEntry {
                    binding: block.binding,
                    visibility,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(block.size as u64),
                    },
                    count: None,
                }
            })
            .collect();

        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(desc.label),
            entries: &layout_entries,
        });

        let uniforms: Vec<(u32, wgpu::Buffer)> = desc
            .uniform_blocks
            .iter()
            .map(|block| {
                let buffer = device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some(desc.label),
                    size: block.size as u64,
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                });
                (block.binding, buffer)
            })
            .collect();

        let bind_entries: Vec<wgpu::BindGroupEntry<'_>> = uniforms
            .iter()
            .map(|(binding, buffer)| wgpu::BindGroupEntry {
                binding: *binding,
                resource: buffer.as_entire_binding(),
            })
            .collect();

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(desc.label),
            layout: &bgl,
            entries: &bind_entries,
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(desc.label),
            bind_group_layouts: &[&bgl],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(desc.label),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: vs,
                entry_point: Some("main"),
                compilation_options: Default::default(),
                buffers: &[Vertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: fs,
                entry_point: Some("main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.gpu.surface_format(),
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let id = ProgramId::from_raw(self.next_id());
        self.programs.insert(
            id,
            GpuProgram {
                pipeline,
                bind_group,
                uniforms,
            },
        );
        Ok(id)
    }

    fn destroy_program(&mut self, id: ProgramId) {
        if let Some(p) = self.programs.remove(&id) {
            for (_, buf) in p.uniforms {
                buf.destroy();
            }
        }
    }

    fn begin_frame(&mut self, clear: ClearColor) -> FrameStatus {
        // A frame that was begun but never presented is discarded.
        self.frame = None;

        match self.gpu.acquire() {
            Ok(frame) => {
                self.frame = Some(PendingFrame { frame, clear });
                FrameStatus::Ready
            }
            Err(err) => {
                let reason = err.to_string();
                match self.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {
                        log::debug!("frame skipped: {reason}");
                        FrameStatus::Skipped
                    }
                    SurfaceErrorAction::Fatal => {
                        log::error!("surface lost: {reason}");
                        FrameStatus::Lost
                    }
                }
            }
        }
    }

    fn present(&mut self, commands: &CommandList) -> Result<(), RenderError> {
        let Some(PendingFrame { frame, clear }) = self.frame.take() else {
            return Ok(());
        };

        // An invalid stream still presents the cleared frame.
        let checked = self.check(commands);
        if checked.is_ok() {
            self.write_uniforms(commands);
        }

        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("gefe frame encoder"),
            });

        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("gefe frame pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear.to_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if checked.is_ok() {
                self.replay(&mut rpass, commands);
            }
        }

        self.gpu.submit(frame, encoder);
        checked
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(winit::dpi::PhysicalSize::new(width, height));
    }
}

impl Drop for WgpuBackend {
    fn drop(&mut self) {
        let alive = self.buffers.len() + self.stages.len() + self.programs.len();
        if alive > 0 {
            log::warn!("{alive} GPU resource(s) still alive at backend teardown");
        }
    }
}
