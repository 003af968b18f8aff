#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

use gefe_engine::core::{EngineError, Platform};
use gefe_engine::device::GpuInit;
use gefe_engine::input::{ButtonState, InputEvent, InputState, Key};
use gefe_engine::render::shader::ShaderStage;
use gefe_engine::render::{
    BufferId, BufferKind, ClearColor, CommandList, FrameStatus, GraphicsBackend, ProgramDesc,
    ProgramId, RenderCmd, RenderError, StageId, UniformBlock,
};
use gefe_engine::window::WindowConfig;

pub fn shipped_shader() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/assets/shaders/default.glsl")
}

pub fn space(state: ButtonState) -> InputEvent {
    InputEvent::Key {
        key: Key::Space,
        state,
        repeat: false,
    }
}

/// Everything a [`RecordingBackend`] saw, shared with the test.
#[derive(Debug, Default)]
pub struct BackendLog {
    pub buffers: BTreeMap<BufferId, (BufferKind, usize)>,
    pub stages: BTreeMap<StageId, ShaderStage>,
    pub programs: BTreeMap<ProgramId, Vec<UniformBlock>>,

    pub destroyed_buffers: Vec<BufferId>,
    pub destroyed_stages: Vec<StageId>,
    pub destroyed_programs: Vec<ProgramId>,

    /// Command streams of presented frames, in order.
    pub frames: Vec<Vec<RenderCmd>>,
    pub clears: Vec<ClearColor>,
    pub resizes: Vec<(u32, u32)>,
}

impl BackendLog {
    pub fn live_count(&self) -> usize {
        self.buffers.len() + self.stages.len() + self.programs.len()
    }

    pub fn last_frame(&self) -> &[RenderCmd] {
        self.frames.last().map(Vec::as_slice).unwrap_or(&[])
    }
}

pub type SharedLog = Rc<RefCell<BackendLog>>;

/// In-memory backend that validates handles like a real one would.
///
/// `begin_frame` answers from `statuses` in order, then `Ready` once the
/// queue is empty.
pub struct RecordingBackend {
    log: SharedLog,
    next_id: u64,
    frame: Option<ClearColor>,
    pub statuses: VecDeque<FrameStatus>,
}

impl RecordingBackend {
    pub fn new() -> (Self, SharedLog) {
        let log = SharedLog::default();
        (Self::with_log(Rc::clone(&log)), log)
    }

    pub fn with_log(log: SharedLog) -> Self {
        Self {
            log,
            next_id: 1,
            frame: None,
            statuses: VecDeque::new(),
        }
    }

    fn next(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl GraphicsBackend for RecordingBackend {
    fn create_buffer(
        &mut self,
        _label: &str,
        kind: BufferKind,
        contents: &[u8],
    ) -> Result<BufferId, RenderError> {
        let id = BufferId::from_raw(self.next());
        self.log.borrow_mut().buffers.insert(id, (kind, contents.len()));
        Ok(id)
    }

    fn destroy_buffer(&mut self, id: BufferId) {
        let mut log = self.log.borrow_mut();
        if log.buffers.remove(&id).is_some() {
            log.destroyed_buffers.push(id);
        }
    }

    fn create_shader_stage(
        &mut self,
        _label: &str,
        stage: ShaderStage,
        _module: &wgpu::naga::Module,
    ) -> Result<StageId, RenderError> {
        let id = StageId::from_raw(self.next());
        self.log.borrow_mut().stages.insert(id, stage);
        Ok(id)
    }

    fn destroy_shader_stage(&mut self, id: StageId) {
        let mut log = self.log.borrow_mut();
        if log.stages.remove(&id).is_some() {
            log.destroyed_stages.push(id);
        }
    }

    fn create_program(&mut self, desc: &ProgramDesc<'_>) -> Result<ProgramId, RenderError> {
        for stage in [desc.vertex, desc.fragment] {
            if !self.log.borrow().stages.contains_key(&stage) {
                return Err(RenderError::UnknownResource {
                    kind: "stage",
                    id: stage.raw(),
                });
            }
        }
        let id = ProgramId::from_raw(self.next());
        self.log
            .borrow_mut()
            .programs
            .insert(id, desc.uniform_blocks.to_vec());
        Ok(id)
    }

    fn destroy_program(&mut self, id: ProgramId) {
        let mut log = self.log.borrow_mut();
        if log.programs.remove(&id).is_some() {
            log.destroyed_programs.push(id);
        }
    }

    fn begin_frame(&mut self, clear: ClearColor) -> FrameStatus {
        let status = self.statuses.pop_front().unwrap_or(FrameStatus::Ready);
        self.frame = (status == FrameStatus::Ready).then_some(clear);
        status
    }

    fn present(&mut self, commands: &CommandList) -> Result<(), RenderError> {
        let Some(clear) = self.frame.take() else {
            return Ok(());
        };

        let mut log = self.log.borrow_mut();
        for cmd in commands.iter() {
            let known = match *cmd {
                RenderCmd::UseProgram(id) | RenderCmd::UploadMat4 { program: id, .. } => {
                    log.programs.contains_key(&id)
                }
                RenderCmd::BindVertexBuffer(id) | RenderCmd::BindIndexBuffer(id) => {
                    log.buffers.contains_key(&id)
                }
                _ => true,
            };
            if !known {
                return Err(RenderError::UnknownResource {
                    kind: "handle",
                    id: 0,
                });
            }
        }

        log.clears.push(clear);
        log.frames.push(commands.as_slice().to_vec());
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.log.borrow_mut().resizes.push((width, height));
    }
}

/// Platform that feeds queued events, one batch per poll, and closes after a
/// fixed number of frames.
pub struct ScriptedPlatform {
    pub log: SharedLog,
    pub script: VecDeque<Vec<InputEvent>>,
    /// Size reported by the poll of a given frame (0-based).
    pub resizes: BTreeMap<usize, (u32, u32)>,
    /// Handed to the backend when the context is created.
    pub frame_statuses: VecDeque<FrameStatus>,
    pub frames_left: usize,
    pub fail_context: bool,

    pub contexts_created: usize,
    pub polls: usize,
    pub torn_down: bool,
}

impl ScriptedPlatform {
    pub fn new(frames: usize) -> Self {
        Self {
            log: SharedLog::default(),
            script: VecDeque::new(),
            resizes: BTreeMap::new(),
            frame_statuses: VecDeque::new(),
            frames_left: frames,
            fail_context: false,
            contexts_created: 0,
            polls: 0,
            torn_down: false,
        }
    }

    /// Queues `events` for the poll of frame `index` (0-based).
    pub fn at_frame(mut self, index: usize, events: Vec<InputEvent>) -> Self {
        while self.script.len() <= index {
            self.script.push_back(Vec::new());
        }
        self.script[index] = events;
        self
    }

    /// Reports a resize to `size` during the poll of frame `index`.
    pub fn resize_at(mut self, index: usize, size: (u32, u32)) -> Self {
        self.resizes.insert(index, size);
        self
    }

    /// Frame statuses the backend returns from `begin_frame`, in order.
    pub fn with_frame_statuses(mut self, statuses: impl IntoIterator<Item = FrameStatus>) -> Self {
        self.frame_statuses = statuses.into_iter().collect();
        self
    }
}

impl Platform for ScriptedPlatform {
    type Backend = RecordingBackend;

    fn create_context(
        &mut self,
        _window: &WindowConfig,
        _gpu: &GpuInit,
    ) -> Result<RecordingBackend, EngineError> {
        if self.fail_context {
            return Err(EngineError::ContextInit("scripted failure".into()));
        }
        self.contexts_created += 1;
        let mut backend = RecordingBackend::with_log(Rc::clone(&self.log));
        backend.statuses = std::mem::take(&mut self.frame_statuses);
        Ok(backend)
    }

    fn poll_events(&mut self, input: &mut InputState) -> Option<(u32, u32)> {
        let frame = self.polls;
        self.polls += 1;
        self.frames_left = self.frames_left.saturating_sub(1);
        for ev in self.script.pop_front().unwrap_or_default() {
            input.apply_event(ev);
        }
        self.resizes.remove(&frame)
    }

    fn should_close(&self) -> bool {
        self.frames_left == 0
    }

    fn teardown(&mut self) {
        self.torn_down = true;
    }
}
