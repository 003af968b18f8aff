use crate::input::InputState;
use crate::render::{ClearColor, CommandList, FrameStatus, GraphicsBackend};
use crate::scene::{Scene, SceneId};
use crate::time::{FrameClock, FrameTime};

use super::config::EngineConfig;
use super::ctx::SceneCtx;
use super::error::EngineError;
use super::platform::Platform;

/// Lifecycle of a [`FrameDriver`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DriverPhase {
    Uninitialized,
    Initialized,
    Running,
    Terminated,
}

/// Owns the graphics context and the active scene, and runs the frame loop.
///
/// One iteration (see [`FrameDriver::frame`]):
/// poll events → begin frame → update scene → present → end input frame →
/// apply scene switch → measure delta time.
pub struct FrameDriver<P: Platform> {
    platform: P,
    config: EngineConfig,
    phase: DriverPhase,

    backend: Option<P::Backend>,
    scene: Option<Box<dyn Scene>>,
    active: Option<SceneId>,
    pending_switch: Option<SceneId>,

    input: InputState,
    clear_color: ClearColor,
    commands: CommandList,

    clock: FrameClock,
    delta: Option<f32>,
    fps: f32,
    fps_window: FpsWindow,
}

/// Accumulates frame times for the once-per-second fps log.
#[derive(Debug, Default)]
struct FpsWindow {
    elapsed: f32,
    frames: u32,
}

impl FpsWindow {
    fn push(&mut self, dt: f32) {
        self.elapsed += dt;
        self.frames += 1;
        if self.elapsed >= 1.0 {
            log::debug!("fps: {:.1}", self.frames as f32 / self.elapsed);
            *self = Self::default();
        }
    }
}

impl<P: Platform> FrameDriver<P> {
    pub fn new(platform: P, config: EngineConfig) -> Self {
        let clear_color = config.clear_color;
        Self {
            platform,
            config,
            phase: DriverPhase::Uninitialized,
            backend: None,
            scene: None,
            active: None,
            pending_switch: None,
            input: InputState::default(),
            clear_color,
            commands: CommandList::new(),
            clock: FrameClock::new(),
            delta: None,
            fps: 0.0,
            fps_window: FpsWindow::default(),
        }
    }

    fn expect_phase(&self, expected: DriverPhase) -> Result<(), EngineError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(EngineError::InvalidState {
                expected,
                actual: self.phase,
            })
        }
    }

    /// Creates the window and graphics context, then enters the default scene.
    pub fn init(&mut self) -> Result<(), EngineError> {
        self.expect_phase(DriverPhase::Uninitialized)?;

        log::info!("initializing `{}`", self.config.window.title);
        let backend = self
            .platform
            .create_context(&self.config.window, &self.config.gpu)?;
        self.backend = Some(backend);
        self.phase = DriverPhase::Initialized;

        self.switch_to(self.config.default_scene);

        // Start the clock so the first frame measures a delta but does not
        // update.
        self.clock.reset();
        self.clock.tick();
        Ok(())
    }

    /// Replaces the active scene with the one registered under `id`.
    ///
    /// Unknown ids are fatal. A scene that fails to initialize leaves no
    /// scene active; frames keep being cleared.
    pub fn change_scene(&mut self, id: i32) -> Result<(), EngineError> {
        let id = SceneId::try_from(id)?;
        if self.backend.is_none() {
            return Err(EngineError::InvalidState {
                expected: DriverPhase::Initialized,
                actual: self.phase,
            });
        }
        self.switch_to(id);
        Ok(())
    }

    fn switch_to(&mut self, id: SceneId) {
        let Some(backend) = self.backend.as_mut() else {
            return;
        };

        if let Some(mut old) = self.scene.take() {
            old.release(backend);
            log::debug!("released scene {}", old.name());
        }
        self.active = None;

        let mut scene = id.build(&self.config.scenes);
        match scene.init(backend) {
            Ok(()) => {
                log::info!("entered scene {}", scene.name());
                self.scene = Some(scene);
                self.active = Some(id);
            }
            Err(e) => {
                log::error!("failed to initialize scene {}: {e}", scene.name());
                scene.release(backend);
            }
        }
    }

    /// Initializes, runs the loop until the window closes, then tears down.
    ///
    /// Teardown happens even when init or the loop fail; the first error is
    /// returned.
    pub fn run(&mut self) -> Result<(), EngineError> {
        let result = self.init().and_then(|()| self.render());
        self.teardown();
        result
    }

    /// Runs frames until the platform requests close.
    ///
    /// Frames may already have been run by hand with [`FrameDriver::frame`].
    pub fn render(&mut self) -> Result<(), EngineError> {
        if !matches!(self.phase, DriverPhase::Initialized | DriverPhase::Running) {
            return Err(EngineError::InvalidState {
                expected: DriverPhase::Initialized,
                actual: self.phase,
            });
        }
        self.phase = DriverPhase::Running;

        while !self.platform.should_close() {
            self.frame()?;
        }
        log::info!("close requested");
        Ok(())
    }

    /// Runs one iteration of the frame loop.
    pub fn frame(&mut self) -> Result<(), EngineError> {
        if !matches!(self.phase, DriverPhase::Initialized | DriverPhase::Running) {
            return Err(EngineError::InvalidState {
                expected: DriverPhase::Running,
                actual: self.phase,
            });
        }
        self.phase = DriverPhase::Running;

        let resized = self.platform.poll_events(&mut self.input);

        let Some(backend) = self.backend.as_mut() else {
            return Err(EngineError::InvalidState {
                expected: DriverPhase::Running,
                actual: self.phase,
            });
        };
        if let Some((w, h)) = resized {
            backend.resize(w, h);
        }

        self.commands.clear();
        if backend.begin_frame(self.clear_color) == FrameStatus::Lost {
            return Err(EngineError::SurfaceLost);
        }

        if let (Some(dt), Some(scene)) = (self.delta, self.scene.as_mut()) {
            let mut ctx = SceneCtx::new(
                &self.input,
                &mut self.clear_color,
                &mut self.commands,
                &mut self.pending_switch,
            );
            scene.update(dt, &mut ctx);
        }

        backend.present(&self.commands)?;
        self.input.end_frame();

        if let Some(id) = self.pending_switch.take() {
            self.switch_to(id);
        }

        if let Some(FrameTime { dt, fps, .. }) = self.clock.tick() {
            self.delta = Some(dt);
            self.fps = fps;
            self.fps_window.push(dt);
        }
        Ok(())
    }

    /// Releases the scene, drops the backend and destroys the window.
    pub fn teardown(&mut self) {
        if self.phase == DriverPhase::Terminated {
            return;
        }

        if let (Some(mut scene), Some(backend)) = (self.scene.take(), self.backend.as_mut()) {
            scene.release(backend);
        }
        self.scene = None;
        self.active = None;
        self.pending_switch = None;
        self.backend = None;

        self.platform.teardown();
        self.phase = DriverPhase::Terminated;
        log::info!("frame driver terminated");
    }

    /// Frames per second derived from the last delta time (`1 / |dt|`).
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Delta time the next update will receive, if any.
    #[inline]
    pub fn delta_time(&self) -> Option<f32> {
        self.delta
    }

    #[inline]
    pub fn phase(&self) -> DriverPhase {
        self.phase
    }

    #[inline]
    pub fn active_scene(&self) -> Option<SceneId> {
        self.active
    }

    #[inline]
    pub fn scene(&self) -> Option<&dyn Scene> {
        self.scene.as_deref()
    }

    #[inline]
    pub fn clear_color(&self) -> ClearColor {
        self.clear_color
    }

    #[inline]
    pub fn input(&self) -> &InputState {
        &self.input
    }

    #[inline]
    pub fn platform(&self) -> &P {
        &self.platform
    }

    #[inline]
    pub fn backend(&self) -> Option<&P::Backend> {
        self.backend.as_ref()
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl<P: Platform> Drop for FrameDriver<P> {
    fn drop(&mut self) {
        // Scenes must give their handles back before the backend goes away.
        self.teardown();
    }
}
