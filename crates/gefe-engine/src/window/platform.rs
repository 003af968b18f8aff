use std::sync::Arc;
use std::time::Duration;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowId};

use super::config::WindowConfig;
use crate::core::{EngineError, Platform};
use crate::device::{Gpu, GpuInit, WgpuBackend};
#[cfg(feature = "gamepad")]
use crate::input::platform::gamepad::GamepadSource;
use crate::input::platform::winit::{resized, translate_window_event};
use crate::input::{InputEvent, InputState};

/// Pumps allowed for the platform to deliver `resumed` at startup.
const STARTUP_PUMPS: usize = 64;

/// Desktop platform backed by winit and wgpu.
///
/// Window-system and gamepad events are only processed inside
/// [`Platform::poll_events`]; between polls the window is not serviced.
#[derive(Default)]
pub struct WinitPlatform {
    event_loop: Option<EventLoop<()>>,
    handler: Handler,
    created: bool,
    #[cfg(feature = "gamepad")]
    gamepads: Option<GamepadSource>,
}

impl WinitPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// The main window, once created.
    pub fn window(&self) -> Option<&Window> {
        self.handler.window.as_deref()
    }

    fn pump(&mut self) -> PumpStatus {
        match self.event_loop.as_mut() {
            Some(el) => el.pump_app_events(Some(Duration::ZERO), &mut self.handler),
            None => PumpStatus::Continue,
        }
    }
}

#[derive(Default)]
struct Handler {
    /// Window to create on the next `resumed`.
    pending: Option<WindowConfig>,
    window: Option<Arc<Window>>,
    create_error: Option<String>,

    events: Vec<InputEvent>,
    resized: Option<PhysicalSize<u32>>,
    close_requested: bool,
}

impl ApplicationHandler for Handler {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let Some(config) = self.pending.take() else {
            return;
        };

        let (w, h) = config.initial_size;
        let attrs = Window::default_attributes()
            .with_title(config.title)
            .with_inner_size(LogicalSize::new(w as f64, h as f64))
            .with_resizable(config.resizable)
            .with_maximized(config.maximized)
            // Shown once the GPU context is ready.
            .with_visible(false);

        match event_loop.create_window(attrs) {
            Ok(window) => self.window = Some(Arc::new(window)),
            Err(e) => self.create_error = Some(format!("failed to create window: {e}")),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Poll);
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.as_ref() else {
            return;
        };
        if window.id() != window_id {
            return;
        }

        match &event {
            WindowEvent::CloseRequested => self.close_requested = true,
            WindowEvent::Resized(size) => self.resized = Some(*size),
            WindowEvent::ScaleFactorChanged { .. } => self.resized = Some(window.inner_size()),
            _ => {}
        }

        if let Some(ev) = translate_window_event(window, &event) {
            self.events.push(ev);
        }
    }
}

impl Platform for WinitPlatform {
    type Backend = WgpuBackend;

    fn create_context(
        &mut self,
        window: &WindowConfig,
        gpu: &GpuInit,
    ) -> Result<WgpuBackend, EngineError> {
        if self.created {
            return Err(EngineError::ContextInit(
                "a window context already exists for this process".to_string(),
            ));
        }
        self.created = true;

        // winit refuses a second event loop per process.
        let event_loop = EventLoop::new()
            .map_err(|e| EngineError::ContextInit(format!("failed to create event loop: {e}")))?;
        event_loop.set_control_flow(ControlFlow::Poll);
        self.event_loop = Some(event_loop);
        self.handler.pending = Some(window.clone());

        for _ in 0..STARTUP_PUMPS {
            if let PumpStatus::Exit(code) = self.pump() {
                return Err(EngineError::ContextInit(format!(
                    "event loop exited during startup (code {code})"
                )));
            }
            if self.handler.window.is_some() || self.handler.create_error.is_some() {
                break;
            }
        }

        if let Some(e) = self.handler.create_error.take() {
            return Err(EngineError::ContextInit(e));
        }
        let window = self
            .handler
            .window
            .clone()
            .ok_or_else(|| EngineError::ContextInit("window was never created".to_string()))?;

        let gpu = pollster::block_on(Gpu::new(Arc::clone(&window), gpu))
            .map_err(|e| EngineError::ContextInit(format!("{e:#}")))?;

        window.set_visible(true);
        // Scenes see the initial size even if the platform never sends a
        // resize.
        self.handler.events.push(resized(&window, window.inner_size()));

        #[cfg(feature = "gamepad")]
        {
            self.gamepads = GamepadSource::new();
        }

        log::info!(
            "created window `{}` ({}x{} physical)",
            window.title(),
            gpu.size().width,
            gpu.size().height
        );

        Ok(WgpuBackend::new(gpu))
    }

    fn poll_events(&mut self, input: &mut InputState) -> Option<(u32, u32)> {
        if let PumpStatus::Exit(_) = self.pump() {
            self.handler.close_requested = true;
        }
        #[cfg(feature = "gamepad")]
        {
            if let Some(gamepads) = self.gamepads.as_mut() {
                gamepads.drain_into(&mut self.handler.events);
            }
        }

        for ev in self.handler.events.drain(..) {
            input.apply_event(ev);
        }
        self.handler.resized.take().map(|s| (s.width, s.height))
    }

    fn should_close(&self) -> bool {
        self.handler.close_requested
    }

    fn teardown(&mut self) {
        if let Some(window) = self.handler.window.take() {
            window.set_visible(false);
            log::debug!("main window destroyed");
        }
        self.handler.events.clear();
        #[cfg(feature = "gamepad")]
        {
            self.gamepads = None;
        }
        self.event_loop = None;
    }
}
