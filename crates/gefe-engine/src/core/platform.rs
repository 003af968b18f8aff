use crate::device::GpuInit;
use crate::input::InputState;
use crate::render::GraphicsBackend;
use crate::window::WindowConfig;

use super::error::EngineError;

/// Window system + graphics context provider for the frame driver.
pub trait Platform {
    type Backend: GraphicsBackend;

    /// Creates the window and its graphics context.
    ///
    /// Called once per process; a second call fails with `ContextInit`.
    fn create_context(
        &mut self,
        window: &WindowConfig,
        gpu: &GpuInit,
    ) -> Result<Self::Backend, EngineError>;

    /// Processes pending window-system events, applying input to `input`.
    ///
    /// Returns the latest drawable size if the window was resized.
    fn poll_events(&mut self, input: &mut InputState) -> Option<(u32, u32)>;

    /// Whether the user asked to close the window.
    fn should_close(&self) -> bool;

    /// Destroys the window. Called once, after the backend is dropped.
    fn teardown(&mut self);
}
