//! Engine core: the frame driver and the contracts around it.
//!
//! The driver owns the graphics backend, the input state, the clear color and
//! the single active scene. A [`Platform`] supplies the window, the event pump
//! and the backend; scenes see one frame at a time through [`SceneCtx`].

mod config;
mod ctx;
mod driver;
mod error;
mod platform;

pub use config::EngineConfig;
pub use ctx::SceneCtx;
pub use driver::{DriverPhase, FrameDriver};
pub use error::EngineError;
pub use platform::Platform;
