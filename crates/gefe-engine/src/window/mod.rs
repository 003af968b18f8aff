//! Window + event pump.
//!
//! Owns the `winit` EventLoop and Window and implements
//! [`Platform`](crate::core::Platform) on top of them. The loop is driven by
//! the frame driver through `pump_app_events`, not by `run_app`.

mod config;
mod platform;

pub use config::WindowConfig;
pub use platform::WinitPlatform;
