//! gefe engine crate.
//!
//! A minimal 2D rendering runtime: a winit window with a wgpu context, a frame
//! driver that owns the active scene, and dual-stage GLSL shader programs.

pub mod core;
pub mod device;
pub mod input;
pub mod logging;
pub mod render;
pub mod scene;
pub mod time;
pub mod window;
