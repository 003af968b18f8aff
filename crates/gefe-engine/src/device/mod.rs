//! GPU device, surface and the wgpu graphics backend.
//!
//! `Gpu` owns the wgpu device/queue and the window surface. `WgpuBackend`
//! implements [`GraphicsBackend`](crate::render::GraphicsBackend) on top of it.

mod backend;
mod gpu;

pub use backend::WgpuBackend;
pub use gpu::{Gpu, GpuFrame, GpuInit, SurfaceErrorAction};
