//! Time subsystem.
//!
//! Frame timing for the frame driver, kept free of any windowing types:
//! - one `FrameClock` per frame loop
//! - call `tick()` once per iteration; the first tick yields no delta

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime, fps_from_dt};
