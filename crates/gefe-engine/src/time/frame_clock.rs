use std::time::Instant;

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Wall-clock time elapsed since the previous tick, in seconds.
    pub dt: f32,

    /// Informational frames-per-second value, `1 / |dt|`.
    pub fps: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic frame counter, starting at 0 for the first measured frame.
    pub frame_index: u64,
}

/// Frame clock producing `FrameTime` snapshots.
///
/// The first tick only records a baseline and returns `None`: there is no
/// previous iteration to measure against yet. Every later tick measures the
/// time since the tick before it. No clamping is applied; the loop is paced
/// by vsync alone.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last: Option<Instant>,
    frame_index: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets the baseline so the next tick yields `None` again.
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Returns `true` once a baseline has been recorded.
    pub fn is_started(&self) -> bool {
        self.last.is_some()
    }

    /// Advances the clock using the current time.
    pub fn tick(&mut self) -> Option<FrameTime> {
        self.tick_at(Instant::now())
    }

    /// Advances the clock to `now`.
    pub fn tick_at(&mut self, now: Instant) -> Option<FrameTime> {
        let prev = self.last.replace(now)?;
        let dt = now.saturating_duration_since(prev).as_secs_f32();

        let ft = FrameTime {
            dt,
            fps: fps_from_dt(dt),
            now,
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        Some(ft)
    }
}

/// Frames per second for a frame that took `dt` seconds.
///
/// A zero delta yields `f32::INFINITY`.
#[inline]
pub fn fps_from_dt(dt: f32) -> f32 {
    (1.0 / dt).abs()
}
