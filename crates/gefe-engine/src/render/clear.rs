/// Amount removed from each channel per `fade_to_black` step.
pub const FADE_STEP: f32 = 0.1;

/// Fading stops once any channel is at or below this value.
pub const FADE_THRESHOLD: f32 = 0.01;

/// Straight-alpha RGBA color used to clear the frame.
///
/// Owned by the frame driver for the whole run; scenes mutate it through
/// their per-frame context.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ClearColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Default for ClearColor {
    fn default() -> Self {
        Self::WHITE
    }
}

impl ClearColor {
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);

    #[inline]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Whether another `fade_to_black` step would change the color.
    #[inline]
    pub fn can_fade(&self) -> bool {
        self.r > FADE_THRESHOLD && self.g > FADE_THRESHOLD && self.b > FADE_THRESHOLD
    }

    /// Darkens every color channel by one step, clamped at zero.
    ///
    /// Does nothing once any channel has reached the threshold. Alpha is left
    /// untouched. Returns whether the color changed.
    pub fn fade_to_black(&mut self) -> bool {
        if !self.can_fade() {
            return false;
        }
        self.r = (self.r - FADE_STEP).max(0.0);
        self.g = (self.g - FADE_STEP).max(0.0);
        self.b = (self.b - FADE_STEP).max(0.0);
        true
    }

    #[inline]
    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }
}
