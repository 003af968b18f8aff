use glam::{Mat4, Vec2, Vec3};

/// Z coordinate of the camera eye. World geometry sits at z = 0.
pub const CAMERA_Z: f32 = 20.0;

/// Orthographic view volume in world units.
///
/// Fixed per camera; it does not follow the window size. The default covers
/// a 40 x 21 grid of 32-unit tiles.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ProjectionBounds {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for ProjectionBounds {
    fn default() -> Self {
        Self {
            left: 0.0,
            right: 32.0 * 40.0,
            bottom: 0.0,
            top: 32.0 * 21.0,
            near: 0.0,
            far: 100.0,
        }
    }
}

/// 2D camera looking down -Z.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// World position of the bottom-left corner of the view.
    pub position: Vec2,
    bounds: ProjectionBounds,
    projection: Mat4,
}

impl Camera {
    pub fn new(position: Vec2) -> Self {
        Self::with_bounds(position, ProjectionBounds::default())
    }

    pub fn with_bounds(position: Vec2, bounds: ProjectionBounds) -> Self {
        let mut camera = Self {
            position,
            bounds,
            projection: Mat4::IDENTITY,
        };
        camera.adjust_projection();
        camera
    }

    #[inline]
    pub fn bounds(&self) -> ProjectionBounds {
        self.bounds
    }

    /// Recomputes the projection from the fixed bounds.
    ///
    /// Uses zero-to-one clip depth, which is what wgpu expects.
    pub fn adjust_projection(&mut self) {
        let b = self.bounds;
        self.projection = Mat4::orthographic_rh(b.left, b.right, b.bottom, b.top, b.near, b.far);
    }

    #[inline]
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    /// Eye point derived from the current position.
    #[inline]
    pub fn eye(&self) -> Vec3 {
        self.position.extend(CAMERA_Z)
    }

    /// View matrix for the current position, rebuilt on every call.
    pub fn view_matrix(&self) -> Mat4 {
        let eye = self.eye();
        Mat4::look_at_rh(eye, eye + Vec3::NEG_Z, Vec3::Y)
    }

    #[inline]
    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }
}
