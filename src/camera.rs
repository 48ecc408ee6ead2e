use glam::{Mat4, Vec3};

/// A perspective camera for 3D scenes.
///
/// The aspect ratio is stored on the camera and updated from the window size
/// via [`Camera::set_viewport`], so a resize is reflected in the very next
/// [`Camera::projection_matrix`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub forward: Vec3,
    pub up: Vec3,
    /// Vertical field of view in radians.
    pub fov: f32,
    /// Width / height of the viewport.
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            forward: Vec3::NEG_Z,
            up: Vec3::Y,
            fov: std::f32::consts::FRAC_PI_2, // 90 degrees
            aspect: 1.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn looking_at(mut self, target: Vec3) -> Self {
        self.forward = (target - self.position).normalize_or(Vec3::NEG_Z);
        self
    }

    pub fn with_fov(mut self, fov_degrees: f32) -> Self {
        self.fov = fov_degrees.to_radians();
        self
    }

    pub fn with_clip(mut self, near: f32, far: f32) -> Self {
        self.near = near;
        self.far = far;
        self
    }

    /// Update the aspect ratio for a viewport of `width × height` pixels.
    ///
    /// Zero-sized viewports (minimized windows) are ignored.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward, self.up)
    }

    /// Right-handed perspective projection with a `[0, 1]` depth range.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_updates_aspect_used_by_projection() {
        let mut camera = Camera::new().with_fov(20.0).with_clip(1.0, 1000.0);
        camera.set_viewport(800, 600);
        let before = camera.projection_matrix();
        assert_eq!(camera.aspect, 800.0 / 600.0);

        camera.set_viewport(1920, 1080);
        assert_eq!(camera.aspect, 1920.0 / 1080.0);
        let after = camera.projection_matrix();
        assert_eq!(
            after,
            Mat4::perspective_rh(20f32.to_radians(), 1920.0 / 1080.0, 1.0, 1000.0)
        );
        assert_ne!(before, after);
    }

    #[test]
    fn zero_sized_viewport_is_ignored() {
        let mut camera = Camera::new();
        camera.set_viewport(1280, 720);
        camera.set_viewport(0, 720);
        camera.set_viewport(1280, 0);
        assert_eq!(camera.aspect, 1280.0 / 720.0);
    }

    #[test]
    fn looking_at_points_forward_at_target() {
        let camera = Camera::new()
            .at(Vec3::new(0.0, 10.0, 50.0))
            .looking_at(Vec3::ZERO);
        let expected = Vec3::new(0.0, -10.0, -50.0).normalize();
        assert!((camera.forward - expected).length() < 1e-6);
        // the target projects onto the screen center
        let clip = camera.view_proj() * Vec3::ZERO.extend(1.0);
        assert!((clip.x / clip.w).abs() < 1e-5);
        assert!((clip.y / clip.w).abs() < 1e-5);
    }
}
