use std::f32::consts::FRAC_PI_2;

use glam::{Vec2, Vec3};
use winit::event::MouseButton;

use crate::camera::Camera;
use crate::input::Input;

/// A damped camera controller that orbits around a target point.
///
/// Angles follow the usual spherical convention: `azimuth = 0` puts the
/// camera on the +Z side of the target, and `polar` is measured down from +Y
/// (`0` looks straight down, `π/2` is level with the target).
///
/// Dragging and scrolling feed velocities rather than angles. Each
/// [`update`](Self::update) applies `damping` of the accumulated velocity and
/// decays the rest, which gives the slow glide after letting go.
///
/// # Example
/// ```ignore
/// let mut orbit = OrbitCamera::from_position(Vec3::new(0.0, 10.0, 50.0), Vec3::ZERO)
///     .max_polar(90f32.to_radians())
///     .damping(0.02);
///
/// // In frame loop:
/// orbit.update(frame.input);
/// orbit.apply(frame.camera);
/// ```
#[derive(Clone, Debug)]
pub struct OrbitCamera {
    /// Point the camera orbits around.
    pub target: Vec3,
    pub distance: f32,
    /// Horizontal angle in radians.
    pub azimuth: f32,
    /// Angle from the +Y axis in radians.
    pub polar: f32,
    pub min_polar: f32,
    pub max_polar: f32,
    pub min_azimuth: f32,
    pub max_azimuth: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Fraction of the pending motion applied per update, in `(0, 1]`.
    pub damping: f32,
    /// Radians per pixel of mouse drag.
    pub sensitivity: f32,
    /// Relative zoom per scroll line.
    pub zoom_sensitivity: f32,
    rotate_velocity: Vec2,
    zoom_velocity: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            distance: 5.0,
            azimuth: 0.0,
            polar: FRAC_PI_2 - 0.3,
            min_polar: 0.0,
            max_polar: std::f32::consts::PI,
            min_azimuth: f32::NEG_INFINITY,
            max_azimuth: f32::INFINITY,
            min_distance: 0.5,
            max_distance: 500.0,
            damping: 1.0,
            sensitivity: 0.005,
            zoom_sensitivity: 0.1,
            rotate_velocity: Vec2::ZERO,
            zoom_velocity: 0.0,
        }
    }
}

impl OrbitCamera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start at `position`, orbiting `target`.
    pub fn from_position(position: Vec3, target: Vec3) -> Self {
        let offset = position - target;
        let distance = offset.length();
        let polar = if distance > 0.0 {
            (offset.y / distance).clamp(-1.0, 1.0).acos()
        } else {
            FRAC_PI_2
        };
        Self {
            target,
            distance,
            azimuth: offset.x.atan2(offset.z),
            polar,
            ..Self::default()
        }
    }

    /// Lowest the camera may go, as an angle from +Y.
    pub fn max_polar(mut self, angle: f32) -> Self {
        self.max_polar = angle;
        self.polar = self.polar.clamp(self.min_polar, self.max_polar);
        self
    }

    pub fn azimuth_limits(mut self, min: f32, max: f32) -> Self {
        self.min_azimuth = min;
        self.max_azimuth = max;
        self.azimuth = self.azimuth.clamp(min, max);
        self
    }

    /// Set the damping factor. `1.0` disables the glide.
    pub fn damping(mut self, damping: f32) -> Self {
        self.damping = damping.clamp(f32::EPSILON, 1.0);
        self
    }

    /// Feed a drag of `delta` pixels.
    pub fn rotate(&mut self, delta: Vec2) {
        self.rotate_velocity += delta * self.sensitivity;
    }

    /// Feed `lines` of scroll; positive zooms in.
    pub fn zoom(&mut self, lines: f32) {
        self.zoom_velocity += lines * self.zoom_sensitivity;
    }

    /// True while there is still damped motion to play out.
    pub fn is_moving(&self) -> bool {
        self.rotate_velocity.length_squared() > 1e-12 || self.zoom_velocity.abs() > 1e-6
    }

    /// Read drag/scroll from `input`, then step the damped motion.
    ///
    /// Pass `pointer_captured = true` while a UI widget owns the mouse so
    /// the scene does not rotate under it.
    pub fn update(&mut self, input: &Input, pointer_captured: bool) {
        if !pointer_captured {
            if input.mouse_down(MouseButton::Left) {
                self.rotate(input.mouse_delta());
            }
            let scroll = input.scroll_delta();
            if scroll.y != 0.0 {
                self.zoom(scroll.y);
            }
        }
        self.step();
    }

    /// Apply one damping step of the pending rotation and zoom.
    pub fn step(&mut self) {
        let rotate = self.rotate_velocity * self.damping;
        self.azimuth = (self.azimuth - rotate.x).clamp(self.min_azimuth, self.max_azimuth);
        self.polar = (self.polar - rotate.y).clamp(
            self.min_polar.max(1e-4),
            self.max_polar.min(std::f32::consts::PI - 1e-4),
        );

        let zoom = self.zoom_velocity * self.damping;
        self.distance = (self.distance * (1.0 - zoom)).clamp(self.min_distance, self.max_distance);

        self.rotate_velocity *= 1.0 - self.damping;
        self.zoom_velocity *= 1.0 - self.damping;
    }

    /// Camera position in world space.
    pub fn position(&self) -> Vec3 {
        let offset = Vec3::new(
            self.distance * self.polar.sin() * self.azimuth.sin(),
            self.distance * self.polar.cos(),
            self.distance * self.polar.sin() * self.azimuth.cos(),
        );
        self.target + offset
    }

    /// Write position and orientation into `camera`, keeping its lens settings.
    pub fn apply(&self, camera: &mut Camera) {
        let position = self.position();
        camera.position = position;
        camera.forward = (self.target - position).normalize_or(Vec3::NEG_Z);
        camera.up = Vec3::Y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_position_round_trips() {
        let start = Vec3::new(0.0, 10.0, 50.0);
        let orbit = OrbitCamera::from_position(start, Vec3::ZERO);
        assert!((orbit.position() - start).length() < 1e-3);
        assert_eq!(orbit.azimuth, 0.0);
    }

    #[test]
    fn polar_never_drops_below_the_floor() {
        let mut orbit = OrbitCamera::from_position(Vec3::new(0.0, 10.0, 50.0), Vec3::ZERO)
            .max_polar(FRAC_PI_2);
        // dragging up lowers the camera
        orbit.rotate(Vec2::new(0.0, -10_000.0));
        orbit.step();
        assert!(orbit.polar <= FRAC_PI_2);
        assert!(orbit.position().y >= -1e-3);
    }

    #[test]
    fn azimuth_respects_max() {
        let max = 40f32.to_radians();
        let mut orbit = OrbitCamera::new().azimuth_limits(f32::NEG_INFINITY, max);
        orbit.rotate(Vec2::new(-10_000.0, 0.0));
        orbit.step();
        assert_eq!(orbit.azimuth, max);
    }

    #[test]
    fn damping_spreads_motion_over_updates() {
        let mut orbit = OrbitCamera::new().damping(0.5);
        let start = orbit.azimuth;
        orbit.rotate(Vec2::new(-100.0, 0.0));

        orbit.step();
        let first = orbit.azimuth - start;
        orbit.step();
        let second = orbit.azimuth - start - first;

        assert!(first > 0.0);
        assert!((second - first * 0.5).abs() < 1e-5);
        assert!(orbit.is_moving());

        for _ in 0..64 {
            orbit.step();
        }
        assert!(!orbit.is_moving());
        // total travel converges to the full drag
        assert!((orbit.azimuth - start - 100.0 * orbit.sensitivity).abs() < 1e-4);
    }

    #[test]
    fn apply_points_camera_at_target() {
        let orbit = OrbitCamera::from_position(Vec3::new(3.0, 4.0, 5.0), Vec3::new(0.0, 1.0, 0.0));
        let mut camera = Camera::new().with_fov(20.0);
        orbit.apply(&mut camera);
        let to_target = (orbit.target - camera.position).normalize();
        assert!((camera.forward - to_target).length() < 1e-6);
        assert_eq!(camera.fov, 20f32.to_radians());
    }
}
