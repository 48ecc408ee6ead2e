//! Scene configuration.
//!
//! [`SceneConfig`] is fixed before the window opens. [`SceneParams`] holds the
//! values the debug panel edits while the demo runs.

use std::f32::consts::FRAC_PI_2;

use glam::Vec3;

use crate::color::Color;
use crate::motion::{MotionPath, YoyoTrack};
use crate::wave::{ColorRamp, MotionParams, WallLayout};

/// Colors of the static scene pieces.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub background: Color,
    pub floor: Color,
    pub ball: Color,
    pub boxes: Color,
    pub grid: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::hex(0xf0f0f0),
            floor: Color::hex(0xffffff),
            ball: Color::hex(0x5661ff),
            boxes: Color::hex(0xff0000),
            grid: Color::hex(0xaca9a9),
        }
    }
}

/// Ambient fill plus one directional light.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightParams {
    pub ambient_color: Color,
    pub ambient_intensity: f32,
    pub directional_color: Color,
    pub directional_intensity: f32,
    pub position: Vec3,
    /// Point the directional light aims at.
    pub target: Vec3,
}

impl Default for LightParams {
    fn default() -> Self {
        Self {
            ambient_color: Color::WHITE,
            ambient_intensity: 0.5,
            directional_color: Color::WHITE,
            directional_intensity: 1.0,
            position: Vec3::new(0.0, 13.0, 23.0),
            target: Vec3::new(0.0, 0.0, -40.0),
        }
    }
}

impl LightParams {
    /// Unit vector the light travels along. Falls back to straight down when
    /// position and target coincide.
    pub fn direction(&self) -> Vec3 {
        (self.target - self.position).normalize_or(Vec3::NEG_Y)
    }
}

/// Values the panel can change between frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneParams {
    pub motion: MotionParams,
    pub ramp: ColorRamp,
    /// Drive box colors from distance as well as displacement.
    pub color_lerp: bool,
    pub lights: LightParams,
}

impl Default for SceneParams {
    fn default() -> Self {
        Self {
            motion: MotionParams::default(),
            ramp: ColorRamp::default(),
            color_lerp: false,
            lights: LightParams::default(),
        }
    }
}

impl SceneParams {
    /// The ramp the mapper should use this frame, if any.
    pub fn active_ramp(&self) -> Option<&ColorRamp> {
        self.color_lerp.then_some(&self.ramp)
    }
}

/// Static layout of the demo scene.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneConfig {
    /// One wall in the middle, or two mirrored walls with a lateral sweep.
    pub walls: usize,
    pub layout: WallLayout,
    /// Half the distance between the two walls.
    pub wall_spread: f32,
    pub palette: Palette,
    pub sphere_radius: f32,
    pub sphere_start: Vec3,
    pub floor_size: f32,
    pub grid_divisions: u32,
    /// Draw an axes helper at the origin.
    pub debug: bool,
    pub camera_position: Vec3,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub max_polar: f32,
    pub max_azimuth: f32,
    pub damping: f32,
    pub params: SceneParams,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            walls: 1,
            layout: WallLayout::default(),
            wall_spread: 3.0,
            palette: Palette::default(),
            sphere_radius: 0.25,
            sphere_start: Vec3::new(0.0, 1.0, -4.0),
            floor_size: 20.0,
            grid_divisions: 20,
            debug: false,
            camera_position: Vec3::new(0.0, 10.0, 50.0),
            fov_degrees: 20.0,
            near: 1.0,
            far: 1000.0,
            max_polar: FRAC_PI_2,
            max_azimuth: 40f32.to_radians(),
            damping: 0.02,
            params: SceneParams::default(),
        }
    }
}

impl SceneConfig {
    /// World-space offsets of every wall container.
    pub fn wall_offsets(&self) -> Vec<Vec3> {
        match self.walls {
            0 => Vec::new(),
            1 => vec![Vec3::ZERO],
            _ => vec![
                Vec3::new(-self.wall_spread, 0.0, 0.0),
                Vec3::new(self.wall_spread, 0.0, 0.0),
            ],
        }
    }

    /// How the sphere moves. The two-wall scene adds a sideways sweep so the
    /// sphere visits both walls.
    pub fn motion_path(&self) -> MotionPath {
        let path = MotionPath::fixed(self.sphere_start).with_z(YoyoTrack::new(
            self.sphere_start.z,
            8.0,
            5.0,
        ));
        if self.walls > 1 {
            path.with_x(YoyoTrack::new(-4.0, 4.0, 6.5))
        } else {
            path
        }
    }
}
