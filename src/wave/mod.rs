//! The distance-driven ripple.
//!
//! Each frame [`WaveMapper::update`] measures how far every wall cell is from
//! the moving point, maps that distance to a displacement (and optionally a
//! color), and hands the result to the cell's tweens. [`WaveMapper::apply`]
//! then advances the tweens and writes the boxes back into the ECS world.

pub mod mapper;
pub mod mapping;
pub mod tween;
pub mod wall;

pub use mapper::{FrameReport, WaveMapper};
pub use mapping::{
    ClampParams, ColorRamp, MotionParams, RangeParams, clamp_between, map_range, planar_distance,
    quantize,
};
pub use tween::{Ease, Tween};
pub use wall::{Cell, Wall, WallLayout};
