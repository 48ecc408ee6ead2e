//! # Wavewall
//!
//! A wall of boxes that ripples around a moving sphere.
//!
//! Every frame each box measures its planar distance to the sphere, maps it
//! through an adjustable range, clamps it, and eases toward the result. Front
//! and back boxes of a cell move in opposite directions, so the wall bulges
//! both ways. An egui panel exposes the mapping for live tuning.
//!
//! The pure pieces ([`wave`], [`motion`], [`Color`]) need no GPU; the window,
//! renderer and panel sit on top of them.
//!
//! ```no_run
//! use wavewall::{AppConfig, SceneConfig};
//!
//! fn main() -> Result<(), wavewall::AppError> {
//!     wavewall::demo::run(AppConfig::new(), SceneConfig::default())
//! }
//! ```

mod app;
mod camera;
pub mod cli;
mod color;
mod config;
pub mod demo;
mod ecs;
mod egui_integration;
mod error;
mod gpu;
mod input;
mod line_pass;
mod mesh;
mod mesh_pass;
pub mod motion;
mod orbit_camera;
pub mod panel;
pub mod wave;

pub use app::{AppConfig, Frame, SetupContext, run_with_config};
pub use camera::Camera;
pub use color::Color;
pub use config::{LightParams, Palette, SceneConfig, SceneParams};
pub use ecs::{Material, MeshId, RenderMesh};
pub use egui_integration::{EguiFrameOutput, EguiIntegration};
pub use error::{AppError, GpuError};
pub use gpu::GpuContext;
pub use input::Input;
pub use line_pass::{LinePass, LineVertex, axes, grid};
pub use mesh::{Mesh, MeshData, Transform, Vertex3d};
pub use mesh_pass::{DrawCall, MeshPass};
pub use orbit_camera::OrbitCamera;

// Re-export glam math types for convenience
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};

// Re-export commonly used winit types for convenience
pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;

pub use hecs::{Entity, World};
