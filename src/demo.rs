//! The wave-wall scene: floor, grid, a looping sphere and one or two walls
//! of boxes rippling around it.

use glam::Vec3;
use hecs::Entity;
use winit::keyboard::KeyCode;

use crate::app::{AppConfig, Frame, SetupContext, run_with_config};
use crate::config::SceneConfig;
use crate::ecs::{Material, RenderMesh};
use crate::error::AppError;
use crate::line_pass::{axes, grid};
use crate::mesh::Transform;
use crate::orbit_camera::OrbitCamera;
use crate::panel::{PanelStats, draw_panel};
use crate::wave::{Wall, WaveMapper};

/// Lifts the grid off the floor so the two don't z-fight.
const GRID_LIFT: f32 = 0.002;
const AXES_LENGTH: f32 = 5.0;
const SPHERE_SEGMENTS: u32 = 32;

/// Open the window and run the demo until it is closed.
pub fn run(app: AppConfig, scene: SceneConfig) -> Result<(), AppError> {
    log::info!(
        "{} wall(s), color lerp {}",
        scene.walls,
        if scene.params.color_lerp { "on" } else { "off" }
    );
    run_with_config(app, move |ctx| setup(ctx, scene))
}

fn setup(ctx: &mut SetupContext, config: SceneConfig) -> impl FnMut(&mut Frame) + use<> {
    let palette = config.palette;
    ctx.background(palette.background);
    *ctx.camera = ctx
        .camera
        .at(config.camera_position)
        .looking_at(Vec3::ZERO)
        .with_fov(config.fov_degrees)
        .with_clip(config.near, config.far);
    *ctx.lights = config.params.lights;

    let mut lines = grid(
        config.floor_size,
        config.grid_divisions,
        GRID_LIFT,
        palette.grid,
    );
    if config.debug {
        lines.extend(axes(AXES_LENGTH));
    }
    ctx.lines(&lines);

    let floor = ctx.mesh_plane(config.floor_size);
    ctx.world.spawn((
        Transform::new(),
        RenderMesh::new(floor, Material::standard(palette.floor)),
    ));

    let path = config.motion_path();
    let ball = ctx.mesh_sphere(config.sphere_radius, SPHERE_SEGMENTS, SPHERE_SEGMENTS);
    let sphere: Entity = ctx.world.spawn((
        Transform::from_position(path.position(0.0)),
        RenderMesh::new(
            ball,
            Material::standard(palette.ball)
                .metalness(0.11)
                .roughness(0.1),
        ),
    ));

    let cube = ctx.mesh_cube();
    let box_material = Material::standard(palette.boxes)
        .metalness(0.11)
        .roughness(0.1);
    let mut walls = Vec::new();
    for offset in config.wall_offsets() {
        walls.push(Wall::spawn(
            ctx.world,
            config.layout.at(offset),
            cube,
            box_material,
        ));
    }

    let mut orbit = OrbitCamera::from_position(config.camera_position, Vec3::ZERO)
        .max_polar(config.max_polar)
        .azimuth_limits(f32::NEG_INFINITY, config.max_azimuth)
        .damping(config.damping);

    let mut params = config.params;
    let mut mapper = WaveMapper::new();
    let mut show_panel = true;

    move |frame: &mut Frame| {
        if frame.input.key_pressed(KeyCode::Escape) {
            frame.exit();
            return;
        }
        if frame.input.key_pressed(KeyCode::KeyH) {
            show_panel = !show_panel;
        }

        let captured = frame.pointer_captured();
        orbit.update(frame.input, captured);
        orbit.apply(frame.camera);

        let point = path.position(frame.time);
        if let Ok(mut transform) = frame.world.get::<&mut Transform>(sphere) {
            transform.position = point;
        }

        let report = mapper.update(&mut walls, point, &params.motion, params.active_ramp());
        mapper.apply(&mut walls, frame.world, frame.dt);

        if show_panel {
            let stats = PanelStats {
                frame_time: frame.dt,
                active_wall: report.active_wall,
                walls: walls.len(),
                sphere: point,
            };
            if draw_panel(frame.ui, &mut params, &stats) {
                log::trace!("motion {:?}", params.motion);
            }
        }
        *frame.lights = params.lights;
    }
}
