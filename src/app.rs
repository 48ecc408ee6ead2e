use std::sync::Arc;
use std::time::Instant;

use hecs::World;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::camera::Camera;
use crate::color::Color;
use crate::config::LightParams;
use crate::ecs::{MeshId, RenderMesh};
use crate::egui_integration::{EguiFrameOutput, EguiIntegration};
use crate::error::AppError;
use crate::gpu::GpuContext;
use crate::input::Input;
use crate::line_pass::{LinePass, LineVertex};
use crate::mesh::{Mesh, MeshData, Transform};
use crate::mesh_pass::{DrawCall, MeshPass};

/// Context provided during app setup.
pub struct SetupContext<'a> {
    pub gpu: &'a GpuContext,
    /// Entities spawned here with a [`Transform`] and [`RenderMesh`] are drawn every frame.
    pub world: &'a mut World,
    pub camera: &'a mut Camera,
    pub lights: &'a mut LightParams,
    meshes: &'a mut Vec<Mesh>,
    lines: &'a mut LinePass,
    background: &'a mut Color,
}

impl SetupContext<'_> {
    /// Upload `data` and return a handle for [`RenderMesh`].
    pub fn add_mesh(&mut self, data: &MeshData) -> MeshId {
        self.meshes.push(Mesh::new(self.gpu, data));
        MeshId::from_index(self.meshes.len() - 1)
    }

    /// Unit cube, scaled per entity through its [`Transform`].
    pub fn mesh_cube(&mut self) -> MeshId {
        self.add_mesh(&MeshData::cube())
    }

    pub fn mesh_sphere(&mut self, radius: f32, segments: u32, rings: u32) -> MeshId {
        self.add_mesh(&MeshData::sphere(radius, segments, rings))
    }

    pub fn mesh_plane(&mut self, size: f32) -> MeshId {
        self.add_mesh(&MeshData::plane(size))
    }

    /// Replace the static helper lines (grid, axes).
    pub fn lines(&mut self, vertices: &[LineVertex]) -> &mut Self {
        self.lines.set_lines(self.gpu, vertices);
        self
    }

    /// Clear color behind the scene.
    pub fn background(&mut self, color: Color) -> &mut Self {
        *self.background = color;
        self
    }
}

/// Context provided each frame.
pub struct Frame<'a> {
    pub gpu: &'a GpuContext,
    pub world: &'a mut World,
    pub camera: &'a mut Camera,
    pub lights: &'a mut LightParams,
    /// Input state for this frame.
    pub input: &'a Input,
    /// egui context for this frame's UI. Widgets added here are drawn over the scene.
    pub ui: &'a egui::Context,
    /// Total elapsed time in seconds.
    pub time: f32,
    /// Delta time since last frame in seconds.
    pub dt: f32,
    pointer_captured: bool,
    exit_requested: bool,
}

impl Frame<'_> {
    /// True while egui owns the mouse. Scene controls should stand down.
    pub fn pointer_captured(&self) -> bool {
        self.pointer_captured
    }

    /// Close the window after this frame.
    pub fn exit(&mut self) {
        self.exit_requested = true;
    }
}

/// Configuration for the app window.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Wave Wall".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

/// Open a window and run the app until it is closed.
///
/// `setup` runs once the GPU is ready and returns the per-frame closure.
///
/// # Example
/// ```ignore
/// wavewall::run_with_config(AppConfig::new().title("Boxes"), |ctx| {
///     let cube = ctx.mesh_cube();
///     ctx.world.spawn((Transform::new(), RenderMesh::new(cube, Material::default())));
///
///     move |frame| {
///         frame.camera.position.z = 5.0 + frame.time.sin();
///     }
/// })?;
/// ```
pub fn run_with_config<S, F>(config: AppConfig, setup: S) -> Result<(), AppError>
where
    S: FnOnce(&mut SetupContext) -> F + 'static,
    F: FnMut(&mut Frame) + 'static,
{
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = WavewallApp {
        state: AppState::Pending {
            config,
            setup: Box::new(move |ctx: &mut SetupContext| Box::new(setup(ctx)) as FrameFn),
        },
        error: None,
    };

    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

type FrameFn = Box<dyn FnMut(&mut Frame)>;
type SetupFn = Box<dyn FnOnce(&mut SetupContext) -> FrameFn>;

struct WavewallApp {
    state: AppState,
    /// First fatal error; returned from [`run_with_config`] once the loop exits.
    error: Option<AppError>,
}

enum AppState {
    Pending { config: AppConfig, setup: SetupFn },
    Running(Box<Running>),
    Stopped,
}

struct Running {
    window: Arc<Window>,
    gpu: GpuContext,
    egui: EguiIntegration,
    mesh_pass: MeshPass,
    line_pass: LinePass,
    meshes: Vec<Mesh>,
    world: World,
    camera: Camera,
    lights: LightParams,
    background: Color,
    input: Input,
    frame_fn: FrameFn,
    start_time: Instant,
    last_frame: Instant,
}

impl Running {
    fn start(
        event_loop: &ActiveEventLoop,
        config: &AppConfig,
        setup: SetupFn,
    ) -> Result<Self, AppError> {
        let window_attrs = WindowAttributes::default()
            .with_title(&config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let gpu = GpuContext::new(window.clone())?;
        let egui = EguiIntegration::new(&gpu, &window);
        let mesh_pass = MeshPass::new(&gpu);
        let mut line_pass = LinePass::new(&gpu);

        let mut meshes = Vec::new();
        let mut world = World::new();
        let mut camera = Camera::new();
        camera.set_viewport(gpu.width(), gpu.height());
        let mut lights = LightParams::default();
        let mut background = Color::BLACK;

        let frame_fn = setup(&mut SetupContext {
            gpu: &gpu,
            world: &mut world,
            camera: &mut camera,
            lights: &mut lights,
            meshes: &mut meshes,
            lines: &mut line_pass,
            background: &mut background,
        });

        log::info!(
            "started {}x{} with {} meshes and {} entities",
            gpu.width(),
            gpu.height(),
            meshes.len(),
            world.len()
        );

        Ok(Self {
            window,
            gpu,
            egui,
            mesh_pass,
            line_pass,
            meshes,
            world,
            camera,
            lights,
            background,
            input: Input::new(),
            frame_fn,
            start_time: Instant::now(),
            last_frame: Instant::now(),
        })
    }

    /// Run the user's frame closure and draw the result. Returns false once
    /// the app asked to exit.
    fn frame(&mut self) -> bool {
        let now = Instant::now();
        let time = self.start_time.elapsed().as_secs_f32();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        self.egui.begin_frame(&self.window);

        let mut frame = Frame {
            gpu: &self.gpu,
            world: &mut self.world,
            camera: &mut self.camera,
            lights: &mut self.lights,
            input: &self.input,
            ui: &self.egui.ctx,
            time,
            dt,
            pointer_captured: self.egui.wants_pointer(),
            exit_requested: false,
        };
        (self.frame_fn)(&mut frame);
        let keep_running = !frame.exit_requested;

        let ui = self.egui.end_frame(&self.window);
        if keep_running {
            self.render(time, &ui);
        }

        self.input.begin_frame();
        keep_running
    }

    fn render(&mut self, time: f32, ui: &EguiFrameOutput) {
        let output = match self.gpu.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("surface lost, reconfiguring");
                self.gpu.reconfigure();
                return;
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("surface timed out, skipping frame");
                return;
            }
            Err(e) => {
                log::error!("failed to acquire frame: {e}");
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let draws: Vec<DrawCall> = self
            .world
            .query::<(&Transform, &RenderMesh)>()
            .iter()
            .filter(|(_, (_, render))| render.visible)
            .filter_map(|(_, (transform, render))| {
                let mesh = self.meshes.get(render.mesh.index())?;
                Some(DrawCall {
                    mesh,
                    transform: *transform,
                    material: render.material,
                })
            })
            .collect();

        self.mesh_pass.ensure_depth_size(&self.gpu);
        self.mesh_pass
            .prepare(&self.gpu, &self.camera, &self.lights, time, &draws);
        self.line_pass.prepare(&self.gpu, &self.camera);

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.background.to_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: self.mesh_pass.depth_view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.mesh_pass.render(&mut render_pass, &draws);
            self.line_pass.render(&mut render_pass);
        }

        self.egui.paint(&self.gpu, &mut encoder, &view, ui);

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }

    fn window_event(&mut self, event: &WindowEvent) {
        let consumed = self.egui.on_window_event(&self.window, event);

        // releases and focus changes must always land or buttons stick
        let always = matches!(
            event,
            WindowEvent::MouseInput {
                state: ElementState::Released,
                ..
            } | WindowEvent::Focused(_)
                | WindowEvent::CursorLeft { .. }
        );
        if !consumed || always {
            self.input.handle_event(event);
        }

        match event {
            WindowEvent::Resized(size) => {
                log::debug!("resized to {}x{}", size.width, size.height);
                self.gpu.resize(size.width, size.height);
                self.camera.set_viewport(size.width, size.height);
            }
            WindowEvent::Occluded(occluded) => {
                log::info!("{}", visibility_label(*occluded));
            }
            _ => {}
        }
    }
}

impl ApplicationHandler for WavewallApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if !matches!(self.state, AppState::Pending { .. }) {
            return;
        }
        let AppState::Pending { config, setup } =
            std::mem::replace(&mut self.state, AppState::Stopped)
        else {
            return;
        };

        match Running::start(event_loop, &config, setup) {
            Ok(running) => {
                running.window.request_redraw();
                self.state = AppState::Running(Box::new(running));
            }
            Err(e) => {
                log::error!("{e}");
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let AppState::Running(app) = &mut self.state else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("close requested");
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                if app.frame() {
                    app.window.request_redraw();
                } else {
                    event_loop.exit();
                }
            }
            other => app.window_event(&other),
        }
    }
}

/// Log line for a visibility change of the window.
fn visibility_label(occluded: bool) -> &'static str {
    if occluded { "pause" } else { "play" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_window_pauses_and_shown_window_plays() {
        assert_eq!(visibility_label(true), "pause");
        assert_eq!(visibility_label(false), "play");
    }

    #[test]
    fn config_builder_sets_title_and_size() {
        let config = AppConfig::new().title("walls").size(800, 600);
        assert_eq!(config.title, "walls");
        assert_eq!((config.width, config.height), (800, 600));
        assert_eq!(AppConfig::default().title, "Wave Wall");
    }
}
