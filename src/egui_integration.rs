//! egui glue: winit input in, wgpu draw calls out.

use std::sync::Arc;

use winit::event::WindowEvent;
use winit::window::Window;

use crate::gpu::GpuContext;

/// Egui integration state.
///
/// Wraps the egui context, its winit input state and the wgpu renderer.
pub struct EguiIntegration {
    pub ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

/// Tessellated UI for one frame.
pub struct EguiFrameOutput {
    pub paint_jobs: Vec<egui::ClippedPrimitive>,
    pub textures_delta: egui::TexturesDelta,
    pub pixels_per_point: f32,
}

impl EguiIntegration {
    pub fn new(gpu: &GpuContext, window: &Arc<Window>) -> Self {
        let ctx = egui::Context::default();

        let mut style = egui::Style::default();
        style.visuals = egui::Visuals::dark();
        style.visuals.window_shadow = egui::Shadow::NONE;
        ctx.set_style(style);

        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window.as_ref(),
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        let renderer = egui_wgpu::Renderer::new(&gpu.device, gpu.format(), renderer_options());

        Self {
            ctx,
            state,
            renderer,
        }
    }

    /// Feed a window event to egui.
    ///
    /// Returns true if egui consumed it and the scene should ignore it.
    pub fn on_window_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        self.state.on_window_event(window, event).consumed
    }

    /// True while the pointer is over, or dragging, an egui widget.
    pub fn wants_pointer(&self) -> bool {
        self.ctx.wants_pointer_input() || self.ctx.is_pointer_over_area()
    }

    /// Start a UI pass. Widgets may be added through `ctx` until [`end_frame`](Self::end_frame).
    pub fn begin_frame(&mut self, window: &Window) {
        let raw_input = self.state.take_egui_input(window);
        self.ctx.begin_pass(raw_input);
    }

    pub fn end_frame(&mut self, window: &Window) -> EguiFrameOutput {
        let full_output = self.ctx.end_pass();

        // clipboard, cursor icon, IME
        self.state
            .handle_platform_output(window, full_output.platform_output);

        let paint_jobs = self
            .ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        EguiFrameOutput {
            paint_jobs,
            textures_delta: full_output.textures_delta,
            pixels_per_point: full_output.pixels_per_point,
        }
    }

    /// Draw `output` on top of whatever `view` already holds.
    pub fn paint(
        &mut self,
        gpu: &GpuContext,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        output: &EguiFrameOutput,
    ) {
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.width(), gpu.height()],
            pixels_per_point: output.pixels_per_point,
        };

        for (id, image_delta) in &output.textures_delta.set {
            self.renderer
                .update_texture(&gpu.device, &gpu.queue, *id, image_delta);
        }
        self.renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            encoder,
            &output.paint_jobs,
            &screen_descriptor,
        );

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Egui Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            // egui-wgpu wants a 'static pass; it is dropped before the encoder finishes
            let mut render_pass = render_pass.forget_lifetime();
            self.renderer
                .render(&mut render_pass, &output.paint_jobs, &screen_descriptor);
        }

        for id in &output.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }
}

/// The panel is painted in its own pass straight onto the surface: single
/// sample, no depth attachment.
fn renderer_options() -> egui_wgpu::RendererOptions {
    egui_wgpu::RendererOptions {
        msaa_samples: 1,
        depth_stencil_format: None,
        dithering: false,
        ..Default::default()
    }
}
