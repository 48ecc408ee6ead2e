//! Static line helpers: floor grid and axes.
//!
//! Lines are built once on the CPU as [`LineVertex`] pairs, uploaded when
//! they change, and drawn depth-tested against the meshes.

use glam::Vec3;

use crate::camera::Camera;
use crate::color::Color;
use crate::gpu::GpuContext;
use crate::mesh_pass::DEPTH_FORMAT;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    /// Linear RGBA.
    pub color: [f32; 4],
}

impl LineVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x4];

    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<LineVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &Self::ATTRIBUTES,
    };

    pub fn new(position: Vec3, color: Color) -> Self {
        Self {
            position: position.to_array(),
            color: color.to_linear().to_array(),
        }
    }
}

/// A square grid of `divisions` cells spanning `size` units, centered on the
/// origin at height `y`.
pub fn grid(size: f32, divisions: u32, y: f32, color: Color) -> Vec<LineVertex> {
    let half = size / 2.0;
    let step = size / divisions.max(1) as f32;
    let mut lines = Vec::with_capacity((divisions as usize + 1) * 4);
    for i in 0..=divisions {
        let k = -half + i as f32 * step;
        lines.push(LineVertex::new(Vec3::new(-half, y, k), color));
        lines.push(LineVertex::new(Vec3::new(half, y, k), color));
        lines.push(LineVertex::new(Vec3::new(k, y, -half), color));
        lines.push(LineVertex::new(Vec3::new(k, y, half), color));
    }
    lines
}

/// X (red), Y (green) and Z (blue) axes of `length` from the origin.
pub fn axes(length: f32) -> Vec<LineVertex> {
    [
        (Vec3::X, Color::RED),
        (Vec3::Y, Color::GREEN),
        (Vec3::Z, Color::BLUE),
    ]
    .into_iter()
    .flat_map(|(axis, color)| {
        [
            LineVertex::new(Vec3::ZERO, color),
            LineVertex::new(axis * length, color),
        ]
    })
    .collect()
}

pub struct LinePass {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    vertex_buffer: Option<wgpu::Buffer>,
    vertex_count: u32,
}

impl LinePass {
    pub fn new(gpu: &GpuContext) -> Self {
        let device = &gpu.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Line Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/line.wgsl").into()),
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Line Uniforms"),
            size: std::mem::size_of::<[[f32; 4]; 4]>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Line Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Line Bind Group"),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Line Pipeline Layout"),
            bind_group_layouts: &[&layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Line Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs"),
                buffers: &[LineVertex::LAYOUT],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.format(),
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            uniform_buffer,
            bind_group,
            vertex_buffer: None,
            vertex_count: 0,
        }
    }

    /// Replace the line set. An empty slice disables the pass.
    pub fn set_lines(&mut self, gpu: &GpuContext, vertices: &[LineVertex]) {
        use wgpu::util::DeviceExt;

        if vertices.is_empty() {
            self.vertex_buffer = None;
            self.vertex_count = 0;
            return;
        }
        self.vertex_buffer = Some(gpu.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Line Vertices"),
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX,
            },
        ));
        self.vertex_count = vertices.len() as u32;
    }

    pub fn prepare(&self, gpu: &GpuContext, camera: &Camera) {
        let view_proj = camera.view_proj().to_cols_array_2d();
        gpu.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&view_proj));
    }

    pub fn render(&self, render_pass: &mut wgpu::RenderPass) {
        let Some(vertices) = &self.vertex_buffer else {
            return;
        };
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.set_vertex_buffer(0, vertices.slice(..));
        render_pass.draw(0..self.vertex_count, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_has_two_lines_per_division_boundary() {
        let lines = grid(20.0, 20, 0.0, Color::hex(0xaca9a9));
        assert_eq!(lines.len(), 21 * 4);
        let xs: Vec<f32> = lines.iter().map(|v| v.position[0]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::INFINITY, f32::min), -10.0);
        assert_eq!(xs.iter().cloned().fold(f32::NEG_INFINITY, f32::max), 10.0);
    }

    #[test]
    fn axes_are_colored_per_axis() {
        let lines = axes(5.0);
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[1].position, [5.0, 0.0, 0.0]);
        assert_eq!(lines[1].color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(lines[5].position, [0.0, 0.0, 5.0]);
    }
}
