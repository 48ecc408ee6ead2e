//! Lit 3D mesh rendering with depth testing.
//!
//! The mesh pass uses two bind groups:
//! - **Group 0**: scene uniforms (view-projection, camera position, lights)
//! - **Group 1**: model uniforms (model matrix, normal matrix, material),
//!   one slot per draw in a single buffer addressed with dynamic offsets
//!
//! Every draw of a frame gets its own slot, so hundreds of boxes can be
//! written with one `write_buffer` before the pass starts.
//!
//! # Example
//!
//! ```ignore
//! let mut mesh_pass = MeshPass::new(&gpu);
//!
//! mesh_pass.ensure_depth_size(&gpu);
//! mesh_pass.prepare(&gpu, &camera, &lights, time, &draws);
//! // inside a render pass with `mesh_pass.depth_view()` attached:
//! mesh_pass.render(&mut render_pass, &draws);
//! ```

use crate::camera::Camera;
use crate::config::LightParams;
use crate::ecs::Material;
use crate::gpu::GpuContext;
use crate::mesh::{Mesh, Transform, Vertex3d};

pub(crate) const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Per-frame uniforms shared by every draw.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniforms {
    pub view_proj: [[f32; 4]; 4],
    /// xyz = camera position, w = elapsed time.
    pub camera_pos: [f32; 4],
    /// Ambient color premultiplied by intensity.
    pub ambient: [f32; 4],
    /// Direction the light travels, w unused.
    pub light_dir: [f32; 4],
    /// Directional color premultiplied by intensity.
    pub light_color: [f32; 4],
}

impl SceneUniforms {
    pub fn new(camera: &Camera, lights: &LightParams, time: f32) -> Self {
        let premultiplied = |color: crate::color::Color, intensity: f32| {
            let linear = color.to_linear();
            [
                linear.r * intensity,
                linear.g * intensity,
                linear.b * intensity,
                1.0,
            ]
        };
        Self {
            view_proj: camera.view_proj().to_cols_array_2d(),
            camera_pos: camera.position.extend(time).to_array(),
            ambient: premultiplied(lights.ambient_color, lights.ambient_intensity),
            light_dir: lights.direction().extend(0.0).to_array(),
            light_color: premultiplied(lights.directional_color, lights.directional_intensity),
        }
    }
}

/// Per-draw uniforms.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelUniforms {
    pub model: [[f32; 4]; 4],
    /// Inverse transpose of the model matrix, for non-uniform scale.
    pub normal_matrix: [[f32; 4]; 4],
    /// Linear RGBA.
    pub color: [f32; 4],
    /// x = metalness, y = roughness, z = 1.0 when unlit.
    pub material: [f32; 4],
}

impl ModelUniforms {
    pub fn new(transform: &Transform, material: &Material) -> Self {
        let model = transform.matrix();
        Self {
            model: model.to_cols_array_2d(),
            normal_matrix: model.inverse().transpose().to_cols_array_2d(),
            color: material.color.to_linear().to_array(),
            material: [
                material.metalness,
                material.roughness,
                if material.unlit { 1.0 } else { 0.0 },
                0.0,
            ],
        }
    }
}

/// A mesh to draw this frame.
pub struct DrawCall<'a> {
    pub mesh: &'a Mesh,
    pub transform: Transform,
    pub material: Material,
}

/// Round `size` up to the next multiple of `alignment`.
pub(crate) fn align_to(size: u64, alignment: u64) -> u64 {
    size.div_ceil(alignment) * alignment
}

/// Handles lit mesh rendering with depth testing.
///
/// - Back-face culling, counter-clockwise front faces
/// - Depth write with `Less` comparison against a 32-bit float depth buffer
/// - Depth buffer follows the surface size via [`ensure_depth_size`](Self::ensure_depth_size)
pub struct MeshPass {
    pipeline: wgpu::RenderPipeline,
    scene_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,
    model_layout: wgpu::BindGroupLayout,
    model_buffer: wgpu::Buffer,
    model_bind_group: wgpu::BindGroup,
    /// Bytes between consecutive model slots.
    model_stride: u64,
    /// Number of slots `model_buffer` holds.
    model_capacity: usize,
    staging: Vec<u8>,
    depth_view: wgpu::TextureView,
    depth_size: (u32, u32),
}

impl MeshPass {
    pub fn new(gpu: &GpuContext) -> Self {
        let device = &gpu.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Mesh Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/mesh.wgsl").into()),
        });

        // Scene uniform buffer (group 0)
        let scene_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Scene Uniforms"),
            size: std::mem::size_of::<SceneUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let scene_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Scene Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Bind Group"),
            layout: &scene_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_buffer.as_entire_binding(),
            }],
        });

        // Model uniform buffer (group 1), one aligned slot per draw
        let model_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Model Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<ModelUniforms>() as u64
                    ),
                },
                count: None,
            }],
        });

        let model_stride = align_to(
            std::mem::size_of::<ModelUniforms>() as u64,
            device.limits().min_uniform_buffer_offset_alignment as u64,
        );
        let model_capacity = 64;
        let (model_buffer, model_bind_group) =
            Self::create_model_slots(device, &model_layout, model_stride, model_capacity);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Mesh Pipeline Layout"),
            bind_group_layouts: &[&scene_layout, &model_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Mesh Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs"),
                buffers: &[Vertex3d::LAYOUT],
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
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                front_face: wgpu::FrontFace::Ccw,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            scene_buffer,
            scene_bind_group,
            model_layout,
            model_buffer,
            model_bind_group,
            model_stride,
            model_capacity,
            staging: Vec::new(),
            depth_view: Self::create_depth_view(gpu),
            depth_size: (gpu.width(), gpu.height()),
        }
    }

    fn create_model_slots(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        stride: u64,
        capacity: usize,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Model Uniforms"),
            size: stride * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Model Bind Group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<ModelUniforms>() as u64),
                }),
            }],
        });
        (buffer, bind_group)
    }

    fn create_depth_view(gpu: &GpuContext) -> wgpu::TextureView {
        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: gpu.width(),
                height: gpu.height(),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    /// Recreate the depth buffer if the surface changed size.
    pub fn ensure_depth_size(&mut self, gpu: &GpuContext) {
        if self.depth_size != (gpu.width(), gpu.height()) {
            log::debug!("depth buffer resized to {}x{}", gpu.width(), gpu.height());
            self.depth_view = Self::create_depth_view(gpu);
            self.depth_size = (gpu.width(), gpu.height());
        }
    }

    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth_view
    }

    /// Upload scene and per-draw uniforms. Must run before the render pass
    /// that calls [`render`](Self::render) with the same `draws`.
    pub fn prepare(
        &mut self,
        gpu: &GpuContext,
        camera: &Camera,
        lights: &LightParams,
        time: f32,
        draws: &[DrawCall],
    ) {
        let scene = SceneUniforms::new(camera, lights, time);
        gpu.queue
            .write_buffer(&self.scene_buffer, 0, bytemuck::bytes_of(&scene));

        if draws.is_empty() {
            return;
        }

        if draws.len() > self.model_capacity {
            let capacity = draws.len().next_power_of_two();
            log::debug!("growing model uniforms to {capacity} slots");
            let (buffer, bind_group) = Self::create_model_slots(
                &gpu.device,
                &self.model_layout,
                self.model_stride,
                capacity,
            );
            self.model_buffer = buffer;
            self.model_bind_group = bind_group;
            self.model_capacity = capacity;
        }

        let stride = self.model_stride as usize;
        self.staging.clear();
        self.staging.resize(stride * draws.len(), 0);
        for (slot, call) in self.staging.chunks_exact_mut(stride).zip(draws) {
            let uniforms = ModelUniforms::new(&call.transform, &call.material);
            let bytes = bytemuck::bytes_of(&uniforms);
            slot[..bytes.len()].copy_from_slice(bytes);
        }
        gpu.queue.write_buffer(&self.model_buffer, 0, &self.staging);
    }

    /// Draw `draws` into a pass that has this pass's depth buffer attached.
    pub fn render(&self, render_pass: &mut wgpu::RenderPass, draws: &[DrawCall]) {
        if draws.is_empty() {
            return;
        }

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.scene_bind_group, &[]);

        for (i, call) in draws.iter().enumerate() {
            let offset = (i as u64 * self.model_stride) as u32;
            render_pass.set_bind_group(1, &self.model_bind_group, &[offset]);
            render_pass.set_vertex_buffer(0, call.mesh.vertex_buffer.slice(..));
            render_pass
                .set_index_buffer(call.mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..call.mesh.index_count, 0, 0..1);
        }
    }
}
