//! Mesh geometry and object placement.
//!
//! [`MeshData`] builds the scene's primitives on the CPU so their winding can
//! be tested without a device; [`Mesh`] is the uploaded copy. Every vertex is
//! a [`Vertex3d`]: position at shader location 0, normal at location 1.

use glam::{Mat4, Quat, Vec3};

use crate::gpu::GpuContext;

/// Position and normal, both in model space.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex3d {
    pub position: [f32; 3],
    /// Unit length; flat per face on the cube and plane.
    pub normal: [f32; 3],
}

impl Vertex3d {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex3d>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &Self::ATTRIBUTES,
    };

    fn at(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
        }
    }
}

/// Faces of the unit cube as (normal, u, v) with `u × v == normal`.
const CUBE_FACES: [(Vec3, Vec3, Vec3); 6] = [
    (Vec3::Z, Vec3::X, Vec3::Y),
    (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    (Vec3::Y, Vec3::X, Vec3::NEG_Z),
    (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    (Vec3::X, Vec3::NEG_Z, Vec3::Y),
    (Vec3::NEG_X, Vec3::Z, Vec3::Y),
];

/// Triangle lists kept in CPU memory until [`Mesh::new`] uploads them.
///
/// Front faces wind counter-clockwise.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex3d>,
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Append a flat quad centered on `center`, spanning `±u` and `±v`.
    fn push_quad(&mut self, center: Vec3, u: Vec3, v: Vec3) {
        let normal = u.cross(v).normalize_or(Vec3::Y);
        let base = self.vertices.len() as u32;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            self.vertices
                .push(Vertex3d::at(center + u * su + v * sv, normal));
        }
        self.indices
            .extend([base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    /// Cube spanning -0.5..0.5. Boxes of any size come from [`Transform::scale`].
    pub fn cube() -> Self {
        let mut data = Self::default();
        for (normal, u, v) in CUBE_FACES {
            data.push_quad(normal * 0.5, u * 0.5, v * 0.5);
        }
        data
    }

    /// Latitude/longitude sphere around the origin.
    ///
    /// `segments` splits each latitude circle and `rings` splits the arc from
    /// the north pole to the south pole. Seam and pole vertices are
    /// duplicated, giving `(segments + 1) * (rings + 1)` vertices.
    pub fn sphere(radius: f32, segments: u32, rings: u32) -> Self {
        use std::f32::consts::{PI, TAU};

        let segments = segments.max(3);
        let rings = rings.max(2);
        let stride = segments + 1;

        let vertices = (0..=rings)
            .flat_map(|ring| {
                let (sin_lat, cos_lat) = (PI * ring as f32 / rings as f32).sin_cos();
                (0..=segments).map(move |seg| {
                    let (sin_lon, cos_lon) = (TAU * seg as f32 / segments as f32).sin_cos();
                    let normal = Vec3::new(sin_lat * cos_lon, cos_lat, sin_lat * sin_lon);
                    Vertex3d::at(normal * radius, normal)
                })
            })
            .collect();

        let indices = (0..rings)
            .flat_map(|ring| (0..segments).map(move |seg| ring * stride + seg))
            .flat_map(|a| {
                let below = a + stride;
                [a, a + 1, below, a + 1, below + 1, below]
            })
            .collect();

        Self { vertices, indices }
    }

    /// `size` by `size` square in the XZ plane facing +Y.
    pub fn plane(size: f32) -> Self {
        let half = size * 0.5;
        let mut data = Self::default();
        data.push_quad(Vec3::ZERO, Vec3::X * half, Vec3::NEG_Z * half);
        data
    }
}

/// A [`MeshData`] living in GPU buffers. Never modified after upload.
#[derive(Debug)]
pub struct Mesh {
    pub(crate) vertex_buffer: wgpu::Buffer,
    pub(crate) index_buffer: wgpu::Buffer,
    pub(crate) index_count: u32,
}

impl Mesh {
    pub fn new(gpu: &GpuContext, data: &MeshData) -> Self {
        use wgpu::util::DeviceExt;

        let upload = |label: &str, contents: &[u8], usage: wgpu::BufferUsages| {
            gpu.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(label),
                    contents,
                    usage,
                })
        };

        Self {
            vertex_buffer: upload(
                "mesh vertices",
                bytemuck::cast_slice(&data.vertices),
                wgpu::BufferUsages::VERTEX,
            ),
            index_buffer: upload(
                "mesh indices",
                bytemuck::cast_slice(&data.indices),
                wgpu::BufferUsages::INDEX,
            ),
            index_count: data.indices.len() as u32,
        }
    }
}

/// Where an entity sits: translation, orientation, per-axis size.
///
/// Applied as scale first, then rotation, then translation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_position(position: Vec3) -> Self {
        Self::new().position(position)
    }

    pub fn position(self, position: Vec3) -> Self {
        Self { position, ..self }
    }

    pub fn rotation(self, rotation: Quat) -> Self {
        Self { rotation, ..self }
    }

    pub fn scale(self, scale: Vec3) -> Self {
        Self { scale, ..self }
    }

    /// Re-express a transform given relative to `parent` in world space.
    ///
    /// Only the parent's translation and rotation are used; wall containers
    /// are never scaled.
    pub fn in_parent(&self, parent: &Transform) -> Transform {
        Transform {
            position: parent.position + parent.rotation * self.position,
            rotation: parent.rotation * self.rotation,
            scale: self.scale,
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face_normal(data: &MeshData, tri: usize) -> Vec3 {
        let idx = &data.indices[tri * 3..tri * 3 + 3];
        let p = |i: u32| Vec3::from(data.vertices[i as usize].position);
        let (a, b, c) = (p(idx[0]), p(idx[1]), p(idx[2]));
        (b - a).cross(c - a).normalize()
    }

    #[test]
    fn cube_winding_matches_normals() {
        let cube = MeshData::cube();
        assert_eq!(cube.vertices.len(), 24);
        assert_eq!(cube.indices.len(), 36);
        for tri in 0..12 {
            let stored = Vec3::from(cube.vertices[cube.indices[tri * 3] as usize].normal);
            assert!(face_normal(&cube, tri).dot(stored) > 0.99);
        }
    }

    #[test]
    fn cube_spans_unit_extent() {
        let cube = MeshData::cube();
        for v in &cube.vertices {
            assert!(v.position.iter().all(|c| (c.abs() - 0.5).abs() < 1e-6));
        }
    }

    #[test]
    fn sphere_vertices_sit_on_radius() {
        let sphere = MeshData::sphere(0.25, 16, 8);
        assert_eq!(sphere.vertices.len(), 17 * 9);
        assert_eq!(sphere.indices.len(), 16 * 8 * 6);
        for v in &sphere.vertices {
            assert!((Vec3::from(v.position).length() - 0.25).abs() < 1e-5);
        }
        assert!(sphere.indices.iter().all(|&i| (i as usize) < sphere.vertices.len()));
    }

    #[test]
    fn sphere_faces_point_outward() {
        let sphere = MeshData::sphere(1.0, 12, 6);
        // away from the poles, where triangles are not degenerate
        let tri = 12 * 2 * 2 + 3;
        let idx = &sphere.indices[tri * 3..tri * 3 + 3];
        let centroid: Vec3 = idx
            .iter()
            .map(|&i| Vec3::from(sphere.vertices[i as usize].position))
            .sum::<Vec3>()
            / 3.0;
        assert!(face_normal(&sphere, tri).dot(centroid) > 0.0);
    }

    #[test]
    fn plane_faces_up() {
        let plane = MeshData::plane(20.0);
        assert!(face_normal(&plane, 0).dot(Vec3::Y) > 0.99);
        assert!(face_normal(&plane, 1).dot(Vec3::Y) > 0.99);
        assert!(plane.vertices.iter().any(|v| v.position == [10.0, 0.0, 10.0]));
        assert!(plane.vertices.iter().any(|v| v.position == [-10.0, 0.0, -10.0]));
    }

    #[test]
    fn in_parent_rotates_then_translates() {
        let parent = Transform::new()
            .position(Vec3::new(3.0, 0.0, 0.0))
            .rotation(Quat::from_rotation_z(std::f32::consts::FRAC_PI_2));
        let child = Transform::from_position(Vec3::new(1.0, 2.0, 0.5)).scale(Vec3::splat(0.4));

        let world = child.in_parent(&parent);
        // +90° about Z maps local (x, y) to (-y, x)
        assert!((world.position - Vec3::new(1.0, 1.0, 0.5)).length() < 1e-5);
        assert_eq!(world.scale, Vec3::splat(0.4));
    }
}
