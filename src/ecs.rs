//! ECS components for entity-based rendering.
//!
//! Every visible object in the scene is a `hecs` entity carrying a
//! [`Transform`](crate::Transform) and a [`RenderMesh`]. The wave walls keep
//! the [`hecs::Entity`] of each box next to their own per-cell state and write
//! transforms and material colors straight into these components.
//!
//! # Example
//!
//! ```ignore
//! use wavewall::*;
//!
//! let cube = ctx.mesh_cube();
//! ctx.world.spawn((
//!     Transform::new().position(Vec3::new(0.0, 0.5, 0.0)),
//!     RenderMesh::new(cube, Material::standard(Color::hex(0xff0000))),
//! ));
//! ```

use crate::color::Color;

/// Type-safe handle to a mesh registered with the renderer.
///
/// Obtained from [`SetupContext::mesh_cube`](crate::SetupContext::mesh_cube) and
/// friends. Only the renderer resolves it, so scene logic and tests can pass
/// handles around without a GPU.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MeshId(pub(crate) usize);

impl MeshId {
    /// Handle for the `index`-th registered mesh.
    pub fn from_index(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// Surface parameters for the lit mesh shader.
///
/// A small subset of a physically based "standard" material: base color plus
/// metalness and roughness in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub color: Color,
    pub metalness: f32,
    pub roughness: f32,
    /// Unlit materials ignore the scene lights entirely.
    pub unlit: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self::standard(Color::WHITE)
    }
}

impl Material {
    /// A fully rough, non-metallic surface.
    pub fn standard(color: Color) -> Self {
        Self {
            color,
            metalness: 0.0,
            roughness: 1.0,
            unlit: false,
        }
    }

    /// Flat color, unaffected by lighting.
    pub fn unlit(color: Color) -> Self {
        Self {
            unlit: true,
            ..Self::standard(color)
        }
    }

    pub fn metalness(mut self, metalness: f32) -> Self {
        self.metalness = metalness;
        self
    }

    pub fn roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness;
        self
    }
}

/// Component for rendering a mesh on an entity.
///
/// Attach this component along with a [`Transform`](crate::Transform) to make
/// an entity renderable.
#[derive(Clone, Copy, Debug)]
pub struct RenderMesh {
    /// Handle to the mesh geometry.
    pub mesh: MeshId,
    pub material: Material,
    /// Hidden meshes stay in the world but are skipped by the renderer.
    pub visible: bool,
}

impl RenderMesh {
    pub fn new(mesh: MeshId, material: Material) -> Self {
        Self {
            mesh,
            material,
            visible: true,
        }
    }
}
