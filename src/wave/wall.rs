//! Fixed grids of front/back box pairs.
//!
//! A [`Wall`] owns its cells in a flat arena (`col * rows + row`). Each cell
//! remembers the two `hecs` entities it drives, plus the tween state for
//! their displacement, so the renderer never needs to know about the wave.

use std::f32::consts::FRAC_PI_2;

use glam::{Quat, Vec2, Vec3};
use hecs::{Entity, World};

use crate::color::Color;
use crate::ecs::{Material, MeshId, RenderMesh};
use crate::mesh::Transform;
use crate::wave::tween::Tween;

/// Static shape of a wall. Fixed once the wall is spawned.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallLayout {
    pub cols: usize,
    pub rows: usize,
    /// Distance between neighbouring cell centers.
    pub spacing: f32,
    /// Scale applied to the unit cube for every box.
    pub box_scale: Vec3,
    /// Container position in world space.
    pub offset: Vec3,
    /// Container orientation. Local +Y is the displacement axis.
    pub rotation: Quat,
}

impl Default for WallLayout {
    fn default() -> Self {
        let size = 0.4;
        Self {
            cols: 15,
            rows: 10,
            spacing: size / 2.0,
            box_scale: Vec3::new(size, 0.1, size),
            offset: Vec3::ZERO,
            // stands the grid upright so boxes push out along world X
            rotation: Quat::from_rotation_z(FRAC_PI_2),
        }
    }
}

impl WallLayout {
    pub fn at(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    pub fn cell_count(&self) -> usize {
        self.cols * self.rows
    }

    /// Planar `(x, z)` coordinate of a cell in container space.
    pub fn planar(&self, col: usize, row: usize) -> Vec2 {
        Vec2::new(row as f32 * self.spacing, col as f32 * self.spacing)
    }

    pub fn container(&self) -> Transform {
        Transform::from_position(self.offset).rotation(self.rotation)
    }
}

/// One grid position: a front and a back box sharing the same planar spot.
#[derive(Clone, Debug)]
pub struct Cell {
    pub col: usize,
    pub row: usize,
    pub planar: Vec2,
    pub front: Entity,
    pub back: Entity,
    /// Displacement of the front box along the container's Y axis.
    pub front_y: Tween,
    pub back_y: Tween,
    pub color: Color,
}

impl Cell {
    /// Local transform of a box of this cell displaced by `y`.
    fn local(&self, y: f32, scale: Vec3) -> Transform {
        Transform::from_position(Vec3::new(self.planar.x, y, self.planar.y)).scale(scale)
    }
}

#[derive(Clone, Debug)]
pub struct Wall {
    layout: WallLayout,
    cells: Vec<Cell>,
}

impl Wall {
    /// Spawn `2 * cols * rows` box entities into `world` and build the wall
    /// that drives them.
    pub fn spawn(world: &mut World, layout: WallLayout, mesh: MeshId, material: Material) -> Self {
        let container = layout.container();
        let mut cells = Vec::with_capacity(layout.cell_count());

        for col in 0..layout.cols {
            for row in 0..layout.rows {
                let planar = layout.planar(col, row);
                let at_rest = Transform::from_position(Vec3::new(planar.x, 0.0, planar.y))
                    .scale(layout.box_scale)
                    .in_parent(&container);

                let front = world.spawn((at_rest, RenderMesh::new(mesh, material)));
                let back = world.spawn((at_rest, RenderMesh::new(mesh, material)));

                cells.push(Cell {
                    col,
                    row,
                    planar,
                    front,
                    back,
                    front_y: Tween::new(0.0),
                    back_y: Tween::new(0.0),
                    color: material.color,
                });
            }
        }

        Self { layout, cells }
    }

    pub fn layout(&self) -> &WallLayout {
        &self.layout
    }

    pub fn offset(&self) -> Vec3 {
        self.layout.offset
    }

    pub fn cell(&self, col: usize, row: usize) -> Option<&Cell> {
        if col >= self.layout.cols || row >= self.layout.rows {
            return None;
        }
        self.cells.get(col * self.layout.rows + row)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Where `point` lands on this wall's plane.
    ///
    /// The vertical coordinate is folded into the first planar axis, which is
    /// how the sphere's height lifts the ripple along the upright wall.
    pub fn planar_point(&self, point: Vec3) -> Vec2 {
        let o = self.layout.offset;
        Vec2::new(point.x - o.x + point.y - o.y, point.z - o.z)
    }

    /// Advance every tween by `dt` and write the resulting transforms and
    /// colors onto the box entities.
    ///
    /// Entities that were despawned behind the wall's back are skipped.
    pub fn sync(&mut self, world: &mut World, dt: f32) {
        let container = self.layout.container();
        let scale = self.layout.box_scale;

        for cell in &mut self.cells {
            cell.front_y.advance(dt);
            cell.back_y.advance(dt);

            for (entity, y) in [
                (cell.front, cell.front_y.value()),
                (cell.back, cell.back_y.value()),
            ] {
                if let Ok((transform, render)) =
                    world.query_one_mut::<(&mut Transform, &mut RenderMesh)>(entity)
                {
                    *transform = cell.local(y, scale).in_parent(&container);
                    render.material.color = cell.color;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn_default(world: &mut World) -> Wall {
        Wall::spawn(
            world,
            WallLayout::default(),
            MeshId::from_index(0),
            Material::standard(Color::RED),
        )
    }

    #[test]
    fn spawns_two_entities_per_cell() {
        let mut world = World::new();
        let wall = spawn_default(&mut world);
        assert_eq!(wall.cells().len(), 150);
        assert_eq!(world.len(), 300);
    }

    #[test]
    fn arena_index_matches_grid_position() {
        let mut world = World::new();
        let wall = spawn_default(&mut world);

        let cell = wall.cell(3, 7).unwrap();
        assert_eq!((cell.col, cell.row), (3, 7));
        assert_eq!(cell.planar, Vec2::new(7.0 * 0.2, 3.0 * 0.2));
        assert!(wall.cell(15, 0).is_none());
        assert!(wall.cell(0, 10).is_none());
    }

    #[test]
    fn planar_offsets_are_unique() {
        let mut world = World::new();
        let wall = spawn_default(&mut world);
        let cells = wall.cells();
        for (i, a) in cells.iter().enumerate() {
            for b in &cells[i + 1..] {
                assert_ne!(a.planar, b.planar);
            }
        }
    }

    #[test]
    fn planar_point_folds_height_and_subtracts_offset() {
        let mut world = World::new();
        let wall = Wall::spawn(
            &mut world,
            WallLayout::default().at(Vec3::new(-3.0, 0.0, 0.0)),
            MeshId::from_index(0),
            Material::default(),
        );
        let p = wall.planar_point(Vec3::new(-3.0, 1.0, 2.5));
        assert_eq!(p, Vec2::new(1.0, 2.5));
    }

    #[test]
    fn sync_moves_boxes_along_world_x() {
        let mut world = World::new();
        let mut wall = spawn_default(&mut world);
        let cell = &mut wall.cells_mut()[0];
        cell.front_y.snap(-1.0);
        cell.back_y.snap(1.0);
        cell.color = Color::BLUE;
        let (front, back) = (cell.front, cell.back);

        wall.sync(&mut world, 0.0);

        let front_t = *world.get::<&Transform>(front).unwrap();
        let back_t = *world.get::<&Transform>(back).unwrap();
        // container is rotated +90° about Z: local +Y becomes world -X
        assert!((front_t.position - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-6);
        assert!((back_t.position - Vec3::new(-1.0, 0.0, 0.0)).length() < 1e-6);
        assert_eq!(
            world.get::<&RenderMesh>(back).unwrap().material.color,
            Color::BLUE
        );
    }

    #[test]
    fn sync_skips_despawned_entities() {
        let mut world = World::new();
        let mut wall = spawn_default(&mut world);
        let front = wall.cells()[0].front;
        world.despawn(front).unwrap();
        wall.sync(&mut world, 0.016);
        assert_eq!(world.len(), 299);
    }
}
