use glam::Vec3;
use hecs::World;

use crate::wave::mapping::{ColorRamp, MotionParams, planar_distance};
use crate::wave::tween::Ease;
use crate::wave::wall::Wall;

/// Summary of one mapper pass, mostly for the panel and logs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Wall on the point's side of the scene, `None` without walls.
    pub active_wall: Option<usize>,
    pub cells_updated: usize,
    /// The point crossed over to another wall this frame.
    pub side_changed: bool,
}

/// Turns the moving point's position into per-cell targets every frame.
///
/// The mapper only sets targets. Progression toward them belongs to each
/// cell's tweens and happens in [`WaveMapper::apply`].
#[derive(Clone, Debug)]
pub struct WaveMapper {
    pub tween_duration: f32,
    pub ease: Ease,
    active_wall: Option<usize>,
}

impl Default for WaveMapper {
    fn default() -> Self {
        Self {
            tween_duration: 0.1,
            ease: Ease::SineInOut,
            active_wall: None,
        }
    }
}

impl WaveMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_wall(&self) -> Option<usize> {
        self.active_wall
    }

    /// Retarget every cell of every wall against `point`.
    ///
    /// Each wall measures distances in its own frame, so a wall far from the
    /// point settles on the resting clamp bound while its neighbour ripples.
    /// All walls are recomputed regardless of which one is active. With
    /// `ramp` set, cell colors follow the normalized distance immediately.
    pub fn update(
        &mut self,
        walls: &mut [Wall],
        point: Vec3,
        motion: &MotionParams,
        ramp: Option<&ColorRamp>,
    ) -> FrameReport {
        let mut cells_updated = 0;

        for wall in walls.iter_mut() {
            let local = wall.planar_point(point);

            for cell in wall.cells_mut() {
                let distance = planar_distance(local, cell.planar);
                let amount = motion.displacement(distance);

                cell.front_y.retarget(-amount, self.tween_duration, self.ease);
                cell.back_y.retarget(amount, self.tween_duration, self.ease);

                if let Some(ramp) = ramp {
                    cell.color = ramp.sample(motion.normalized(distance));
                }
                cells_updated += 1;
            }
        }

        let active_wall = nearest_wall(walls, point);
        let side_changed = self.active_wall.is_some() && active_wall != self.active_wall;
        if side_changed {
            log::debug!(
                "point crossed to wall {:?} at x = {:.2}",
                active_wall,
                point.x
            );
        }
        self.active_wall = active_wall;

        FrameReport {
            active_wall,
            cells_updated,
            side_changed,
        }
    }

    /// Step all tweens by `dt` and push the results onto the box entities.
    pub fn apply(&self, walls: &mut [Wall], world: &mut World, dt: f32) {
        for wall in walls {
            wall.sync(world, dt);
        }
    }
}

/// Index of the wall closest to `point` along X.
///
/// For two walls mirrored about `x = 0` this partitions the scene at the
/// midline. Ties go to the first wall.
fn nearest_wall(walls: &[Wall], point: Vec3) -> Option<usize> {
    walls
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            let da = (point.x - a.offset().x).abs();
            let db = (point.x - b.offset().x).abs();
            da.total_cmp(&db)
        })
        .map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::ecs::{Material, MeshId, RenderMesh};
    use crate::mesh::Transform;
    use crate::wave::mapping::{ClampParams, quantize};
    use crate::wave::wall::WallLayout;

    const REST: f32 = 0.05;

    fn spawn_walls(world: &mut World, offsets: &[f32]) -> Vec<Wall> {
        offsets
            .iter()
            .map(|&x| {
                Wall::spawn(
                    world,
                    WallLayout::default().at(Vec3::new(x, 0.0, 0.0)),
                    MeshId::from_index(0),
                    Material::standard(Color::hex(0xff0000)),
                )
            })
            .collect()
    }

    #[test]
    fn front_and_back_targets_are_exact_opposites() {
        let mut world = World::new();
        let mut walls = spawn_walls(&mut world, &[0.0]);
        let mut mapper = WaveMapper::new();

        let report = mapper.update(
            &mut walls,
            Vec3::new(0.0, 1.0, 1.3),
            &MotionParams::default(),
            None,
        );
        assert_eq!(report.cells_updated, 150);
        assert_eq!(report.active_wall, Some(0));

        for cell in walls[0].cells() {
            assert_eq!(cell.front_y.target(), -cell.back_y.target());
        }
        // something near the point must have been pushed out
        assert!(walls[0].cells().iter().any(|c| c.back_y.target() < 0.0));
    }

    #[test]
    fn eased_displacements_stay_opposite_while_params_change() {
        let mut world = World::new();
        let mut walls = spawn_walls(&mut world, &[-3.0, 3.0]);
        let mut mapper = WaveMapper::new();
        let mut motion = MotionParams::default();
        let dt = 1.0 / 60.0;

        for frame in 0..240 {
            match frame {
                40 => std::mem::swap(&mut motion.clamp.min, &mut motion.clamp.max),
                90 => {
                    motion.range.in_min = -1.0;
                    motion.range.max = 3.5;
                }
                // changed while the previous targets are still easing
                91 => motion.clamp = ClampParams { min: 2.0, max: -0.5 },
                _ => {}
            }
            let t = frame as f32 * dt;
            let point = Vec3::new(-4.0 + t * 3.0, 1.0, (t * 2.0).sin() * 2.0);

            mapper.update(&mut walls, point, &motion, None);
            mapper.apply(&mut walls, &mut world, dt);

            for wall in &walls {
                let container = wall.layout().container();
                for cell in wall.cells() {
                    assert_eq!(cell.front_y.value(), -cell.back_y.value());

                    let front = world.get::<&Transform>(cell.front).unwrap().position;
                    let back = world.get::<&Transform>(cell.back).unwrap().position;
                    let rest = container.position
                        + container.rotation * Vec3::new(cell.planar.x, 0.0, cell.planar.y);
                    assert!(((front + back) * 0.5 - rest).length() < 1e-5);
                }
            }
        }
    }

    #[test]
    fn only_the_near_wall_ripples() {
        let mut world = World::new();
        let mut walls = spawn_walls(&mut world, &[-3.0, 3.0]);
        let mut mapper = WaveMapper::new();

        let report = mapper.update(
            &mut walls,
            Vec3::new(-3.0, 1.0, 1.0),
            &MotionParams::default(),
            None,
        );
        assert_eq!(report.active_wall, Some(0));
        assert_eq!(report.cells_updated, 300);

        // both walls were recomputed; the far one rests on the clamp bound
        for cell in walls[1].cells() {
            assert_eq!(cell.back_y.target(), REST);
            assert_eq!(cell.front_y.target(), -REST);
        }
        assert!(walls[0].cells().iter().any(|c| c.back_y.target() != REST));
    }

    #[test]
    fn crossing_the_midline_is_reported_once() {
        let mut world = World::new();
        let mut walls = spawn_walls(&mut world, &[-3.0, 3.0]);
        let mut mapper = WaveMapper::new();
        let motion = MotionParams::default();

        let first = mapper.update(&mut walls, Vec3::new(-1.0, 1.0, 0.0), &motion, None);
        assert!(!first.side_changed);

        let crossed = mapper.update(&mut walls, Vec3::new(0.5, 1.0, 0.0), &motion, None);
        assert_eq!(crossed.active_wall, Some(1));
        assert!(crossed.side_changed);

        let stayed = mapper.update(&mut walls, Vec3::new(2.0, 1.0, 0.0), &motion, None);
        assert!(!stayed.side_changed);
    }

    #[test]
    fn color_ramp_uses_quantized_distance() {
        let mut world = World::new();
        let mut walls = spawn_walls(&mut world, &[0.0]);
        let mut mapper = WaveMapper::new();
        let motion = MotionParams::default();
        let ramp = ColorRamp::default();
        let point = Vec3::new(0.0, 0.3, 0.9);

        mapper.update(&mut walls, point, &motion, Some(&ramp));

        let local = walls[0].planar_point(point);
        for cell in walls[0].cells() {
            let t = motion.normalized(planar_distance(local, cell.planar));
            assert_eq!(t, quantize(t));
            assert_eq!(cell.color, ramp.sample(t));
        }
        // far cells sit at the start color
        let far = walls[0].cell(14, 9).unwrap();
        assert_eq!(far.color, ramp.start);
    }

    #[test]
    fn colors_untouched_without_ramp() {
        let mut world = World::new();
        let mut walls = spawn_walls(&mut world, &[0.0]);
        let mut mapper = WaveMapper::new();
        mapper.update(&mut walls, Vec3::ZERO, &MotionParams::default(), None);
        assert!(walls[0].cells().iter().all(|c| c.color == Color::hex(0xff0000)));
    }

    #[test]
    fn apply_lands_on_targets_after_tween_duration() {
        let mut world = World::new();
        let mut walls = spawn_walls(&mut world, &[0.0]);
        let mut mapper = WaveMapper::new();
        mapper.update(&mut walls, Vec3::new(0.0, 1.0, 1.0), &MotionParams::default(), None);

        mapper.apply(&mut walls, &mut world, 0.05);
        assert!(walls[0].cells().iter().any(|c| c.front_y.is_animating()));

        mapper.apply(&mut walls, &mut world, 0.05);
        for cell in walls[0].cells() {
            assert!(!cell.front_y.is_animating());
            let render = world.get::<&RenderMesh>(cell.front).unwrap();
            assert_eq!(render.material.color, cell.color);
        }
    }
}
