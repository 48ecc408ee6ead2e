//! The "Motion" debug panel.

use glam::Vec3;

use crate::color::Color;
use crate::config::SceneParams;

/// Slider bounds for the range parameters.
const RANGE_LIMIT: f32 = 100.0;
const RANGE_STEP: f64 = 0.1;

/// Read-only numbers shown at the bottom of the panel.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PanelStats {
    /// Seconds spent on the last frame.
    pub frame_time: f32,
    pub active_wall: Option<usize>,
    pub walls: usize,
    pub sphere: Vec3,
}

impl PanelStats {
    pub fn fps(&self) -> f32 {
        if self.frame_time > 0.0 {
            1.0 / self.frame_time
        } else {
            0.0
        }
    }

    /// Human-readable name of the active wall.
    pub fn wall_label(&self) -> &'static str {
        match (self.walls, self.active_wall) {
            (_, None) => "none",
            (1, Some(_)) => "center",
            (_, Some(0)) => "left",
            (_, Some(_)) => "right",
        }
    }
}

fn range_slider<'a>(value: &'a mut f32, label: &str) -> egui::Slider<'a> {
    egui::Slider::new(value, -RANGE_LIMIT..=RANGE_LIMIT)
        .step_by(RANGE_STEP)
        .text(label)
}

fn color_row(ui: &mut egui::Ui, label: &str, color: &mut Color) -> bool {
    ui.horizontal(|ui| {
        let mut rgb = color.to_rgb8();
        let changed = ui.color_edit_button_srgb(&mut rgb).changed();
        if changed {
            color.set_rgb8(rgb);
        }
        ui.label(format!("{label} {}", color.to_hex()));
        changed
    })
    .inner
}

fn vec3_row(ui: &mut egui::Ui, label: &str, value: &mut Vec3) -> bool {
    ui.horizontal(|ui| {
        ui.label(label);
        let mut changed = false;
        for axis in [&mut value.x, &mut value.y, &mut value.z] {
            changed |= ui
                .add(egui::DragValue::new(axis).speed(0.1).fixed_decimals(1))
                .changed();
        }
        changed
    })
    .inner
}

/// Show the panel and apply edits to `params`. Returns true if anything
/// changed this frame.
pub fn draw_panel(ctx: &egui::Context, params: &mut SceneParams, stats: &PanelStats) -> bool {
    let mut changed = false;

    egui::Window::new("Motion")
        .default_pos([12.0, 12.0])
        .resizable(false)
        .show(ctx, |ui| {
            egui::CollapsingHeader::new("Range")
                .default_open(true)
                .show(ui, |ui| {
                    let range = &mut params.motion.range;
                    changed |= ui.add(range_slider(&mut range.in_min, "inMin")).changed();
                    changed |= ui.add(range_slider(&mut range.in_max, "inMax")).changed();
                    changed |= ui.add(range_slider(&mut range.min, "min")).changed();
                    changed |= ui.add(range_slider(&mut range.max, "max")).changed();
                });

            egui::CollapsingHeader::new("Clamp").show(ui, |ui| {
                let clamp = &mut params.motion.clamp;
                changed |= ui.add(range_slider(&mut clamp.min, "min")).changed();
                changed |= ui.add(range_slider(&mut clamp.max, "max")).changed();
            });

            egui::CollapsingHeader::new("Color").show(ui, |ui| {
                changed |= ui
                    .checkbox(&mut params.color_lerp, "lerp by distance")
                    .changed();
                ui.add_enabled_ui(params.color_lerp, |ui| {
                    changed |= color_row(ui, "start", &mut params.ramp.start);
                    changed |= color_row(ui, "end", &mut params.ramp.end);
                });
            });

            egui::CollapsingHeader::new("Light").show(ui, |ui| {
                let lights = &mut params.lights;
                changed |= vec3_row(ui, "position", &mut lights.position);
                changed |= vec3_row(ui, "target", &mut lights.target);
                changed |= ui
                    .add(
                        egui::Slider::new(&mut lights.directional_intensity, 0.0..=3.0)
                            .text("intensity"),
                    )
                    .changed();
                changed |= ui
                    .add(egui::Slider::new(&mut lights.ambient_intensity, 0.0..=2.0).text("ambient"))
                    .changed();
            });

            ui.separator();
            ui.label(format!(
                "{:.2} ms ({:.0} fps)",
                stats.frame_time * 1000.0,
                stats.fps()
            ));
            ui.label(format!("active wall: {}", stats.wall_label()));
            ui.label(format!(
                "sphere: ({:.2}, {:.2}, {:.2})",
                stats.sphere.x, stats.sphere.y, stats.sphere.z
            ));
            ui.small("drag to orbit, scroll to zoom, H hides this panel");
        });

    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wall_labels() {
        let mut stats = PanelStats {
            walls: 2,
            active_wall: Some(0),
            ..Default::default()
        };
        assert_eq!(stats.wall_label(), "left");
        stats.active_wall = Some(1);
        assert_eq!(stats.wall_label(), "right");
        stats.walls = 1;
        stats.active_wall = Some(0);
        assert_eq!(stats.wall_label(), "center");
        stats.active_wall = None;
        assert_eq!(stats.wall_label(), "none");
    }

    #[test]
    fn fps_from_frame_time() {
        let stats = PanelStats {
            frame_time: 0.02,
            ..Default::default()
        };
        assert!((stats.fps() - 50.0).abs() < 1e-3);
        assert_eq!(PanelStats::default().fps(), 0.0);
    }

    #[test]
    fn panel_runs_headless_without_edits() {
        let ctx = egui::Context::default();
        let mut params = SceneParams::default();
        let before = params;
        let mut changed = true;
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            changed = draw_panel(ctx, &mut params, &PanelStats::default());
        });
        assert!(!changed);
        assert_eq!(params, before);
    }
}
