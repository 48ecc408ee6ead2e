//! Pure arithmetic behind the ripple: planar distance, affine re-range,
//! order-insensitive clamping, two-decimal quantization and color ramps.
//!
//! Nothing here validates its inputs. Degenerate parameters (for example
//! `in_min == in_max`) produce NaN or infinities that flow straight through to
//! the renderer, the same way the live panel lets users dial in nonsense.

use glam::Vec2;

use crate::color::Color;

/// Euclidean distance between two points on the wall plane.
pub fn planar_distance(a: Vec2, b: Vec2) -> f32 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

/// Map `value` from `[in_min, in_max]` onto `[out_min, out_max]`.
///
/// The input bounds may come in either order; a reversed input range simply
/// inverts the map. Endpoints are reproduced exactly:
/// `map_range(in_min, ..) == out_min` and `map_range(in_max, ..) == out_max`.
pub fn map_range(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    let t = (value - in_min) / (in_max - in_min);
    out_min * (1.0 - t) + out_max * t
}

/// Clamp `value` between two bounds given in any order.
///
/// NaN passes through untouched instead of panicking like [`f32::clamp`].
pub fn clamp_between(value: f32, a: f32, b: f32) -> f32 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    if value < lo {
        lo
    } else if value > hi {
        hi
    } else {
        value
    }
}

/// Round to two decimal places.
pub fn quantize(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

/// Input distance range and the output range it is mapped onto.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RangeParams {
    pub in_min: f32,
    pub in_max: f32,
    pub min: f32,
    pub max: f32,
}

/// Clamp bounds applied after re-ranging. Usually negative.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClampParams {
    pub min: f32,
    pub max: f32,
}

/// Distance → displacement mapping parameters, edited live from the panel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionParams {
    pub range: RangeParams,
    pub clamp: ClampParams,
}

impl Default for MotionParams {
    fn default() -> Self {
        Self {
            range: RangeParams {
                in_min: 2.0,
                in_max: -0.5,
                min: 0.5,
                max: -1.8,
            },
            clamp: ClampParams {
                min: -4.5,
                max: 0.05,
            },
        }
    }
}

impl MotionParams {
    /// Displacement magnitude for a cell at distance `distance` from the point.
    pub fn displacement(&self, distance: f32) -> f32 {
        let r = &self.range;
        let ranged = map_range(distance, r.in_min, r.in_max, r.min, r.max);
        clamp_between(ranged, self.clamp.min, self.clamp.max)
    }

    /// Distance normalized into `[0, 1]` over the input range, quantized to
    /// two decimals.
    pub fn normalized(&self, distance: f32) -> f32 {
        let r = &self.range;
        quantize(clamp_between(
            map_range(distance, r.in_min, r.in_max, 0.0, 1.0),
            0.0,
            1.0,
        ))
    }
}

/// Two color endpoints interpolated per channel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorRamp {
    pub start: Color,
    pub end: Color,
}

impl Default for ColorRamp {
    fn default() -> Self {
        Self {
            start: Color::hex(0xff0000),
            end: Color::hex(0xffe600),
        }
    }
}

impl ColorRamp {
    /// Color at normalized position `t` (expected in `[0, 1]`).
    pub fn sample(&self, t: f32) -> Color {
        self.start.lerp(self.end, t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-6;

    fn params(in_min: f32, in_max: f32, min: f32, max: f32, cmin: f32, cmax: f32) -> MotionParams {
        MotionParams {
            range: RangeParams {
                in_min,
                in_max,
                min,
                max,
            },
            clamp: ClampParams {
                min: cmin,
                max: cmax,
            },
        }
    }

    #[test]
    fn planar_distance_is_euclidean() {
        assert_eq!(planar_distance(Vec2::ZERO, Vec2::new(3.0, 4.0)), 5.0);
        assert_eq!(planar_distance(Vec2::new(1.0, 1.0), Vec2::new(1.0, 1.0)), 0.0);
    }

    #[test]
    fn map_range_hits_endpoints_exactly() {
        let cases = [
            (2.0, -0.5, 0.5, -1.8),
            (2.5, -2.0, 0.5, -2.0),
            (-3.0, 7.0, 10.0, -10.0),
            (0.1, 0.3, 0.7, 0.2),
        ];
        for (in_min, in_max, min, max) in cases {
            assert_eq!(map_range(in_min, in_min, in_max, min, max), min);
            assert_eq!(map_range(in_max, in_min, in_max, min, max), max);
        }
    }

    #[test]
    fn map_range_is_monotonic_in_the_slope_direction() {
        // slope (max - min) / (in_max - in_min) = (-1.8 - 0.5) / (-0.5 - 2.0) > 0
        let mut previous = f32::NEG_INFINITY;
        for i in 0..50 {
            let v = map_range(i as f32 * 0.1, 2.0, -0.5, 0.5, -1.8);
            assert!(v > previous);
            previous = v;
        }

        // reversed output range flips the direction
        let mut previous = f32::INFINITY;
        for i in 0..50 {
            let v = map_range(i as f32 * 0.1, 0.0, 1.0, 1.0, 0.0);
            assert!(v < previous);
            previous = v;
        }
    }

    #[test]
    fn map_range_can_go_negative_for_positive_distance() {
        assert!(map_range(0.0, 2.0, -0.5, 0.5, -1.8) < 0.0);
    }

    #[test]
    fn map_range_with_empty_input_range_is_not_finite() {
        assert!(!map_range(1.0, 2.0, 2.0, 0.0, 1.0).is_finite());
    }

    #[test]
    fn clamp_is_idempotent_and_bounded() {
        let bounds = [(-4.5, 0.05), (0.05, -4.5), (1.0, 1.0), (-2.0, -3.0)];
        for (a, b) in bounds {
            let lo = f32::min(a, b);
            let hi = f32::max(a, b);
            for i in -100..100 {
                let v = i as f32 * 0.13;
                let once = clamp_between(v, a, b);
                assert_eq!(clamp_between(once, a, b), once);
                assert!(once >= lo && once <= hi);
            }
        }
    }

    #[test]
    fn clamp_swapped_bounds_match_ordered_bounds() {
        for i in -20..20 {
            let v = i as f32 * 0.5;
            assert_eq!(clamp_between(v, 0.05, -4.5), clamp_between(v, -4.5, 0.05));
        }
    }

    #[test]
    fn clamp_lets_nan_through() {
        assert!(clamp_between(f32::NAN, -1.0, 1.0).is_nan());
    }

    #[test]
    fn quantize_rounds_to_hundredths() {
        assert_eq!(quantize(0.123), 0.12);
        assert_eq!(quantize(0.126), 0.13);
        assert_eq!(quantize(1.0), 1.0);
        assert_eq!(quantize(0.0), 0.0);
    }

    #[test]
    fn displacement_scenario_from_zero_distance() {
        let p = params(2.5, -2.0, 0.5, -2.0, -4.5, 0.05);
        let ranged = map_range(0.0, 2.5, -2.0, 0.5, -2.0);

        // max + (0 - in_max) / (in_min - in_max) * (min - max) = -2 + (2 / 4.5) * 2.5
        let expected = -8.0 / 9.0;
        assert!((ranged - expected).abs() < EPS);

        let clamped = p.displacement(0.0);
        assert_eq!(clamped, ranged);
        assert!((-4.5..=0.05).contains(&clamped));
    }

    #[test]
    fn displacement_far_away_rests_on_clamp_bound() {
        let p = MotionParams::default();
        assert_eq!(p.displacement(50.0), 0.05);
    }

    #[test]
    fn normalized_distance_is_quantized_and_bounded() {
        let p = MotionParams::default();
        // in_min = 2 maps to 0, in_max = -0.5 maps to 1
        assert_eq!(p.normalized(2.0), 0.0);
        assert_eq!(p.normalized(10.0), 0.0);
        assert_eq!(p.normalized(0.0), 0.8);
        let t = p.normalized(0.37);
        assert_eq!(t, quantize(t));
    }

    #[test]
    fn color_ramp_endpoints_are_exact() {
        let ramp = ColorRamp {
            start: Color::rgb(0.1, 0.2, 0.3),
            end: Color::rgb(0.7, 0.9, 0.35),
        };
        assert_eq!(ramp.sample(0.0), ramp.start);
        assert_eq!(ramp.sample(1.0), ramp.end);
    }

    #[test]
    fn distances_rounding_together_share_a_color() {
        let p = MotionParams::default();
        let ramp = ColorRamp::default();
        let a = p.normalized(1.0001);
        let b = p.normalized(1.0004);
        assert_eq!(a, b);
        assert_eq!(ramp.sample(a), ramp.sample(b));
    }
}
