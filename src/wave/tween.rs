//! Time-based interpolation of a single scalar property.
//!
//! Every frame the mapper hands each box a fresh target. A [`Tween`] owns the
//! progression toward that target; a newer target replaces whatever was in
//! flight (last write wins, nothing is queued).

use std::f32::consts::PI;

/// Easing curve applied over a tween's normalized progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Ease {
    Linear,
    /// Half a cosine period: slow start, slow finish.
    #[default]
    SineInOut,
}

impl Ease {
    /// Eased progress for `t`, clamped into `[0, 1]` first.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::SineInOut => -((PI * t).cos() - 1.0) / 2.0,
        }
    }
}

/// Interpolation state for one property.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Tween {
    Idle {
        value: f32,
    },
    Animating {
        from: f32,
        to: f32,
        elapsed: f32,
        duration: f32,
        ease: Ease,
    },
}

impl Default for Tween {
    fn default() -> Self {
        Tween::Idle { value: 0.0 }
    }
}

impl Tween {
    pub fn new(value: f32) -> Self {
        Tween::Idle { value }
    }

    /// Current (eased) value.
    pub fn value(&self) -> f32 {
        match *self {
            Tween::Idle { value } => value,
            Tween::Animating {
                from,
                to,
                elapsed,
                duration,
                ease,
            } => {
                let t = ease.apply(elapsed / duration);
                from * (1.0 - t) + to * t
            }
        }
    }

    /// Value the tween is heading to (or resting at).
    pub fn target(&self) -> f32 {
        match *self {
            Tween::Idle { value } => value,
            Tween::Animating { to, .. } => to,
        }
    }

    pub fn is_animating(&self) -> bool {
        matches!(self, Tween::Animating { .. })
    }

    /// Start moving toward `to` from wherever the property is right now.
    ///
    /// Any in-flight interpolation is dropped. Asking for the destination the
    /// tween already has is a no-op so that an unchanged target does not keep
    /// restarting the curve.
    pub fn retarget(&mut self, to: f32, duration: f32, ease: Ease) {
        if self.target() == to {
            return;
        }
        if duration <= 0.0 {
            *self = Tween::Idle { value: to };
            return;
        }
        *self = Tween::Animating {
            from: self.value(),
            to,
            elapsed: 0.0,
            duration,
            ease,
        };
    }

    /// Jump straight to `value`, cancelling any animation.
    pub fn snap(&mut self, value: f32) {
        *self = Tween::Idle { value };
    }

    /// Advance by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        let finished = match self {
            Tween::Animating {
                to,
                elapsed,
                duration,
                ..
            } => {
                *elapsed += dt;
                (*elapsed >= *duration).then_some(*to)
            }
            Tween::Idle { .. } => None,
        };
        if let Some(value) = finished {
            *self = Tween::Idle { value };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sine_in_out_is_symmetric_and_pinned() {
        let e = Ease::SineInOut;
        assert_eq!(e.apply(0.0), 0.0);
        assert!((e.apply(1.0) - 1.0).abs() < 1e-6);
        assert!((e.apply(0.5) - 0.5).abs() < 1e-6);
        assert!((e.apply(0.25) + e.apply(0.75) - 1.0).abs() < 1e-6);
        assert_eq!(e.apply(-3.0), 0.0);
    }

    #[test]
    fn reaches_target_after_duration() {
        let mut t = Tween::new(0.0);
        t.retarget(2.0, 0.1, Ease::SineInOut);
        assert!(t.is_animating());
        assert_eq!(t.value(), 0.0);

        t.advance(0.05);
        let halfway = t.value();
        assert!(halfway > 0.0 && halfway < 2.0);

        t.advance(0.05);
        assert_eq!(t, Tween::Idle { value: 2.0 });
    }

    #[test]
    fn newer_target_supersedes_in_flight_one() {
        let mut t = Tween::new(0.0);
        t.retarget(1.0, 0.1, Ease::Linear);
        t.advance(0.05);
        let midway = t.value();

        t.retarget(-1.0, 0.1, Ease::Linear);
        assert_eq!(t.target(), -1.0);
        // continues from where the previous animation left off
        assert!((t.value() - midway).abs() < 1e-6);

        t.advance(0.2);
        assert_eq!(t.value(), -1.0);
        assert!(!t.is_animating());
    }

    #[test]
    fn same_target_does_not_restart() {
        let mut t = Tween::new(0.0);
        t.retarget(1.0, 0.1, Ease::Linear);
        t.advance(0.04);
        let before = t;
        t.retarget(1.0, 0.1, Ease::Linear);
        assert_eq!(t, before);
    }

    #[test]
    fn zero_duration_snaps() {
        let mut t = Tween::new(3.0);
        t.retarget(5.0, 0.0, Ease::SineInOut);
        assert_eq!(t, Tween::Idle { value: 5.0 });
    }

    #[test]
    fn idle_ignores_advance() {
        let mut t = Tween::new(0.25);
        t.advance(10.0);
        assert_eq!(t.value(), 0.25);
    }
}
