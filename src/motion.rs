//! Looping motion for the sphere.
//!
//! A [`YoyoTrack`] swings one scalar back and forth forever. A [`MotionPath`]
//! combines optional tracks for X and Z on top of a fixed origin.

use glam::Vec3;

use crate::wave::tween::Ease;

/// One scalar going `from → to → from → …`, each leg lasting `duration`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct YoyoTrack {
    pub from: f32,
    pub to: f32,
    /// Seconds per leg.
    pub duration: f32,
    pub ease: Ease,
}

impl YoyoTrack {
    pub fn new(from: f32, to: f32, duration: f32) -> Self {
        Self {
            from,
            to,
            duration,
            ease: Ease::SineInOut,
        }
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    /// Value at `time` seconds after the track started.
    ///
    /// Even legs run forward, odd legs run backward with the same ease.
    /// Negative time is treated as zero and a non-positive duration pins the
    /// value at `to`.
    pub fn value(&self, time: f32) -> f32 {
        if self.duration <= 0.0 {
            return self.to;
        }
        let legs = time.max(0.0) / self.duration;
        let leg = legs.floor();
        let mut t = legs - leg;
        if leg as u64 % 2 == 1 {
            t = 1.0 - t;
        }
        let t = self.ease.apply(t);
        self.from * (1.0 - t) + self.to * t
    }
}

/// Position of the moving point over time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionPath {
    pub origin: Vec3,
    pub x: Option<YoyoTrack>,
    pub z: Option<YoyoTrack>,
}

impl MotionPath {
    /// A point that never moves.
    pub fn fixed(origin: Vec3) -> Self {
        Self {
            origin,
            x: None,
            z: None,
        }
    }

    pub fn with_x(mut self, track: YoyoTrack) -> Self {
        self.x = Some(track);
        self
    }

    pub fn with_z(mut self, track: YoyoTrack) -> Self {
        self.z = Some(track);
        self
    }

    pub fn position(&self, time: f32) -> Vec3 {
        let mut position = self.origin;
        if let Some(track) = &self.x {
            position.x = track.value(time);
        }
        if let Some(track) = &self.z {
            position.z = track.value(time);
        }
        position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yoyo_reverses_every_leg() {
        let track = YoyoTrack::new(-4.0, 8.0, 5.0);
        assert_eq!(track.value(0.0), -4.0);
        assert!((track.value(5.0) - 8.0).abs() < 1e-5);
        assert!((track.value(10.0) + 4.0).abs() < 1e-5);
        assert!((track.value(2.5) - 2.0).abs() < 1e-4);
        // the return leg mirrors the outbound one
        assert!((track.value(6.0) - track.value(4.0)).abs() < 1e-4);
        assert!((track.value(13.0) - track.value(3.0)).abs() < 1e-4);
    }

    #[test]
    fn yoyo_stays_within_endpoints() {
        let track = YoyoTrack::new(-4.0, 4.0, 6.5).ease(Ease::Linear);
        for i in 0..400 {
            let v = track.value(i as f32 * 0.1);
            assert!((-4.0..=4.0).contains(&v));
        }
        assert_eq!(track.value(-1.0), -4.0);
    }

    #[test]
    fn zero_duration_pins_to_destination() {
        let track = YoyoTrack::new(1.0, 2.0, 0.0);
        assert_eq!(track.value(3.0), 2.0);
    }

    #[test]
    fn path_drives_only_tracked_axes() {
        let path = MotionPath::fixed(Vec3::new(0.0, 1.0, -4.0)).with_z(YoyoTrack::new(-4.0, 8.0, 5.0));
        let p = path.position(5.0);
        assert_eq!(p.x, 0.0);
        assert_eq!(p.y, 1.0);
        assert!((p.z - 8.0).abs() < 1e-5);

        let swept = path.with_x(YoyoTrack::new(-4.0, 4.0, 6.5));
        assert_eq!(swept.position(0.0), Vec3::new(-4.0, 1.0, -4.0));
    }
}
