//! Time-bounded interpolations.
//!
//! Tweens are sampled against an absolute clock (`Duration` since the session
//! started), so sampling is a pure function of time: the same `now` always
//! yields the same value, and a replacement tween can start exactly where the
//! old one is.

use std::time::Duration;

use cgmath::Vector3;

use super::easing::{ease_in_out_cubic, ease_out_back, ease_out_cubic, Easing};
use crate::gfx::{
    camera::{orbit_camera::CameraPose, pose_solver::shortest_angular_delta},
    scene::RootTransform,
};

/// Values a tween can interpolate.
///
/// Implementations must return `a` exactly at `t = 0` and `b` exactly at `t = 1`.
pub trait Lerp: Copy {
    fn lerp(a: Self, b: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    #[inline]
    fn lerp(a: Self, b: Self, t: f32) -> Self {
        a * (1.0 - t) + b * t
    }
}

impl Lerp for Vector3<f32> {
    #[inline]
    fn lerp(a: Self, b: Self, t: f32) -> Self {
        Vector3::new(
            f32::lerp(a.x, b.x, t),
            f32::lerp(a.y, b.y, t),
            f32::lerp(a.z, b.z, t),
        )
    }
}

/// Fraction of `duration` elapsed at `now`, clamped to `[0, 1]`.
pub fn progress(started_at: Duration, duration: Duration, now: Duration) -> f32 {
    if duration.is_zero() {
        return 1.0;
    }
    let elapsed = now.saturating_sub(started_at).as_secs_f32();
    (elapsed / duration.as_secs_f32()).clamp(0.0, 1.0)
}

/// Requested end state of a tween; the start is filled in by the registry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenSpec<T> {
    pub end: T,
    /// Intermediate value reached at `bounce_split` of the duration.
    pub bounce: Option<T>,
    pub bounce_split: f32,
    pub duration: Duration,
    pub easing: Easing,
}

impl<T> TweenSpec<T> {
    pub fn new(end: T, duration: Duration, easing: Easing) -> Self {
        Self {
            end,
            bounce: None,
            bounce_split: 0.5,
            duration,
            easing,
        }
    }

    /// Travel to `bounce` first, then settle on `end` for the remainder.
    pub fn with_bounce(mut self, bounce: T, split: f32) -> Self {
        self.bounce = Some(bounce);
        self.bounce_split = split;
        self
    }
}

/// Interpolation of a single value, optionally through a bounce value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween<T> {
    pub start: T,
    pub end: T,
    pub bounce: Option<T>,
    pub bounce_split: f32,
    pub started_at: Duration,
    pub duration: Duration,
    pub easing: Easing,
}

impl<T: Lerp> Tween<T> {
    pub fn new(start: T, spec: TweenSpec<T>, started_at: Duration) -> Self {
        Self {
            start,
            end: spec.end,
            bounce: spec.bounce,
            bounce_split: spec.bounce_split.clamp(f32::EPSILON, 1.0 - f32::EPSILON),
            started_at,
            duration: spec.duration,
            easing: spec.easing,
        }
    }

    pub fn progress(&self, now: Duration) -> f32 {
        progress(self.started_at, self.duration, now)
    }

    /// Value at normalized time `t`.
    pub fn sample_at(&self, t: f32) -> T {
        if t >= 1.0 {
            return self.end;
        }
        if t <= 0.0 {
            return self.start;
        }
        match self.bounce {
            None => T::lerp(self.start, self.end, self.easing.apply(t)),
            Some(bounce) if t < self.bounce_split => {
                T::lerp(self.start, bounce, self.easing.apply(t / self.bounce_split))
            }
            Some(bounce) => {
                let rest = (t - self.bounce_split) / (1.0 - self.bounce_split);
                T::lerp(bounce, self.end, self.easing.apply(rest))
            }
        }
    }

    pub fn sample(&self, now: Duration) -> T {
        self.sample_at(self.progress(now))
    }

    pub fn is_complete(&self, now: Duration) -> bool {
        self.progress(now) >= 1.0
    }
}

/// Camera orbit move between two poses.
///
/// Angles ease with the cubic in-out curve; distance and fov sample the same
/// curve at `min(1, t * distance_lead)` so zoom runs slightly ahead of the
/// rotation. The end azimuth is unwrapped onto the shorter arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTween {
    pub from: CameraPose,
    pub to: CameraPose,
    pub started_at: Duration,
    pub duration: Duration,
    pub distance_lead: f32,
    /// Pin free zoom to the final distance when this tween completes.
    pub lock_distance: bool,
}

impl CameraTween {
    pub fn new(
        from: CameraPose,
        to: CameraPose,
        started_at: Duration,
        duration: Duration,
        distance_lead: f32,
    ) -> Self {
        let mut to = to;
        to.azimuth = from.azimuth + shortest_angular_delta(from.azimuth, to.azimuth);
        Self {
            from,
            to,
            started_at,
            duration,
            distance_lead: distance_lead.max(1.0),
            lock_distance: false,
        }
    }

    pub fn with_lock_distance(mut self, lock: bool) -> Self {
        self.lock_distance = lock;
        self
    }

    pub fn progress(&self, now: Duration) -> f32 {
        progress(self.started_at, self.duration, now)
    }

    pub fn sample_at(&self, t: f32) -> CameraPose {
        if t >= 1.0 {
            return self.to;
        }
        let orbit = ease_in_out_cubic(t);
        let zoom = ease_in_out_cubic((t * self.distance_lead).min(1.0));
        CameraPose {
            azimuth: f32::lerp(self.from.azimuth, self.to.azimuth, orbit),
            polar: f32::lerp(self.from.polar, self.to.polar, orbit),
            distance: f32::lerp(self.from.distance, self.to.distance, zoom),
            target: Vector3::lerp(self.from.target, self.to.target, orbit),
            fov: f32::lerp(self.from.fov, self.to.fov, zoom),
        }
    }

    pub fn sample(&self, now: Duration) -> CameraPose {
        self.sample_at(self.progress(now))
    }

    pub fn is_complete(&self, now: Duration) -> bool {
        self.progress(now) >= 1.0
    }
}

/// Whole-object slide-in: the offset eases with a back curve, the spin with a
/// plain cubic ease-out. `to.spin` may be several full turns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntroTween {
    pub from: RootTransform,
    pub to: RootTransform,
    pub started_at: Duration,
    pub duration: Duration,
}

impl IntroTween {
    pub fn new(
        from: RootTransform,
        to: RootTransform,
        started_at: Duration,
        duration: Duration,
    ) -> Self {
        Self {
            from,
            to,
            started_at,
            duration,
        }
    }

    pub fn progress(&self, now: Duration) -> f32 {
        progress(self.started_at, self.duration, now)
    }

    pub fn sample_at(&self, t: f32) -> RootTransform {
        if t >= 1.0 {
            return self.to;
        }
        RootTransform {
            offset: Vector3::lerp(self.from.offset, self.to.offset, ease_out_back(t)),
            spin: f32::lerp(self.from.spin, self.to.spin, ease_out_cubic(t)),
        }
    }

    pub fn sample(&self, now: Duration) -> RootTransform {
        self.sample_at(self.progress(now))
    }

    pub fn is_complete(&self, now: Duration) -> bool {
        self.progress(now) >= 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Zero;
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use std::f32::consts::PI;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn endpoints_are_exact() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let start = rng.random_range(-100.0_f32..100.0);
            let end = rng.random_range(-100.0_f32..100.0);
            let mut spec = TweenSpec::new(end, ms(400), Easing::InOutCubic);
            if rng.random_bool(0.5) {
                spec = spec.with_bounce(rng.random_range(-100.0_f32..100.0), 0.55);
            }
            let tween = Tween::new(start, spec, ms(1000));
            assert_eq!(tween.sample(ms(1000)), start);
            assert_eq!(tween.sample(ms(1400)), end);
            assert_eq!(tween.sample(ms(900)), start);
            assert_eq!(tween.sample(ms(5000)), end);
        }
    }

    #[test]
    fn sampling_is_monotonic_for_monotonic_easing() {
        let tween = Tween::new(2.0_f32, TweenSpec::new(-3.0, ms(300), Easing::InOutCubic), ms(0));
        let mut previous = tween.sample(ms(0));
        for step in 1..=300 {
            let value = tween.sample(ms(step));
            assert!(value <= previous, "increased at {step}ms");
            previous = value;
        }
    }

    #[test]
    fn bounce_passes_through_intermediate_value() {
        let spec = TweenSpec::new(1.06_f32, ms(1000), Easing::InOutCubic).with_bounce(1.12, 0.55);
        let tween = Tween::new(1.0, spec, ms(0));
        assert!((tween.sample(ms(550)) - 1.12).abs() < 1e-5);
        let peak = (0..=1000).map(|t| tween.sample(ms(t))).fold(f32::MIN, f32::max);
        assert!(peak > 1.06);
        assert_eq!(tween.sample(ms(1000)), 1.06);
    }

    #[test]
    fn zero_duration_completes_immediately() {
        let spec = TweenSpec::new(1.0, Duration::ZERO, Easing::Linear);
        let tween = Tween::new(0.0_f32, spec, ms(10));
        assert!(tween.is_complete(ms(10)));
        assert_eq!(tween.sample(ms(10)), 1.0);
    }

    fn pose(azimuth: f32, distance: f32, fov: f32) -> CameraPose {
        CameraPose::new(azimuth, 1.0, distance, Vector3::zero(), fov)
    }

    #[test]
    fn camera_takes_short_way_round() {
        let from = pose(0.2, 10.0, 0.8);
        let to = pose(2.0 * PI - 0.2, 10.0, 0.8);
        let tween = CameraTween::new(from, to, ms(0), ms(1000), 1.25);
        assert!((tween.to.azimuth - -0.2).abs() < 1e-5);
        for step in 0..=100 {
            let azimuth = tween.sample(ms(step * 10)).azimuth;
            assert!((-0.2 - 1e-5..=0.2 + 1e-5).contains(&azimuth));
        }
    }

    #[test]
    fn zoom_leads_rotation() {
        let from = pose(0.0, 10.0, 0.8);
        let tween = CameraTween::new(from, pose(1.0, 5.0, 0.6), ms(0), ms(1000), 1.25);
        let mid = tween.sample(ms(400));
        let orbit_fraction = mid.azimuth / 1.0;
        let zoom_fraction = (10.0 - mid.distance) / 5.0;
        let fov_fraction = (0.8 - mid.fov) / 0.2;
        assert!(zoom_fraction > orbit_fraction);
        assert!((zoom_fraction - fov_fraction).abs() < 1e-4);
        assert_eq!(tween.sample(ms(1000)), tween.to);
    }

    #[test]
    fn camera_endpoints() {
        let from = pose(0.3, 10.0, 0.8);
        let tween = CameraTween::new(from, pose(1.3, 6.0, 0.6), ms(100), ms(1000), 1.25);
        assert_eq!(tween.sample(ms(100)), from);
        assert_eq!(tween.sample(ms(1100)), tween.to);
    }

    #[test]
    fn intro_spin_can_exceed_a_turn() {
        let from = RootTransform {
            offset: Vector3::new(0.0, -4.0, 0.0),
            spin: 0.0,
        };
        let to = RootTransform {
            offset: Vector3::zero(),
            spin: 4.0 * PI,
        };
        let tween = IntroTween::new(from, to, ms(0), ms(1600));
        assert_eq!(tween.sample(ms(0)).spin, 0.0);
        assert_eq!(tween.sample(ms(1600)), to);
        let overshoot = (0..=160)
            .map(|step| tween.sample(ms(step * 10)).offset.y)
            .fold(f32::MIN, f32::max);
        assert!(overshoot > 0.0, "position should overshoot with the back curve");
    }
}
