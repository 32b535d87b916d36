//! Easing curves.
//!
//! Every curve maps `[0, 1]` onto a progress value that is exactly `0` at
//! `t = 0` and exactly `1` at `t = 1`. Inputs outside the range are clamped.

/// Overshoot amount of the back curve.
const BACK_OVERSHOOT: f32 = 1.70158;

/// Linear interpolation (no easing)
#[inline]
pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Cubic ease-in-out: slow start, fast middle, slow finish
#[inline]
pub fn ease_in_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Cubic ease-out: fast start, slow finish
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Back ease-out: runs past the end value, then settles onto it.
#[inline]
pub fn ease_out_back(t: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    let c3 = BACK_OVERSHOOT + 1.0;
    let u = t - 1.0;
    1.0 + c3 * u.powi(3) + BACK_OVERSHOOT * u.powi(2)
}

/// Easing function type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    #[default]
    InOutCubic,
    OutCubic,
    OutBack,
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        match self {
            Easing::Linear => linear(t),
            Easing::InOutCubic => ease_in_out_cubic(t),
            Easing::OutCubic => ease_out_cubic(t),
            Easing::OutBack => ease_out_back(t),
        }
    }

    /// Whether the curve never moves backwards.
    pub fn is_monotonic(self) -> bool {
        !matches!(self, Easing::OutBack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 4] = [
        Easing::Linear,
        Easing::InOutCubic,
        Easing::OutCubic,
        Easing::OutBack,
    ];

    #[test]
    fn endpoints_are_exact() {
        for easing in ALL {
            assert_eq!(easing.apply(0.0), 0.0, "{easing:?}");
            assert_eq!(easing.apply(1.0), 1.0, "{easing:?}");
            assert_eq!(easing.apply(-3.0), 0.0, "{easing:?}");
            assert_eq!(easing.apply(4.0), 1.0, "{easing:?}");
        }
    }

    #[test]
    fn monotonic_curves_never_decrease() {
        for easing in ALL.into_iter().filter(|e| e.is_monotonic()) {
            let mut previous = 0.0;
            for step in 0..=1000 {
                let value = easing.apply(step as f32 / 1000.0);
                assert!(value >= previous, "{easing:?} decreased at step {step}");
                previous = value;
            }
        }
    }

    #[test]
    fn back_curve_overshoots() {
        let peak = (0..=100)
            .map(|step| ease_out_back(step as f32 / 100.0))
            .fold(f32::MIN, f32::max);
        assert!(peak > 1.05);
    }

    #[test]
    fn in_out_cubic_is_symmetric() {
        assert!((ease_in_out_cubic(0.5) - 0.5).abs() < 1e-6);
        assert!((ease_in_out_cubic(0.25) + ease_in_out_cubic(0.75) - 1.0).abs() < 1e-6);
    }
}
