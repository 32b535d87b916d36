//! # Engine Configuration
//!
//! Tuned constants for gestures, selection effects, tween timing and the
//! camera. Every value is a public field with a default so applications can
//! override individual knobs:
//!
//! ```rust
//! use facet_focus::config::EngineConfig;
//! use std::time::Duration;
//!
//! let mut config = EngineConfig::default();
//! config.selection.debounce_window = Duration::from_millis(350);
//! config.gesture.touch_drag_threshold_px = 20.0;
//! assert!(config.validate().is_ok());
//! ```

use std::f32::consts::PI;
use std::time::Duration;

use cgmath::{Vector3, Zero};

use crate::error::ConfigError;
use crate::gfx::camera::orbit_camera::CameraPose;
use crate::interaction::gesture::PointerKind;

/// Thresholds used by the gesture classifier to tell taps from drags.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureConfig {
    /// Presses shorter than this are treated as synthetic and dropped.
    pub min_press_duration: Duration,
    /// Maximum pointer travel (pixels) for a mouse or pen tap.
    pub mouse_drag_threshold_px: f32,
    /// Maximum pointer travel (pixels) for a touch tap.
    pub touch_drag_threshold_px: f32,
    /// Orbit angle change (radians) between press and release that marks a camera drag.
    pub camera_angle_epsilon: f32,
    /// Orbit distance change between press and release that marks a camera drag.
    pub camera_distance_epsilon: f32,
    /// Taps on the same surface within this window of the previous tap are duplicates.
    pub duplicate_window: Duration,
    /// Screen radius (pixels) used together with `duplicate_window`.
    pub duplicate_radius_px: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            min_press_duration: Duration::from_millis(10),
            mouse_drag_threshold_px: 6.0,
            touch_drag_threshold_px: 14.0,
            camera_angle_epsilon: 0.01,
            camera_distance_epsilon: 0.02,
            duplicate_window: Duration::from_millis(300),
            duplicate_radius_px: 12.0,
        }
    }
}

impl GestureConfig {
    /// Pointer travel above which a press is a drag rather than a tap.
    pub fn drag_threshold(&self, kind: PointerKind) -> f32 {
        match kind {
            PointerKind::Touch => self.touch_drag_threshold_px,
            PointerKind::Mouse | PointerKind::Pen => self.mouse_drag_threshold_px,
        }
    }
}

/// Visual targets and policies applied by selection transitions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionConfig {
    /// Repeating the current selection faster than this is a duplicate event.
    pub debounce_window: Duration,
    pub expanded_scale: f32,
    pub expanded_bounce: f32,
    pub dimmed_scale: f32,
    pub dimmed_bounce: f32,
    pub dimmed_opacity: f32,
    /// Orbit distance used when focusing a face without an override.
    pub focus_distance: f32,
    /// Field of view (radians) while a face is focused.
    pub focus_fov: f32,
    /// Always orbit around `scene_center` instead of the current target.
    pub lock_target_to_center: bool,
    pub scene_center: Vector3<f32>,
    /// Reset automatically after this much inactivity with a selection active.
    pub idle_reset_after: Option<Duration>,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            debounce_window: Duration::from_millis(500),
            expanded_scale: 1.06,
            expanded_bounce: 1.12,
            dimmed_scale: 0.94,
            dimmed_bounce: 0.92,
            dimmed_opacity: 0.25,
            focus_distance: 6.0,
            focus_fov: 35.0_f32.to_radians(),
            lock_target_to_center: true,
            scene_center: Vector3::zero(),
            idle_reset_after: None,
        }
    }
}

/// Durations and curve shaping for the tween engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenConfig {
    pub camera_duration: Duration,
    pub scale_duration: Duration,
    pub opacity_duration: Duration,
    pub intro_duration: Duration,
    /// Distance and fov sample the curve at `min(1, t * distance_lead)`.
    pub distance_lead: f32,
    /// Fraction of a bounce tween spent travelling to the bounce value.
    pub bounce_split: f32,
}

impl Default for TweenConfig {
    fn default() -> Self {
        Self {
            camera_duration: Duration::from_millis(1200),
            scale_duration: Duration::from_millis(700),
            opacity_duration: Duration::from_millis(450),
            intro_duration: Duration::from_millis(1600),
            distance_lead: 1.25,
            bounce_split: 0.55,
        }
    }
}

/// Default orbit and camera control settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraConfig {
    pub default_azimuth: f32,
    pub default_polar: f32,
    pub default_distance: f32,
    pub default_target: Vector3<f32>,
    /// Field of view (radians) of the default view.
    pub base_fov: f32,
    /// Polar angle is kept inside `[polar_epsilon, pi - polar_epsilon]`.
    pub polar_epsilon: f32,
    /// Operator trims added to solved poses.
    pub yaw_trim: f32,
    pub polar_trim: f32,
    /// Clamp free zoom to the final distance whenever a camera tween completes.
    pub lock_distance_on_complete: bool,
    pub min_distance: Option<f32>,
    pub max_distance: Option<f32>,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            default_azimuth: PI / 4.0,
            default_polar: PI / 3.0,
            default_distance: 10.0,
            default_target: Vector3::zero(),
            base_fov: 45.0_f32.to_radians(),
            polar_epsilon: 0.05,
            yaw_trim: 0.0,
            polar_trim: 0.0,
            lock_distance_on_complete: false,
            min_distance: Some(2.0),
            max_distance: Some(24.0),
            rotate_speed: 0.005,
            zoom_speed: 0.1,
        }
    }
}

impl CameraConfig {
    /// The pose reset returns to.
    pub fn default_pose(&self) -> CameraPose {
        CameraPose::new(
            self.default_azimuth,
            self.default_polar,
            self.default_distance,
            self.default_target,
            self.base_fov,
        )
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EngineConfig {
    pub gesture: GestureConfig,
    pub selection: SelectionConfig,
    pub tween: TweenConfig,
    pub camera: CameraConfig,
}

impl EngineConfig {
    /// Check the invariants the engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let durations = [
            ("tween.camera_duration", self.tween.camera_duration),
            ("tween.scale_duration", self.tween.scale_duration),
            ("tween.opacity_duration", self.tween.opacity_duration),
            ("tween.intro_duration", self.tween.intro_duration),
        ];
        for (name, duration) in durations {
            if duration.is_zero() {
                return Err(ConfigError::NonPositiveDuration(name));
            }
        }

        let positive = [
            ("selection.focus_distance", self.selection.focus_distance),
            ("selection.focus_fov", self.selection.focus_fov),
            ("camera.base_fov", self.camera.base_fov),
            ("camera.default_distance", self.camera.default_distance),
            ("gesture.mouse_drag_threshold_px", self.gesture.mouse_drag_threshold_px),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { name, value });
            }
        }

        if self.gesture.touch_drag_threshold_px < self.gesture.mouse_drag_threshold_px {
            return Err(ConfigError::InvertedDragThresholds {
                mouse: self.gesture.mouse_drag_threshold_px,
                touch: self.gesture.touch_drag_threshold_px,
            });
        }

        let eps = self.camera.polar_epsilon;
        if !(eps > 0.0 && eps < PI / 2.0) {
            return Err(ConfigError::PolarEpsilon(eps));
        }

        let split = self.tween.bounce_split;
        if !(split > 0.0 && split < 1.0) {
            return Err(ConfigError::BounceSplit(split));
        }

        if !(self.tween.distance_lead >= 1.0) {
            return Err(ConfigError::DistanceLead(self.tween.distance_lead));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(EngineConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_touch_threshold_below_mouse() {
        let mut config = EngineConfig::default();
        config.gesture.touch_drag_threshold_px = 2.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedDragThresholds { .. })
        ));
    }

    #[test]
    fn rejects_zero_duration() {
        let mut config = EngineConfig::default();
        config.tween.camera_duration = Duration::ZERO;
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonPositiveDuration("tween.camera_duration"))
        );
    }

    #[test]
    fn rejects_bad_polar_epsilon() {
        let mut config = EngineConfig::default();
        config.camera.polar_epsilon = 0.0;
        assert_eq!(config.validate(), Err(ConfigError::PolarEpsilon(0.0)));
    }
}
