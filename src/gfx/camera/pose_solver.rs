//! # Camera Pose Solver
//!
//! Computes the orbit pose that looks at a point from the side where a face
//! actually sits in world space. Nothing here knows face names; the pose is a
//! pure function of the current geometry.

use std::f32::consts::{PI, TAU};

use cgmath::{InnerSpace, Vector3};

use super::orbit_camera::CameraPose;

/// Squared length below which a direction vector counts as degenerate.
const DEGENERATE_LENGTH2: f32 = 1e-12;

/// Wrap an angle into `[0, 2pi)`.
pub fn normalize_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Signed rotation from `from` to `to` along the shorter arc, in `[-pi, pi]`.
///
/// Angles exactly `pi` apart resolve to `+pi` or `-pi` depending on rounding,
/// but always deterministically for the same inputs.
pub fn shortest_angular_delta(from: f32, to: f32) -> f32 {
    let mut delta = normalize_angle(to) - normalize_angle(from);
    if delta > PI {
        delta -= TAU;
    } else if delta < -PI {
        delta += TAU;
    }
    delta.clamp(-PI, PI)
}

/// Geometry-driven orbit pose solver.
#[derive(Debug, Clone, Copy)]
pub struct PoseSolver {
    pub yaw_trim: f32,
    pub polar_trim: f32,
    pub polar_epsilon: f32,
    /// Returned when the geometry gives no usable direction.
    pub fallback: CameraPose,
}

impl PoseSolver {
    pub fn new(fallback: CameraPose, polar_epsilon: f32) -> Self {
        Self {
            yaw_trim: 0.0,
            polar_trim: 0.0,
            polar_epsilon,
            fallback,
        }
    }

    pub fn with_trims(mut self, yaw_trim: f32, polar_trim: f32) -> Self {
        self.yaw_trim = yaw_trim;
        self.polar_trim = polar_trim;
        self
    }

    /// Orbit pose looking at `look_at` from the direction of `world_position`.
    ///
    /// The returned pose carries the fallback's field of view; callers set the
    /// zoom fov they want.
    pub fn pose_for_target(
        &self,
        look_at: Vector3<f32>,
        world_position: Vector3<f32>,
        desired_distance: f32,
    ) -> CameraPose {
        let offset = world_position - look_at;
        let length2 = offset.magnitude2();
        if !length2.is_finite() || length2 < DEGENERATE_LENGTH2 || !desired_distance.is_finite() {
            log::warn!(
                "Degenerate focus direction from {:?} to {:?}, using fallback pose",
                look_at,
                world_position
            );
            return self.fallback;
        }

        let direction = offset / length2.sqrt();
        let azimuth = direction.x.atan2(direction.z) + self.yaw_trim;
        let polar = direction.y.clamp(-1.0, 1.0).acos() + self.polar_trim;

        CameraPose {
            azimuth: normalize_angle(azimuth),
            polar: polar.clamp(self.polar_epsilon, PI - self.polar_epsilon),
            distance: desired_distance,
            target: look_at,
            fov: self.fallback.fov,
        }
    }
}
