use super::camera_utils::Camera;
use cgmath::*;

/// Scalar orbit description of a camera: two angles, a distance, a look-at
/// point and a vertical field of view.
///
/// Azimuth wraps around the up axis (measured from +Z toward +X), polar is
/// measured down from +Y and stays strictly inside `(0, pi)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub azimuth: f32,
    pub polar: f32,
    pub distance: f32,
    pub target: Vector3<f32>,
    pub fov: f32,
}

impl CameraPose {
    pub fn new(azimuth: f32, polar: f32, distance: f32, target: Vector3<f32>, fov: f32) -> Self {
        Self {
            azimuth,
            polar,
            distance,
            target,
            fov,
        }
    }

    /// True when every component is a finite number.
    pub fn is_finite(&self) -> bool {
        self.azimuth.is_finite()
            && self.polar.is_finite()
            && self.distance.is_finite()
            && self.fov.is_finite()
            && self.target.x.is_finite()
            && self.target.y.is_finite()
            && self.target.z.is_finite()
    }

    /// World-space eye position implied by the orbit values.
    pub fn eye(&self) -> Vector3<f32> {
        calculate_cartesian_eye_position(self.polar, self.azimuth, self.distance, self.target)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    pub distance: f32,
    pub polar: f32,
    pub azimuth: f32,
    pub eye: Vector3<f32>,
    pub target: Vector3<f32>,
    pub up: Vector3<f32>,
    pub bounds: OrbitCameraBounds,
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera for OrbitCamera {
    fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        let eye = Point3::from_vec(self.eye);
        let target = Point3::from_vec(self.target);
        let view = Matrix4::look_at_rh(eye, target, self.up);
        let proj = perspective(self.fovy, self.aspect, self.znear, self.zfar);
        proj * view
    }
}

impl OrbitCamera {
    pub fn new(pose: CameraPose, aspect: f32) -> Self {
        let mut camera = Self {
            distance: pose.distance,
            polar: pose.polar,
            azimuth: pose.azimuth,
            eye: Vector3::zero(), // Recomputed by `apply()` below.
            target: pose.target,
            up: Vector3::unit_y(),
            bounds: OrbitCameraBounds::default(),
            aspect,
            fovy: Rad(pose.fov),
            znear: 0.1,
            zfar: 1000.0,
        };
        camera.apply();
        camera
    }

    /// Snapshot of the current orbit values.
    pub fn pose(&self) -> CameraPose {
        CameraPose {
            azimuth: self.azimuth,
            polar: self.polar,
            distance: self.distance,
            target: self.target,
            fov: self.fovy.0,
        }
    }

    /// Overwrite every orbit value at once and reconcile the eye position.
    ///
    /// Animated poses are authoritative: only the polar clamp applies, zoom
    /// limits and the distance lock constrain free movement alone. Non-finite
    /// poses are rejected so the camera keeps its last good state.
    pub fn set_pose(&mut self, pose: CameraPose) {
        if !pose.is_finite() {
            log::warn!("Rejected non-finite camera pose {:?}", pose);
            return;
        }
        self.azimuth = pose.azimuth;
        self.polar = pose.polar.clamp(self.bounds.min_polar, self.bounds.max_polar);
        self.distance = pose.distance;
        self.target = pose.target;
        self.fovy = Rad(pose.fov);
        self.apply();
    }

    pub fn set_distance(&mut self, distance: f32) {
        self.distance = self.bounds.clamp_distance(distance);
        self.apply();
    }

    pub fn add_distance(&mut self, delta: f32) {
        let corrected_zoom = f32::log10(self.distance.max(1.0 + f32::EPSILON)) * delta;
        self.set_distance(self.distance + corrected_zoom);
    }

    pub fn set_polar(&mut self, polar: f32) {
        self.polar = polar.clamp(self.bounds.min_polar, self.bounds.max_polar);
        self.apply();
    }

    pub fn add_polar(&mut self, delta: f32) {
        self.set_polar(self.polar + delta);
    }

    pub fn set_azimuth(&mut self, azimuth: f32) {
        self.azimuth = azimuth;
        self.apply();
    }

    pub fn add_azimuth(&mut self, delta: f32) {
        self.set_azimuth(self.azimuth + delta);
    }

    pub fn set_fov(&mut self, fov: f32) {
        self.fovy = Rad(fov);
    }

    /// Keep free zoom pinned to `distance` until [`Self::unlock_distance`].
    pub fn lock_distance(&mut self, distance: f32) {
        self.bounds.locked_distance = Some(distance);
        self.set_distance(distance);
    }

    pub fn unlock_distance(&mut self) {
        self.bounds.locked_distance = None;
    }

    /// Reconciles the eye position after changing `distance`, `polar`, `azimuth` or `target`.
    pub fn apply(&mut self) {
        self.eye =
            calculate_cartesian_eye_position(self.polar, self.azimuth, self.distance, self.target);
    }

    pub fn resize_projection(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OrbitCameraBounds {
    pub min_distance: Option<f32>,
    pub max_distance: Option<f32>,
    pub min_polar: f32,
    pub max_polar: f32,
    /// Set while a guided camera move has pinned the zoom level.
    pub locked_distance: Option<f32>,
}

impl OrbitCameraBounds {
    /// Open polar interval `[eps, pi - eps]` with optional zoom limits.
    pub fn with_polar_epsilon(eps: f32) -> Self {
        Self {
            min_polar: eps,
            max_polar: std::f32::consts::PI - eps,
            ..Self::default()
        }
    }

    pub fn clamp_distance(&self, distance: f32) -> f32 {
        if let Some(locked) = self.locked_distance {
            return locked;
        }
        distance.clamp(
            self.min_distance.unwrap_or(f32::EPSILON),
            self.max_distance.unwrap_or(f32::MAX),
        )
    }
}

impl Default for OrbitCameraBounds {
    fn default() -> Self {
        Self {
            min_distance: None,
            max_distance: None,
            min_polar: 0.01,
            max_polar: std::f32::consts::PI - 0.01,
            locked_distance: None,
        }
    }
}

fn calculate_cartesian_eye_position(
    polar: f32,
    azimuth: f32,
    distance: f32,
    target: Vector3<f32>,
) -> Vector3<f32> {
    Vector3::new(
        distance * polar.sin() * azimuth.sin(),
        distance * polar.cos(),
        distance * polar.sin() * azimuth.cos(),
    ) + target
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn pose(azimuth: f32, polar: f32, distance: f32) -> CameraPose {
        CameraPose::new(azimuth, polar, distance, Vector3::zero(), 0.8)
    }

    #[test]
    fn eye_on_positive_z_for_zero_azimuth() {
        let camera = OrbitCamera::new(pose(0.0, FRAC_PI_2, 5.0), 1.0);
        assert!((camera.eye - Vector3::new(0.0, 0.0, 5.0)).magnitude() < 1e-5);
    }

    #[test]
    fn polar_is_clamped_inside_open_interval() {
        let mut camera = OrbitCamera::new(pose(0.0, 1.0, 5.0), 1.0);
        camera.bounds = OrbitCameraBounds::with_polar_epsilon(0.05);
        camera.set_polar(0.0);
        assert!((camera.polar - 0.05).abs() < 1e-6);
        camera.add_polar(10.0);
        assert!((camera.polar - (PI - 0.05)).abs() < 1e-6);
    }

    #[test]
    fn locked_distance_overrides_zoom() {
        let mut camera = OrbitCamera::new(pose(0.0, 1.0, 5.0), 1.0);
        camera.lock_distance(4.0);
        camera.add_distance(3.0);
        assert_eq!(camera.distance, 4.0);
        camera.unlock_distance();
        camera.set_distance(7.0);
        assert_eq!(camera.distance, 7.0);
    }

    #[test]
    fn rejects_non_finite_pose() {
        let mut camera = OrbitCamera::new(pose(0.3, 1.0, 5.0), 1.0);
        camera.set_pose(pose(f32::NAN, 1.0, 5.0));
        assert_eq!(camera.azimuth, 0.3);
    }
}
