use cgmath::{Matrix4, Vector2, Vector3, Vector4};

use super::{camera_controller::CameraController, orbit_camera::OrbitCamera};

pub struct CameraManager {
    pub camera: OrbitCamera,
    pub controller: CameraController,
}

impl CameraManager {
    pub fn new(camera: OrbitCamera, controller: CameraController) -> Self {
        Self { camera, controller }
    }

    pub fn process_press(&mut self, position: Vector2<f32>, drag_threshold: f32) {
        self.controller.process_press(position, drag_threshold);
    }

    pub fn process_move(&mut self, position: Vector2<f32>) -> bool {
        self.controller.process_move(position, &mut self.camera)
    }

    pub fn process_release(&mut self) {
        self.controller.process_release();
    }

    pub fn process_scroll(&mut self, amount: f32) -> bool {
        self.controller.process_scroll(amount, &mut self.camera)
    }

    /// Get the view projection matrix from the camera
    pub fn get_view_proj_matrix(&self) -> Matrix4<f32> {
        self.camera.build_view_projection_matrix()
    }

    /// Project a world point into pixel coordinates (origin top-left).
    ///
    /// Returns `None` for points behind the camera.
    pub fn project_to_screen(
        &self,
        world: Vector3<f32>,
        screen_size: (f32, f32),
    ) -> Option<Vector2<f32>> {
        project_to_screen(self.get_view_proj_matrix(), world, screen_size)
    }
}

pub trait Camera: Sized {
    fn build_view_projection_matrix(&self) -> Matrix4<f32>;
}

pub fn project_to_screen(
    view_proj: Matrix4<f32>,
    world: Vector3<f32>,
    screen_size: (f32, f32),
) -> Option<Vector2<f32>> {
    let clip = view_proj * Vector4::new(world.x, world.y, world.z, 1.0);
    if clip.w <= f32::EPSILON {
        return None;
    }
    let ndc_x = clip.x / clip.w;
    let ndc_y = clip.y / clip.w;
    let (width, height) = screen_size;
    Some(Vector2::new(
        (ndc_x + 1.0) * 0.5 * width,
        (1.0 - ndc_y) * 0.5 * height,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::orbit_camera::CameraPose;
    use cgmath::{InnerSpace, Zero};
    use std::f32::consts::FRAC_PI_2;

    fn manager() -> CameraManager {
        let camera = OrbitCamera::new(
            CameraPose::new(0.0, FRAC_PI_2, 5.0, Vector3::zero(), 0.8),
            2.0,
        );
        CameraManager::new(camera, CameraController::new(0.01, 0.1))
    }

    #[test]
    fn target_projects_to_screen_center() {
        let point = manager()
            .project_to_screen(Vector3::zero(), (800.0, 400.0))
            .unwrap();
        assert!((point - Vector2::new(400.0, 200.0)).magnitude() < 1e-2);
    }

    #[test]
    fn points_behind_camera_are_not_projected() {
        let behind = Vector3::new(0.0, 0.0, 20.0);
        assert!(manager().project_to_screen(behind, (800.0, 400.0)).is_none());
    }

    #[test]
    fn up_is_up_on_screen() {
        let point = manager()
            .project_to_screen(Vector3::new(0.0, 1.0, 0.0), (800.0, 400.0))
            .unwrap();
        assert!(point.y < 200.0);
    }
}
