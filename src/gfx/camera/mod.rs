pub mod camera_controller;
pub mod camera_utils;
pub mod orbit_camera;
pub mod pose_solver;

// Re-export main types
pub use camera_controller::CameraController;
pub use camera_utils::{Camera, CameraManager};
pub use orbit_camera::{CameraPose, OrbitCamera, OrbitCameraBounds};
pub use pose_solver::{normalize_angle, shortest_angular_delta, PoseSolver};
