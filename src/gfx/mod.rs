//! # Graphics Module
//!
//! Scene-side collaborators of the focus engine.
//!
//! - **Camera System** ([`camera`]) - Orbit camera, live controls and the pose solver
//! - **Scene Management** ([`scene`]) - Blocks, faces and the
//!   [`SceneGraph`](scene::SceneGraph) trait
//! - **Picking** ([`picking`]) - Screen-space ray casts producing hit candidates for taps

pub mod camera;
pub mod picking;
pub mod scene;

// Re-export commonly used types
pub use camera::orbit_camera::OrbitCamera;
pub use picking::ObjectPicker;
