use cgmath::{InnerSpace, Vector2};

use super::orbit_camera::OrbitCamera;

/// Live orbit controls: dragging rotates around the target, scrolling zooms.
///
/// The controller can be switched off as a whole; the engine does that while
/// a scripted tour runs or a camera tween owns the pose.
pub struct CameraController {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    enabled: bool,
    is_pointer_pressed: bool,
    last_position: Option<Vector2<f32>>,
    press_origin: Vector2<f32>,
    /// Travel (pixels) a press must exceed before it starts rotating.
    drag_threshold: f32,
    is_dragging: bool,
}

impl CameraController {
    pub fn new(rotate_speed: f32, zoom_speed: f32) -> Self {
        Self {
            rotate_speed,
            zoom_speed,
            enabled: true,
            is_pointer_pressed: false,
            last_position: None,
            press_origin: Vector2::new(0.0, 0.0),
            drag_threshold: 0.0,
            is_dragging: false,
        }
    }

    /// Starts a press. Moves within `drag_threshold` pixels of `position`
    /// leave the camera alone so a wobbly tap stays a tap.
    pub fn process_press(&mut self, position: Vector2<f32>, drag_threshold: f32) {
        self.is_pointer_pressed = true;
        self.last_position = Some(position);
        self.press_origin = position;
        self.drag_threshold = drag_threshold.max(0.0);
        self.is_dragging = false;
    }

    /// Rotates the orbit by the pointer delta while dragging.
    ///
    /// Returns true if the camera moved.
    pub fn process_move(&mut self, position: Vector2<f32>, camera: &mut OrbitCamera) -> bool {
        let Some(last) = self.last_position else {
            return false;
        };
        if !self.enabled || !self.is_pointer_pressed {
            self.last_position = Some(position);
            return false;
        }
        if !self.is_dragging {
            if (position - self.press_origin).magnitude() <= self.drag_threshold {
                return false;
            }
            self.is_dragging = true;
        }
        self.last_position = Some(position);

        let delta = position - last;
        if delta.x == 0.0 && delta.y == 0.0 {
            return false;
        }
        // NORMAL DRAG = ROTATE (orbit around focus)
        camera.add_azimuth(-delta.x * self.rotate_speed);
        camera.add_polar(-delta.y * self.rotate_speed);
        true
    }

    pub fn process_release(&mut self) {
        self.is_pointer_pressed = false;
        self.is_dragging = false;
        self.last_position = None;
    }

    /// Zooms by a scroll amount (positive moves away).
    pub fn process_scroll(&mut self, amount: f32, camera: &mut OrbitCamera) -> bool {
        if !self.enabled || amount == 0.0 {
            return false;
        }
        camera.add_distance(amount * self.zoom_speed);
        true
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.process_release();
        }
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}
