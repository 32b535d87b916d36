//! # Gesture Classifier
//!
//! Turns raw press/move/release streams into at most one "tap on face X" per
//! physical press. Drags, synthetic zero-length presses, camera gestures,
//! duplicate dispatches and taps on occluded faces are all dropped here and
//! never reach the selection logic.

use std::time::Duration;

use cgmath::{InnerSpace, Vector2};

use crate::config::GestureConfig;
use crate::gfx::{
    camera::{orbit_camera::CameraPose, pose_solver::shortest_angular_delta},
    picking::HitCandidate,
    scene::{BlockId, FaceId, SceneGraph, Surface},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
    Pen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Press,
    Move,
    Release,
    /// The platform aborted the gesture (focus loss, touch cancel).
    Cancel,
}

/// One pointer sample with the surfaces under it, nearest first.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    /// Platform pointer id; `None` when the source does not provide one.
    pub pointer_id: Option<u64>,
    /// Screen position in pixels.
    pub position: Vector2<f32>,
    pub timestamp: Duration,
    pub kind: PointerKind,
    pub candidates: Vec<HitCandidate>,
}

impl PointerEvent {
    pub fn new(
        phase: PointerPhase,
        pointer_id: Option<u64>,
        position: Vector2<f32>,
        timestamp: Duration,
        kind: PointerKind,
    ) -> Self {
        Self {
            phase,
            pointer_id,
            position,
            timestamp,
            kind,
            candidates: Vec::new(),
        }
    }

    pub fn press(
        pointer_id: Option<u64>,
        position: Vector2<f32>,
        timestamp: Duration,
        kind: PointerKind,
    ) -> Self {
        Self::new(PointerPhase::Press, pointer_id, position, timestamp, kind)
    }

    pub fn moved(
        pointer_id: Option<u64>,
        position: Vector2<f32>,
        timestamp: Duration,
        kind: PointerKind,
    ) -> Self {
        Self::new(PointerPhase::Move, pointer_id, position, timestamp, kind)
    }

    pub fn release(
        pointer_id: Option<u64>,
        position: Vector2<f32>,
        timestamp: Duration,
        kind: PointerKind,
    ) -> Self {
        Self::new(PointerPhase::Release, pointer_id, position, timestamp, kind)
    }

    pub fn with_candidates(mut self, candidates: Vec<HitCandidate>) -> Self {
        self.candidates = candidates;
        self
    }
}

/// A disambiguated tap on a selectable face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tap {
    pub face: FaceId,
    pub block: BlockId,
    pub position: Vector2<f32>,
    pub timestamp: Duration,
    pub kind: PointerKind,
}

/// Why a release did not produce a tap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    NoPress,
    PointerMismatch,
    MultiPointer,
    TooShort,
    Dragged,
    CameraMoved,
    NothingHit,
    Occluded,
    Duplicate,
}

/// Per-press record; lives from press to release.
#[derive(Debug, Clone, Copy)]
struct GestureState {
    pointer_id: Option<u64>,
    kind: PointerKind,
    press_position: Vector2<f32>,
    press_time: Duration,
    max_drag: f32,
    camera_at_press: Option<CameraPose>,
    multi_pointer: bool,
}

#[derive(Debug, Clone, Copy)]
struct TapRecord {
    face: FaceId,
    position: Vector2<f32>,
    timestamp: Duration,
}

fn same_pointer(a: Option<u64>, b: Option<u64>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a == b,
        _ => true,
    }
}

pub struct GestureClassifier {
    config: GestureConfig,
    active: Option<GestureState>,
    last_tap: Option<TapRecord>,
    last_rejection: Option<Rejection>,
}

impl GestureClassifier {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            active: None,
            last_tap: None,
            last_rejection: None,
        }
    }

    /// Feed one event. `camera` is the orbit pose to compare between press and
    /// release; pass `None` while something other than the user moves the camera.
    pub fn handle<S: SceneGraph + ?Sized>(
        &mut self,
        event: &PointerEvent,
        camera: Option<CameraPose>,
        scene: &S,
    ) -> Option<Tap> {
        match event.phase {
            PointerPhase::Press => {
                self.press(event, camera);
                None
            }
            PointerPhase::Move => {
                self.moved(event);
                None
            }
            PointerPhase::Release => match self.release(event, camera, scene) {
                Ok(tap) => Some(tap),
                Err(rejection) => {
                    log::debug!("Pointer release dropped: {:?}", rejection);
                    self.last_rejection = Some(rejection);
                    None
                }
            },
            PointerPhase::Cancel => {
                self.cancel();
                None
            }
        }
    }

    fn press(&mut self, event: &PointerEvent, camera: Option<CameraPose>) {
        if let Some(active) = self.active.as_mut() {
            if !same_pointer(active.pointer_id, event.pointer_id) {
                // Second finger down: this is a pinch or rotate, never a tap.
                active.multi_pointer = true;
                return;
            }
        }
        self.active = Some(GestureState {
            pointer_id: event.pointer_id,
            kind: event.kind,
            press_position: event.position,
            press_time: event.timestamp,
            max_drag: 0.0,
            camera_at_press: camera,
            multi_pointer: false,
        });
    }

    fn moved(&mut self, event: &PointerEvent) {
        if let Some(active) = self.active.as_mut() {
            if same_pointer(active.pointer_id, event.pointer_id) {
                let drag = (event.position - active.press_position).magnitude();
                active.max_drag = active.max_drag.max(drag);
            }
        }
    }

    fn release<S: SceneGraph + ?Sized>(
        &mut self,
        event: &PointerEvent,
        camera: Option<CameraPose>,
        scene: &S,
    ) -> Result<Tap, Rejection> {
        let Some(mut active) = self.active else {
            return Err(Rejection::NoPress);
        };
        if !same_pointer(active.pointer_id, event.pointer_id) {
            if active.multi_pointer {
                // The secondary pointer lifted; keep waiting for the primary.
                return Err(Rejection::MultiPointer);
            }
            return Err(Rejection::PointerMismatch);
        }
        self.active = None;

        if active.multi_pointer {
            return Err(Rejection::MultiPointer);
        }

        let held = event.timestamp.saturating_sub(active.press_time);
        if held < self.config.min_press_duration {
            return Err(Rejection::TooShort);
        }

        let drag = (event.position - active.press_position).magnitude();
        active.max_drag = active.max_drag.max(drag);
        if active.max_drag > self.config.drag_threshold(active.kind) {
            return Err(Rejection::Dragged);
        }

        if let (Some(before), Some(after)) = (active.camera_at_press, camera) {
            if self.camera_moved(&before, &after) {
                return Err(Rejection::CameraMoved);
            }
        }

        let face = Self::resolve_target(&event.candidates, scene)?;
        let block = scene.block_of(face).ok_or(Rejection::Occluded)?;

        if let Some(last) = self.last_tap {
            let since = event.timestamp.saturating_sub(last.timestamp);
            let recent = since < self.config.duplicate_window;
            let travel = (event.position - last.position).magnitude();
            let close = travel <= self.config.duplicate_radius_px;
            if last.face == face && recent && close {
                return Err(Rejection::Duplicate);
            }
        }

        self.last_tap = Some(TapRecord {
            face,
            position: event.position,
            timestamp: event.timestamp,
        });
        Ok(Tap {
            face,
            block,
            position: event.position,
            timestamp: event.timestamp,
            kind: event.kind,
        })
    }

    /// The nearest hit must itself be a selectable face; anything in front of
    /// a face hides it.
    fn resolve_target<S: SceneGraph + ?Sized>(
        candidates: &[HitCandidate],
        scene: &S,
    ) -> Result<FaceId, Rejection> {
        let nearest = candidates
            .iter()
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
            .ok_or(Rejection::NothingHit)?;
        match nearest.surface {
            Surface::Face(face) if scene.block_of(face).is_some() => Ok(face),
            _ => Err(Rejection::Occluded),
        }
    }

    fn camera_moved(&self, before: &CameraPose, after: &CameraPose) -> bool {
        let eps = self.config.camera_angle_epsilon;
        shortest_angular_delta(before.azimuth, after.azimuth).abs() > eps
            || (before.polar - after.polar).abs() > eps
            || (before.distance - after.distance).abs() > self.config.camera_distance_epsilon
    }

    /// Drop any press in progress.
    pub fn cancel(&mut self) {
        self.active = None;
    }

    /// Forget everything, including duplicate-suppression history.
    pub fn reset(&mut self) {
        self.active = None;
        self.last_tap = None;
        self.last_rejection = None;
    }

    pub fn is_pressed(&self) -> bool {
        self.active.is_some()
    }

    pub fn last_rejection(&self) -> Option<Rejection> {
        self.last_rejection
    }
}
