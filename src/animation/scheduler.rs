//! # Frame Scheduler
//!
//! Advances every active tween once per rendered frame and retires finished
//! ones. Channels are always processed in the same order (opacity, scale,
//! intro, camera) and keyed channels in ascending id order, so a frame is a
//! deterministic function of the registry and `now`.

use std::time::Duration;

use super::registry::TweenRegistry;
use crate::gfx::{
    camera::orbit_camera::{CameraPose, OrbitCamera},
    scene::SceneGraph,
};

/// Final state of a camera tween that finished this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraCompletion {
    pub pose: CameraPose,
    pub lock_distance: bool,
}

/// What happened during one scheduler tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameReport {
    pub frame: u64,
    /// Time since the previous tick (zero on the first one).
    pub delta: Duration,
    pub retired_opacity: usize,
    pub retired_scale: usize,
    pub intro_finished: bool,
    pub camera_finished: Option<CameraCompletion>,
}

#[derive(Debug, Default)]
pub struct FrameScheduler {
    frame: u64,
    last_tick: Option<Duration>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of ticks processed so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Write every tween's value for `now` and drop the completed ones.
    pub fn advance<S: SceneGraph + ?Sized>(
        &mut self,
        now: Duration,
        registry: &mut TweenRegistry,
        scene: &mut S,
        camera: &mut OrbitCamera,
    ) -> FrameReport {
        let delta = self
            .last_tick
            .map_or(Duration::ZERO, |last| now.saturating_sub(last));
        self.last_tick = Some(now);
        self.frame += 1;

        let mut report = FrameReport {
            frame: self.frame,
            delta,
            ..FrameReport::default()
        };

        registry.opacity.retain(|face, tween| {
            scene.set_face_opacity(*face, tween.sample(now));
            let keep = !tween.is_complete(now);
            if !keep {
                report.retired_opacity += 1;
            }
            keep
        });

        registry.scale.retain(|block, tween| {
            scene.set_block_scale(*block, tween.sample(now));
            let keep = !tween.is_complete(now);
            if !keep {
                report.retired_scale += 1;
            }
            keep
        });

        if let Some(intro) = registry.intro {
            scene.set_root_transform(intro.sample(now));
            if intro.is_complete(now) {
                registry.intro = None;
                report.intro_finished = true;
            }
        }

        if let Some(tween) = registry.camera {
            camera.set_pose(tween.sample(now));
            if tween.is_complete(now) {
                registry.camera = None;
                report.camera_finished = Some(CameraCompletion {
                    pose: tween.to,
                    lock_distance: tween.lock_distance,
                });
            }
        }

        if report.retired_opacity + report.retired_scale > 0 || report.camera_finished.is_some() {
            log::debug!(
                "Frame {}: retired {} opacity, {} scale tweens, camera finished: {}",
                report.frame,
                report.retired_opacity,
                report.retired_scale,
                report.camera_finished.is_some()
            );
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{easing::Easing, tween::TweenSpec};
    use crate::gfx::scene::{BlockId, FaceId, RootTransform, Scene};
    use cgmath::{Vector3, Zero};

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn camera() -> OrbitCamera {
        OrbitCamera::new(CameraPose::new(0.0, 1.0, 10.0, Vector3::zero(), 0.8), 1.0)
    }

    #[test]
    fn writes_values_and_retires_finished_tweens() {
        let mut scene = Scene::block_grid(2, 1, 2.0).unwrap();
        let mut camera = camera();
        let mut registry = TweenRegistry::new();
        let mut scheduler = FrameScheduler::new();

        let fade = TweenSpec::new(0.25, ms(400), Easing::InOutCubic);
        let grow = TweenSpec::new(1.06, ms(700), Easing::InOutCubic);
        registry.set_opacity(FaceId(0), 1.0, fade, ms(0));
        registry.set_scale(BlockId(1), 1.0, grow, ms(0));

        let first = scheduler.advance(ms(200), &mut registry, &mut scene, &mut camera);
        assert_eq!(first.delta, Duration::ZERO);
        assert!(scene.faces[0].opacity < 1.0 && scene.faces[0].opacity > 0.25);
        assert_eq!(registry.active_count(), 2);

        let second = scheduler.advance(ms(400), &mut registry, &mut scene, &mut camera);
        assert_eq!(second.delta, ms(200));
        assert_eq!(second.retired_opacity, 1);
        assert_eq!(scene.faces[0].opacity, 0.25);
        assert_eq!(registry.active_count(), 1);

        let third = scheduler.advance(ms(700), &mut registry, &mut scene, &mut camera);
        assert_eq!(third.retired_scale, 1);
        assert_eq!(scene.blocks[1].scale, 1.06);
        assert!(registry.is_idle());
        assert_eq!(scheduler.frame(), 3);
    }

    #[test]
    fn camera_completion_is_reported_once() {
        let mut scene = Scene::block_grid(1, 1, 2.0).unwrap();
        let mut camera = camera();
        let mut registry = TweenRegistry::new();
        let mut scheduler = FrameScheduler::new();
        let target = CameraPose::new(1.0, 1.2, 6.0, Vector3::zero(), 0.6);

        registry.set_camera(camera.pose(), target, ms(0), ms(1000), 1.25, true);
        let halfway = scheduler.advance(ms(500), &mut registry, &mut scene, &mut camera);
        assert!(halfway.camera_finished.is_none());

        let done = scheduler.advance(ms(1000), &mut registry, &mut scene, &mut camera);
        let completion = done.camera_finished.unwrap();
        assert_eq!(completion.pose, target);
        assert!(completion.lock_distance);
        assert_eq!(camera.pose(), target);

        let after = scheduler.advance(ms(1016), &mut registry, &mut scene, &mut camera);
        assert!(after.camera_finished.is_none());
    }

    #[test]
    fn intro_moves_root_transform() {
        let mut scene = Scene::block_grid(1, 1, 2.0).unwrap();
        let mut camera = camera();
        let mut registry = TweenRegistry::new();
        let mut scheduler = FrameScheduler::new();
        let start = RootTransform {
            offset: Vector3::new(0.0, -3.0, 0.0),
            spin: 0.0,
        };
        registry.set_intro(start, RootTransform::default(), ms(0), ms(1600));

        scheduler.advance(ms(100), &mut registry, &mut scene, &mut camera);
        assert!(scene.root.offset.y < 0.0);
        let done = scheduler.advance(ms(1600), &mut registry, &mut scene, &mut camera);
        assert!(done.intro_finished);
        assert_eq!(scene.root, RootTransform::default());
    }
}
