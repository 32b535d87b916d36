//! # Tween Registry
//!
//! In-flight interpolations keyed by the identity of what they animate.
//!
//! Inserting a tween for an identity that is already animating replaces the
//! old tween, and the new one starts from the old one's value *at the moment
//! of replacement*. Rapid re-selection therefore never makes anything pop.
//! Camera and intro tweens are singleton slots with the same rule.

use std::collections::BTreeMap;
use std::time::Duration;

use super::tween::{CameraTween, IntroTween, Tween, TweenSpec};
use crate::gfx::{
    camera::orbit_camera::CameraPose,
    scene::{BlockId, FaceId, RootTransform},
};

#[derive(Debug, Default)]
pub struct TweenRegistry {
    pub(crate) opacity: BTreeMap<FaceId, Tween<f32>>,
    pub(crate) scale: BTreeMap<BlockId, Tween<f32>>,
    pub(crate) intro: Option<IntroTween>,
    pub(crate) camera: Option<CameraTween>,
}

/// Replace or insert, starting from the in-flight value when there is one.
fn upsert<K: Ord>(
    map: &mut BTreeMap<K, Tween<f32>>,
    key: K,
    current: f32,
    spec: TweenSpec<f32>,
    now: Duration,
) -> Tween<f32> {
    let start = map.get(&key).map_or(current, |old| old.sample(now));
    let tween = Tween::new(start, spec, now);
    map.insert(key, tween);
    tween
}

impl TweenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Animate a face's opacity; `current` is used only if no tween is in flight.
    pub fn set_opacity(
        &mut self,
        face: FaceId,
        current: f32,
        spec: TweenSpec<f32>,
        now: Duration,
    ) -> Tween<f32> {
        upsert(&mut self.opacity, face, current, spec, now)
    }

    /// Animate a block's uniform scale; `current` is used only if no tween is in flight.
    pub fn set_scale(
        &mut self,
        block: BlockId,
        current: f32,
        spec: TweenSpec<f32>,
        now: Duration,
    ) -> Tween<f32> {
        upsert(&mut self.scale, block, current, spec, now)
    }

    /// Start a camera move toward `to`, overwriting any camera move in flight.
    pub fn set_camera(
        &mut self,
        current: CameraPose,
        to: CameraPose,
        now: Duration,
        duration: Duration,
        distance_lead: f32,
        lock_distance: bool,
    ) -> CameraTween {
        let from = self.camera.map_or(current, |old| old.sample(now));
        let tween = CameraTween::new(from, to, now, duration, distance_lead)
            .with_lock_distance(lock_distance);
        self.camera = Some(tween);
        tween
    }

    /// Start the intro slide, overwriting one in flight.
    pub fn set_intro(
        &mut self,
        current: RootTransform,
        to: RootTransform,
        now: Duration,
        duration: Duration,
    ) -> IntroTween {
        let from = self.intro.map_or(current, |old| old.sample(now));
        let tween = IntroTween::new(from, to, now, duration);
        self.intro = Some(tween);
        tween
    }

    pub fn opacity(&self, face: FaceId) -> Option<&Tween<f32>> {
        self.opacity.get(&face)
    }

    pub fn scale(&self, block: BlockId) -> Option<&Tween<f32>> {
        self.scale.get(&block)
    }

    pub fn camera(&self) -> Option<&CameraTween> {
        self.camera.as_ref()
    }

    pub fn intro(&self) -> Option<&IntroTween> {
        self.intro.as_ref()
    }

    /// Number of tweens currently in flight across all channels.
    pub fn active_count(&self) -> usize {
        self.opacity.len()
            + self.scale.len()
            + usize::from(self.intro.is_some())
            + usize::from(self.camera.is_some())
    }

    pub fn is_idle(&self) -> bool {
        self.active_count() == 0
    }
}
