//! # Selection State Machine
//!
//! Decides what a tapped surface means given the current selection, and turns
//! that decision into tween requests.
//!
//! ## Transition rules
//!
//! Evaluated in order, first match wins:
//!
//! 1. Structural or unknown surfaces are ignored.
//! 2. The home block resets when something is selected and home reset is
//!    allowed; otherwise it is ignored. Home is never focused.
//! 3. Tapping the selected face again within the debounce window is a
//!    duplicate event; after the window it resets.
//! 4. Another face of the selected block switches faces.
//! 5. Anything else switches blocks.

use std::time::Duration;

use crate::animation::{easing::Easing, registry::TweenRegistry, tween::TweenSpec};
use crate::config::EngineConfig;
use crate::gfx::{
    camera::{
        orbit_camera::{CameraPose, OrbitCamera},
        pose_solver::PoseSolver,
    },
    scene::{BlockId, FaceId, SceneGraph, Surface},
};

/// The committed selection. Block and face are either both set or both empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionState {
    selected: Option<(BlockId, FaceId)>,
    last_selected_at: Option<Duration>,
}

impl SelectionState {
    pub fn block(&self) -> Option<BlockId> {
        self.selected.map(|(block, _)| block)
    }

    pub fn face(&self) -> Option<FaceId> {
        self.selected.map(|(_, face)| face)
    }

    pub fn selected(&self) -> Option<(BlockId, FaceId)> {
        self.selected
    }

    pub fn is_active(&self) -> bool {
        self.selected.is_some()
    }

    pub fn last_selected_at(&self) -> Option<Duration> {
        self.last_selected_at
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectOptions {
    /// Whether a home block tap may reset an active selection.
    pub allow_home_reset: bool,
    /// Orbit distance for this selection instead of the configured one.
    pub distance_override: Option<f32>,
}

impl Default for SelectOptions {
    fn default() -> Self {
        Self {
            allow_home_reset: true,
            distance_override: None,
        }
    }
}

impl SelectOptions {
    pub fn with_distance(distance: f32) -> Self {
        Self {
            distance_override: Some(distance),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    Structural,
    UnknownSurface,
    HomeWithoutSelection,
    HomeResetDisabled,
    Debounced,
}

/// Outcome of one selection request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Ignored(IgnoreReason),
    Reset,
    FaceSwitch {
        block: BlockId,
        from: FaceId,
        to: FaceId,
    },
    BlockSwitch {
        block: BlockId,
        face: FaceId,
        previous: Option<(BlockId, FaceId)>,
    },
}

impl Transition {
    pub fn is_ignored(&self) -> bool {
        matches!(self, Transition::Ignored(_))
    }
}

/// Everything a transition's side effects touch.
pub struct EffectContext<'a, S: SceneGraph + ?Sized> {
    pub scene: &'a mut S,
    pub registry: &'a mut TweenRegistry,
    pub camera: &'a mut OrbitCamera,
    pub solver: &'a PoseSolver,
    pub config: &'a EngineConfig,
    /// Pin the orbit distance once the camera move completes.
    pub lock_distance: bool,
    pub now: Duration,
}

#[derive(Debug)]
pub struct SelectionMachine {
    state: SelectionState,
    camera_settled: bool,
}

impl Default for SelectionMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionMachine {
    pub fn new() -> Self {
        Self {
            state: SelectionState::default(),
            camera_settled: true,
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// False between a camera-moving transition and its completion.
    pub fn is_camera_settled(&self) -> bool {
        self.camera_settled
    }

    pub fn on_camera_settled(&mut self) {
        self.camera_settled = true;
    }

    /// Classify a tapped surface without changing anything.
    pub fn decide<S: SceneGraph + ?Sized>(
        &self,
        surface: Surface,
        scene: &S,
        options: &SelectOptions,
        debounce_window: Duration,
        now: Duration,
    ) -> Transition {
        let face = match surface {
            Surface::Face(face) => face,
            Surface::Structural(_) => return Transition::Ignored(IgnoreReason::Structural),
            Surface::Other => return Transition::Ignored(IgnoreReason::UnknownSurface),
        };
        let Some(block) = scene.block_of(face) else {
            return Transition::Ignored(IgnoreReason::UnknownSurface);
        };

        if scene.is_home(block) {
            return match (self.state.is_active(), options.allow_home_reset) {
                (true, true) => Transition::Reset,
                (true, false) => Transition::Ignored(IgnoreReason::HomeResetDisabled),
                (false, _) => Transition::Ignored(IgnoreReason::HomeWithoutSelection),
            };
        }

        match self.state.selected {
            Some((_, current)) if current == face => {
                let elapsed = self
                    .state
                    .last_selected_at
                    .map_or(Duration::MAX, |at| now.saturating_sub(at));
                if elapsed < debounce_window {
                    Transition::Ignored(IgnoreReason::Debounced)
                } else {
                    Transition::Reset
                }
            }
            Some((current_block, current)) if current_block == block => Transition::FaceSwitch {
                block,
                from: current,
                to: face,
            },
            previous => Transition::BlockSwitch {
                block,
                face,
                previous,
            },
        }
    }

    /// Decide, then apply effects and commit the new state.
    pub fn select<S: SceneGraph + ?Sized>(
        &mut self,
        surface: Surface,
        options: &SelectOptions,
        ctx: &mut EffectContext<'_, S>,
    ) -> Transition {
        let transition = self.decide(
            surface,
            &*ctx.scene,
            options,
            ctx.config.selection.debounce_window,
            ctx.now,
        );
        match transition {
            Transition::Ignored(reason) => {
                log::debug!("Selection of {:?} ignored: {:?}", surface, reason);
            }
            Transition::Reset => self.apply_reset(ctx),
            Transition::FaceSwitch { block, from, to } => {
                log::info!("Face switch on {:?}: {:?} -> {:?}", block, from, to);
                self.focus_camera(to, options, ctx);
                Self::dim_face(from, ctx);
                Self::highlight_face(to, ctx);
                self.commit(Some((block, to)), ctx.now);
            }
            Transition::BlockSwitch { block, face, .. } => {
                log::info!("Block switch to {:?}, face {:?}", block, face);
                self.focus_camera(face, options, ctx);
                Self::spotlight_block(block, face, ctx);
                self.commit(Some((block, face)), ctx.now);
            }
        }
        transition
    }

    /// Return to the default view unconditionally.
    pub fn reset<S: SceneGraph + ?Sized>(&mut self, ctx: &mut EffectContext<'_, S>) -> Transition {
        self.apply_reset(ctx);
        Transition::Reset
    }

    fn commit(&mut self, selected: Option<(BlockId, FaceId)>, now: Duration) {
        self.state.selected = selected;
        if selected.is_some() {
            self.state.last_selected_at = Some(now);
        }
    }

    fn apply_reset<S: SceneGraph + ?Sized>(&mut self, ctx: &mut EffectContext<'_, S>) {
        log::info!("Resetting to default view");
        let config = ctx.config;
        let home = config.camera.default_pose();

        ctx.camera.unlock_distance();
        ctx.registry.set_camera(
            ctx.camera.pose(),
            home,
            ctx.now,
            config.tween.camera_duration,
            config.tween.distance_lead,
            false,
        );
        self.camera_settled = false;

        for block in ctx.scene.block_ids() {
            let current = ctx.scene.block_scale(block).unwrap_or(1.0);
            let spec = TweenSpec::new(1.0, config.tween.scale_duration, Easing::InOutCubic);
            ctx.registry.set_scale(block, current, spec, ctx.now);
        }
        for face in ctx.scene.face_ids() {
            Self::fade_face(face, 1.0, false, ctx);
        }
        self.commit(None, ctx.now);
    }

    fn focus_camera<S: SceneGraph + ?Sized>(
        &mut self,
        face: FaceId,
        options: &SelectOptions,
        ctx: &mut EffectContext<'_, S>,
    ) {
        let Some(world) = ctx.scene.face_world_position(face) else {
            log::warn!("No world position for {:?}, camera stays put", face);
            return;
        };
        let selection = &ctx.config.selection;
        let look_at = if selection.lock_target_to_center {
            selection.scene_center
        } else {
            ctx.camera.target
        };
        let distance = options.distance_override.unwrap_or(selection.focus_distance);
        let target = CameraPose {
            fov: selection.focus_fov,
            ..ctx.solver.pose_for_target(look_at, world, distance)
        };

        ctx.registry.set_camera(
            ctx.camera.pose(),
            target,
            ctx.now,
            ctx.config.tween.camera_duration,
            ctx.config.tween.distance_lead,
            ctx.lock_distance,
        );
        self.camera_settled = false;
    }

    fn spotlight_block<S: SceneGraph + ?Sized>(
        block: BlockId,
        face: FaceId,
        ctx: &mut EffectContext<'_, S>,
    ) {
        let selection = ctx.config.selection;
        let tween = ctx.config.tween;
        for other in ctx.scene.block_ids() {
            let (end, bounce) = if other == block {
                (selection.expanded_scale, selection.expanded_bounce)
            } else {
                (selection.dimmed_scale, selection.dimmed_bounce)
            };
            let current = ctx.scene.block_scale(other).unwrap_or(1.0);
            let spec = TweenSpec::new(end, tween.scale_duration, Easing::InOutCubic)
                .with_bounce(bounce, tween.bounce_split);
            ctx.registry.set_scale(other, current, spec, ctx.now);
        }

        for other in ctx.scene.face_ids() {
            if other == face {
                Self::highlight_face(other, ctx);
            } else {
                Self::dim_face(other, ctx);
            }
        }
    }

    fn highlight_face<S: SceneGraph + ?Sized>(face: FaceId, ctx: &mut EffectContext<'_, S>) {
        Self::fade_face(face, 1.0, true, ctx);
    }

    fn dim_face<S: SceneGraph + ?Sized>(face: FaceId, ctx: &mut EffectContext<'_, S>) {
        let dimmed = ctx.config.selection.dimmed_opacity;
        Self::fade_face(face, dimmed, false, ctx);
    }

    fn fade_face<S: SceneGraph + ?Sized>(
        face: FaceId,
        opacity: f32,
        emphasis: bool,
        ctx: &mut EffectContext<'_, S>,
    ) {
        let current = ctx.scene.face_opacity(face).unwrap_or(1.0);
        let spec = TweenSpec::new(opacity, ctx.config.tween.opacity_duration, Easing::InOutCubic);
        ctx.registry.set_opacity(face, current, spec, ctx.now);
        ctx.scene.set_face_emphasis(face, emphasis);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::pose_solver::{normalize_angle, shortest_angular_delta};
    use crate::gfx::scene::Scene;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    struct Fixture {
        scene: Scene,
        registry: TweenRegistry,
        camera: OrbitCamera,
        solver: PoseSolver,
        config: EngineConfig,
        machine: SelectionMachine,
    }

    impl Fixture {
        fn new() -> Self {
            let config = EngineConfig::default();
            let home = config.camera.default_pose();
            Self {
                scene: Scene::block_grid(3, 3, 2.0).unwrap(),
                registry: TweenRegistry::new(),
                camera: OrbitCamera::new(home, 1.5),
                solver: PoseSolver::new(home, config.camera.polar_epsilon),
                config,
                machine: SelectionMachine::new(),
            }
        }

        fn face(&self, block: &str, face: &str) -> FaceId {
            self.scene.face_by_name(block, face).unwrap()
        }

        fn select_with(&mut self, face: FaceId, options: SelectOptions, at: u64) -> Transition {
            let mut ctx = EffectContext {
                scene: &mut self.scene,
                registry: &mut self.registry,
                camera: &mut self.camera,
                solver: &self.solver,
                config: &self.config,
                lock_distance: false,
                now: ms(at),
            };
            self.machine.select(Surface::Face(face), &options, &mut ctx)
        }

        fn select(&mut self, face: FaceId, at: u64) -> Transition {
            self.select_with(face, SelectOptions::default(), at)
        }
    }

    #[test]
    fn first_selection_switches_block() {
        let mut f = Fixture::new();
        let top = f.face("block-0-0", "top");
        let block = f.scene.block_of(top).unwrap();

        let transition = f.select(top, 0);
        assert_eq!(
            transition,
            Transition::BlockSwitch {
                block,
                face: top,
                previous: None
            }
        );
        assert_eq!(f.machine.state().selected(), Some((block, top)));
        assert_eq!(f.machine.state().last_selected_at(), Some(ms(0)));
        assert!(!f.machine.is_camera_settled());

        // One scale tween per block, one opacity tween per face.
        assert_eq!(f.registry.scale.len(), f.scene.blocks.len());
        assert_eq!(f.registry.opacity.len(), f.scene.faces.len());
        assert_eq!(f.registry.scale(block).unwrap().end, 1.06);
        assert_eq!(f.registry.scale(block).unwrap().bounce, Some(1.12));
        assert_eq!(f.registry.opacity(top).unwrap().end, 1.0);
        assert!(f.scene.face(top).unwrap().emphasis);
        let other = f.face("block-2-2", "front");
        assert_eq!(f.registry.opacity(other).unwrap().end, 0.25);
        assert!(!f.scene.face(other).unwrap().emphasis);

        let camera = f.registry.camera().unwrap();
        assert_eq!(camera.to.distance, f.config.selection.focus_distance);
        assert_eq!(camera.to.fov, f.config.selection.focus_fov);
    }

    #[test]
    fn repeat_within_debounce_is_ignored() {
        let mut f = Fixture::new();
        let face = f.face("block-0-0", "top");
        f.select(face, 0);
        let before = f.registry.camera().copied();

        assert_eq!(f.select(face, 100), Transition::Ignored(IgnoreReason::Debounced));
        assert_eq!(f.registry.camera().copied(), before);
        assert_eq!(f.machine.state().last_selected_at(), Some(ms(0)));
    }

    #[test]
    fn repeat_after_debounce_resets() {
        let mut f = Fixture::new();
        let face = f.face("block-0-0", "top");
        f.select(face, 0);

        assert_eq!(f.select(face, 800), Transition::Reset);
        assert!(!f.machine.state().is_active());
        let camera = f.registry.camera().unwrap();
        let home = f.config.camera.default_pose();
        assert!((normalize_angle(camera.to.azimuth) - home.azimuth).abs() < 1e-5);
        assert_eq!(camera.to.polar, home.polar);
        assert_eq!(camera.to.distance, home.distance);
        assert_eq!(camera.to.fov, f.config.camera.base_fov);
        assert!(!camera.lock_distance);
        assert!(f.registry.scale.values().all(|t| t.end == 1.0 && t.bounce.is_none()));
        assert!(f.registry.opacity.values().all(|t| t.end == 1.0));
        assert!(f.scene.faces.iter().all(|face| !face.emphasis));
    }

    #[test]
    fn sibling_face_switches_without_scale_tweens() {
        let mut f = Fixture::new();
        let top = f.face("block-0-0", "top");
        let front = f.face("block-0-0", "front");
        let block = f.scene.block_of(top).unwrap();
        f.select(top, 0);
        f.registry = TweenRegistry::new();

        let transition = f.select(front, 50);
        assert_eq!(
            transition,
            Transition::FaceSwitch {
                block,
                from: top,
                to: front
            }
        );
        assert!(f.registry.scale.is_empty());
        assert_eq!(f.registry.opacity.len(), 2);
        assert_eq!(f.registry.opacity(top).unwrap().end, 0.25);
        assert_eq!(f.registry.opacity(front).unwrap().end, 1.0);
        assert!(f.scene.face(front).unwrap().emphasis);
        assert!(!f.scene.face(top).unwrap().emphasis);
        assert_eq!(f.machine.state().last_selected_at(), Some(ms(50)));

        // The camera turns toward the new face even though the block stays put.
        let camera = f.registry.camera().unwrap();
        let world = f.scene.face_world_position(front).unwrap();
        let center = f.config.selection.scene_center;
        let distance = f.config.selection.focus_distance;
        let expected = f.solver.pose_for_target(center, world, distance);
        assert!(shortest_angular_delta(expected.azimuth, camera.to.azimuth).abs() < 1e-4);
        assert!((camera.to.polar - expected.polar).abs() < 1e-5);
        assert_eq!(camera.to.distance, distance);
        assert_eq!(camera.to.fov, f.config.selection.focus_fov);
        assert!(!f.machine.is_camera_settled());
    }

    #[test]
    fn other_block_switches_block() {
        let mut f = Fixture::new();
        let first = f.face("block-0-0", "top");
        let second = f.face("block-2-2", "left");
        f.select(first, 0);
        let transition = f.select(second, 40);
        assert!(matches!(
            transition,
            Transition::BlockSwitch { face, previous: Some((_, prev)), .. }
                if face == second && prev == first
        ));
    }

    #[test]
    fn home_block_rules() {
        let mut f = Fixture::new();
        let home = f.face("home", "top");
        let face = f.face("block-0-0", "top");

        assert_eq!(f.select(home, 0), Transition::Ignored(IgnoreReason::HomeWithoutSelection));
        assert!(f.registry.is_idle());

        f.select(face, 10);
        let no_reset = SelectOptions {
            allow_home_reset: false,
            ..SelectOptions::default()
        };
        assert_eq!(
            f.select_with(home, no_reset, 20),
            Transition::Ignored(IgnoreReason::HomeResetDisabled)
        );
        assert!(f.machine.state().is_active());

        assert_eq!(f.select(home, 30), Transition::Reset);
        assert!(!f.machine.state().is_active());
    }

    #[test]
    fn structural_hits_do_nothing() {
        let mut f = Fixture::new();
        let block = f.scene.block_by_name("block-0-0").unwrap();
        let mut ctx = EffectContext {
            scene: &mut f.scene,
            registry: &mut f.registry,
            camera: &mut f.camera,
            solver: &f.solver,
            config: &f.config,
            lock_distance: false,
            now: ms(0),
        };
        let surface = Surface::Structural(block);
        let transition = f.machine.select(surface, &SelectOptions::default(), &mut ctx);
        assert_eq!(transition, Transition::Ignored(IgnoreReason::Structural));
        assert!(f.registry.is_idle());
    }

    #[test]
    fn distance_override_reaches_camera_target() {
        let mut f = Fixture::new();
        let face = f.face("block-0-0", "top");
        f.select_with(face, SelectOptions::with_distance(9.5), 0);
        assert_eq!(f.registry.camera().unwrap().to.distance, 9.5);
    }

    #[test]
    fn camera_aims_from_center_toward_face() {
        let mut f = Fixture::new();
        let face = f.face("block-0-2", "right");
        f.select(face, 0);
        let to = f.registry.camera().unwrap().to;
        let world = f.scene.face_world_position(face).unwrap();
        let expected = f.solver.pose_for_target(f.config.selection.scene_center, world, 6.0);
        assert!((to.azimuth - expected.azimuth).abs() < 1e-5);
        assert!((to.polar - expected.polar).abs() < 1e-5);
    }
}
