//! # Focus Engine
//!
//! Owns every piece of focus state and wires the components together:
//!
//! ```text
//! pointer events -> GestureClassifier -> SelectionMachine -> TweenRegistry
//!                                              |                   |
//!                                         PoseSolver        FrameScheduler (tick)
//!                                                                  |
//!                                                 scene, camera, observers
//! ```
//!
//! Scripted playback bypasses the gesture classifier and calls the selection
//! machine directly, while guided mode shuts out live input.
//!
//! Everything runs on the caller's thread. Time is always passed in as a
//! monotonic [`Duration`] so hosts and tests control the clock.

use std::f32::consts::TAU;
use std::time::Duration;

use cgmath::{Vector2, Vector3, Zero};

use crate::animation::{registry::TweenRegistry, scheduler::FrameReport, scheduler::FrameScheduler};
use crate::config::EngineConfig;
use crate::error::FocusError;
use crate::gfx::{
    camera::{
        camera_controller::CameraController,
        camera_utils::CameraManager,
        orbit_camera::{CameraPose, OrbitCamera, OrbitCameraBounds},
        pose_solver::PoseSolver,
    },
    scene::{FaceId, RootTransform, Scene, SceneGraph, Surface},
};
use crate::interaction::{
    gesture::{GestureClassifier, PointerEvent, PointerPhase},
    selection::{EffectContext, SelectOptions, SelectionMachine, SelectionState, Transition},
};
use crate::playback::{
    runner::{RunnerStatus, ScriptHandle, ScriptRunner, ScriptTarget},
    script::{FaceRef, Script},
};

pub type PoseObserver = Box<dyn FnMut(&CameraPose)>;
pub type SelectionObserver = Box<dyn FnMut(&SelectionState, &Transition)>;
pub type GuidedObserver = Box<dyn FnMut(bool)>;
pub type CursorObserver = Box<dyn FnMut(Vector2<f32>)>;

#[derive(Default)]
struct Observers {
    pose: Vec<PoseObserver>,
    selection: Vec<SelectionObserver>,
    guided: Vec<GuidedObserver>,
    cursor: Vec<CursorObserver>,
}

pub struct FocusEngine<S: SceneGraph = Scene> {
    config: EngineConfig,
    scene: S,
    camera: CameraManager,
    solver: PoseSolver,
    registry: TweenRegistry,
    scheduler: FrameScheduler,
    selection: SelectionMachine,
    gestures: GestureClassifier,
    runner: Option<ScriptRunner>,
    guided: bool,
    screen_size: (f32, f32),
    now: Duration,
    last_activity: Duration,
    observers: Observers,
}

impl<S: SceneGraph> FocusEngine<S> {
    pub fn new(scene: S, config: EngineConfig) -> Result<Self, FocusError> {
        config.validate()?;

        let home = config.camera.default_pose();
        let mut camera = OrbitCamera::new(home, 1.0);
        camera.bounds = OrbitCameraBounds {
            min_distance: config.camera.min_distance,
            max_distance: config.camera.max_distance,
            ..OrbitCameraBounds::with_polar_epsilon(config.camera.polar_epsilon)
        };
        camera.set_pose(home);

        let controller =
            CameraController::new(config.camera.rotate_speed, config.camera.zoom_speed);
        let solver = PoseSolver::new(home, config.camera.polar_epsilon)
            .with_trims(config.camera.yaw_trim, config.camera.polar_trim);

        log::info!(
            "Focus engine ready with {} blocks and {} faces",
            scene.block_ids().len(),
            scene.face_ids().len()
        );

        Ok(Self {
            gestures: GestureClassifier::new(config.gesture),
            config,
            scene,
            camera: CameraManager::new(camera, controller),
            solver,
            registry: TweenRegistry::new(),
            scheduler: FrameScheduler::new(),
            selection: SelectionMachine::new(),
            runner: None,
            guided: false,
            screen_size: (1.0, 1.0),
            now: Duration::ZERO,
            last_activity: Duration::ZERO,
            observers: Observers::default(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera.camera
    }

    pub fn camera_manager(&self) -> &CameraManager {
        &self.camera
    }

    pub fn registry(&self) -> &TweenRegistry {
        &self.registry
    }

    pub fn selection(&self) -> &SelectionState {
        self.selection.state()
    }

    /// True while a script runs; live input is ignored.
    pub fn is_guided(&self) -> bool {
        self.guided
    }

    /// False from a selection that moves the camera until that move completes.
    /// Live orbit controls are held off meanwhile.
    pub fn is_camera_settled(&self) -> bool {
        self.selection.is_camera_settled()
    }

    /// Latest time seen by the engine.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn frame(&self) -> u64 {
        self.scheduler.frame()
    }

    pub fn screen_size(&self) -> (f32, f32) {
        self.screen_size
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.screen_size = (width as f32, height as f32);
        self.camera.camera.resize_projection(width, height);
    }

    pub fn on_camera_pose_changed<F>(&mut self, observer: F)
    where
        F: FnMut(&CameraPose) + 'static,
    {
        self.observers.pose.push(Box::new(observer));
    }

    pub fn on_selection_changed<F>(&mut self, observer: F)
    where
        F: FnMut(&SelectionState, &Transition) + 'static,
    {
        self.observers.selection.push(Box::new(observer));
    }

    pub fn on_guided_mode_changed<F>(&mut self, observer: F)
    where
        F: FnMut(bool) + 'static,
    {
        self.observers.guided.push(Box::new(observer));
    }

    pub fn on_cursor_moved<F>(&mut self, observer: F)
    where
        F: FnMut(Vector2<f32>) + 'static,
    {
        self.observers.cursor.push(Box::new(observer));
    }

    fn advance_clock(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Select a face at the engine's current time.
    pub fn select_face(&mut self, face: FaceId, options: SelectOptions) -> Transition {
        self.select_surface(Surface::Face(face), options)
    }

    pub fn select_face_at(
        &mut self,
        face: FaceId,
        options: SelectOptions,
        now: Duration,
    ) -> Transition {
        self.advance_clock(now);
        self.select_face(face, options)
    }

    /// Run any hit surface through the selection rules.
    pub fn select_surface(&mut self, surface: Surface, options: SelectOptions) -> Transition {
        let now = self.now;
        let mut ctx = EffectContext {
            scene: &mut self.scene,
            registry: &mut self.registry,
            camera: &mut self.camera.camera,
            solver: &self.solver,
            config: &self.config,
            lock_distance: self.guided || self.config.camera.lock_distance_on_complete,
            now,
        };
        let transition = self.selection.select(surface, &options, &mut ctx);
        if !transition.is_ignored() {
            self.last_activity = now;
            self.notify_selection(&transition);
        }
        transition
    }

    /// Return to the default view whatever the current selection.
    pub fn reset_to_default(&mut self) -> Transition {
        let now = self.now;
        let mut ctx = EffectContext {
            scene: &mut self.scene,
            registry: &mut self.registry,
            camera: &mut self.camera.camera,
            solver: &self.solver,
            config: &self.config,
            lock_distance: false,
            now,
        };
        let transition = self.selection.reset(&mut ctx);
        self.last_activity = now;
        self.notify_selection(&transition);
        transition
    }

    /// Slide the whole object in from `from_offset`, spinning `turns` times.
    pub fn play_intro(&mut self, from_offset: Vector3<f32>, turns: f32) {
        let start = RootTransform {
            offset: from_offset,
            spin: 0.0,
        };
        let end = RootTransform {
            offset: Vector3::zero(),
            spin: turns * TAU,
        };
        if self.registry.intro().is_none() {
            self.scene.set_root_transform(start);
        }
        self.registry
            .set_intro(start, end, self.now, self.config.tween.intro_duration);
    }

    /// Feed one pointer event. Returns the selection transition if the event
    /// completed a tap.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> Option<Transition> {
        self.advance_clock(event.timestamp);
        self.reap_script();
        if self.guided {
            log::trace!("Pointer event ignored in guided mode");
            return None;
        }
        self.last_activity = self.now;

        let camera_free = self.selection.is_camera_settled();
        match event.phase {
            PointerPhase::Press if camera_free => {
                let threshold = self.config.gesture.drag_threshold(event.kind);
                self.camera.process_press(event.position, threshold);
            }
            PointerPhase::Move if camera_free => {
                self.camera.process_move(event.position);
            }
            PointerPhase::Release | PointerPhase::Cancel => self.camera.process_release(),
            _ => {}
        }

        let pose = camera_free.then(|| self.camera.camera.pose());
        let tap = self.gestures.handle(event, pose, &self.scene)?;
        log::debug!("Tap on {:?} of {:?}", tap.face, tap.block);
        Some(self.select_surface(Surface::Face(tap.face), SelectOptions::default()))
    }

    /// Wheel zoom. Returns whether the camera moved.
    pub fn handle_scroll(&mut self, amount: f32) -> bool {
        if self.guided || !self.selection.is_camera_settled() {
            return false;
        }
        self.last_activity = self.now;
        self.camera.process_scroll(amount)
    }

    /// Start a script in guided mode, replacing any script already running.
    pub fn run_script(&mut self, script: Script) -> ScriptHandle {
        if self.runner.is_some() {
            log::info!("Replacing running script");
            self.finish_script();
        }
        log::info!("Running script with {} steps", script.len());

        let handle = ScriptHandle::new();
        self.runner = Some(ScriptRunner::new(script, handle.clone()));
        self.gestures.reset();
        self.camera.process_release();
        self.camera.controller.set_enabled(false);
        self.set_guided(true);
        handle
    }

    /// Stop the running script now. The scene keeps whatever the last
    /// completed step produced.
    pub fn cancel_script(&mut self) {
        if let Some(runner) = &self.runner {
            runner.handle().cancel();
        }
        self.reap_script();
    }

    fn reap_script(&mut self) {
        let cancelled = self
            .runner
            .as_ref()
            .is_some_and(|runner| runner.handle().is_cancelled());
        if cancelled {
            self.finish_script();
        }
    }

    fn finish_script(&mut self) {
        if let Some(runner) = self.runner.take() {
            runner.handle().mark_finished();
        }
        self.camera.controller.set_enabled(true);
        self.set_guided(false);
    }

    fn set_guided(&mut self, guided: bool) {
        if self.guided == guided {
            return;
        }
        self.guided = guided;
        log::info!("Guided mode {}", if guided { "on" } else { "off" });
        for observer in &mut self.observers.guided {
            observer(guided);
        }
    }

    /// Advance one frame: run due script steps, then every tween.
    pub fn tick(&mut self, now: Duration) -> FrameReport {
        self.advance_clock(now);
        let now = self.now;

        if let Some(mut runner) = self.runner.take() {
            let status = runner.poll(now, self);
            self.runner = Some(runner);
            if status != RunnerStatus::Running {
                self.finish_script();
            }
        }

        let report = self.scheduler.advance(
            now,
            &mut self.registry,
            &mut self.scene,
            &mut self.camera.camera,
        );

        if let Some(done) = report.camera_finished {
            if done.lock_distance {
                self.camera.camera.lock_distance(done.pose.distance);
            }
            self.selection.on_camera_settled();
            let pose = self.camera.camera.pose();
            for observer in &mut self.observers.pose {
                observer(&pose);
            }
        }

        if let Some(idle) = self.config.selection.idle_reset_after {
            let idle_for = now.saturating_sub(self.last_activity);
            let settled = self.selection.is_camera_settled();
            if !self.guided && settled && self.selection.state().is_active() && idle_for >= idle {
                log::info!("Idle for {:?}, resetting", idle_for);
                self.reset_to_default();
            }
        }

        report
    }

    fn notify_selection(&mut self, transition: &Transition) {
        let state = *self.selection.state();
        for observer in &mut self.observers.selection {
            observer(&state, transition);
        }
    }
}

impl<S: SceneGraph> ScriptTarget for FocusEngine<S> {
    fn select_scripted(
        &mut self,
        face: &FaceRef,
        distance: Option<f32>,
    ) -> Result<(), FocusError> {
        let face = face.resolve(&self.scene)?;
        let options = SelectOptions {
            allow_home_reset: true,
            distance_override: distance,
        };
        self.select_face(face, options);
        Ok(())
    }

    fn point_at(&mut self, face: &FaceRef) -> Result<(), FocusError> {
        let face = face.resolve(&self.scene)?;
        let world = self
            .scene
            .face_world_position(face)
            .ok_or(FocusError::UnknownFace(face))?;
        match self.camera.project_to_screen(world, self.screen_size) {
            Some(cursor) => {
                for observer in &mut self.observers.cursor {
                    observer(cursor);
                }
            }
            None => log::debug!("{:?} is behind the camera, cursor not moved", face),
        }
        Ok(())
    }
}
