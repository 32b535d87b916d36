use cgmath::{Vector2, Vector3};
use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    dpi::{PhysicalPosition, PhysicalSize},
    event::{ElementState, MouseButton, MouseScrollDelta, Touch, TouchPhase, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    window::{Window, WindowAttributes},
};

use crate::animation::scheduler::FrameReport;
use crate::config::EngineConfig;
use crate::engine::FocusEngine;
use crate::gfx::{picking::ObjectPicker, scene::Scene};
use crate::interaction::gesture::{PointerEvent, PointerKind, PointerPhase};
use crate::playback::script::Script;

/// Called after every frame with the updated engine state; hosts draw from here.
pub type FrameCallback = Box<dyn FnMut(&FocusEngine, &FrameReport)>;

const MOUSE_POINTER_ID: u64 = u64::MAX;
const PIXELS_PER_LINE: f32 = 40.0;

pub struct FocusApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    window: Option<Arc<Window>>,
    engine: FocusEngine,
    picker: ObjectPicker,
    started: Instant,
    cursor: Vector2<f32>,
    frame_callback: Option<FrameCallback>,
    title: String,
}

impl FocusApp {
    /// Create a viewer for `scene`.
    pub fn new(scene: Scene, config: EngineConfig) -> anyhow::Result<Self> {
        let event_loop = EventLoop::new()?;
        let engine = FocusEngine::new(scene, config)?;

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                window: None,
                engine,
                picker: ObjectPicker::new(),
                started: Instant::now(),
                cursor: Vector2::new(0.0, 0.0),
                frame_callback: None,
                title: String::new(),
            },
        })
    }

    pub fn engine_mut(&mut self) -> &mut FocusEngine {
        &mut self.app_state.engine
    }

    /// Set the per-frame callback
    pub fn on_frame<F>(&mut self, callback: F)
    where
        F: FnMut(&FocusEngine, &FrameReport) + 'static,
    {
        self.app_state.frame_callback = Some(Box::new(callback));
    }

    /// Run the application (consumes self and starts the event loop)
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = self
            .event_loop
            .take()
            .ok_or_else(|| anyhow::anyhow!("event loop already consumed"))?;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self.app_state)?;
        Ok(())
    }
}

impl AppState {
    fn now(&self) -> Duration {
        self.started.elapsed()
    }

    fn pointer(&mut self, phase: PointerPhase, id: u64, position: Vector2<f32>, kind: PointerKind) {
        let mut event = PointerEvent::new(phase, Some(id), position, self.now(), kind);
        if phase == PointerPhase::Release {
            event.candidates = self.picker.pick_surfaces(
                (position.x, position.y),
                self.engine.screen_size(),
                self.engine.camera(),
                self.engine.scene(),
            );
        }
        if let Some(transition) = self.engine.handle_pointer(&event) {
            log::debug!("{:?}", transition);
        }
    }

    fn touch(&mut self, touch: Touch) {
        let phase = match touch.phase {
            TouchPhase::Started => PointerPhase::Press,
            TouchPhase::Moved => PointerPhase::Move,
            TouchPhase::Ended => PointerPhase::Release,
            TouchPhase::Cancelled => PointerPhase::Cancel,
        };
        let PhysicalPosition { x, y } = touch.location;
        self.pointer(phase, touch.id, Vector2::new(x as f32, y as f32), PointerKind::Touch);
    }

    fn start_tour(&mut self) {
        if self.engine.is_guided() {
            return;
        }
        let mut rng = rand::rng();
        match Script::tour(self.engine.scene(), &mut rng) {
            Some(script) => {
                self.engine.run_script(script);
            }
            None => log::warn!("Scene has nothing to tour"),
        }
    }

    fn status(&self) -> String {
        let engine = &self.engine;
        if engine.is_guided() {
            return "Facet Focus - tour (Esc to stop)".to_string();
        }
        match engine.selection().face().and_then(|face| engine.scene().face(face)) {
            Some(face) => {
                let block = engine
                    .scene()
                    .block(face.block)
                    .map_or("?", |block| block.name.as_str());
                format!("Facet Focus - {} / {}", block, face.name)
            }
            None => "Facet Focus".to_string(),
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        match event_loop.create_window(
            WindowAttributes::default()
                .with_title("Facet Focus")
                .with_inner_size(winit::dpi::LogicalSize::new(1200, 800)),
        ) {
            Ok(window) => {
                let window_handle = Arc::new(window);
                let PhysicalSize { width, height } = window_handle.inner_size();
                self.engine.resize(width, height);
                self.window = Some(window_handle);
                self.engine.play_intro(Vector3::new(0.0, -6.0, 0.0), 1.0);
            }
            Err(error) => {
                log::error!("Failed to create window: {}", error);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.engine.resize(width, height);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Vector2::new(position.x as f32, position.y as f32);
                self.pointer(PointerPhase::Move, MOUSE_POINTER_ID, self.cursor, PointerKind::Mouse);
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                let phase = match state {
                    ElementState::Pressed => PointerPhase::Press,
                    ElementState::Released => PointerPhase::Release,
                };
                self.pointer(phase, MOUSE_POINTER_ID, self.cursor, PointerKind::Mouse);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(position) => position.y as f32 / PIXELS_PER_LINE,
                };
                self.engine.handle_scroll(-lines);
            }
            WindowEvent::Touch(touch) => self.touch(touch),
            WindowEvent::Focused(false) => {
                let cursor = self.cursor;
                self.pointer(PointerPhase::Cancel, MOUSE_POINTER_ID, cursor, PointerKind::Mouse);
            }
            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                match event.logical_key.as_ref() {
                    Key::Named(NamedKey::Escape) => {
                        if self.engine.is_guided() {
                            self.engine.cancel_script();
                        } else {
                            event_loop.exit();
                        }
                    }
                    Key::Character("p") | Key::Character("P") => self.start_tour(),
                    Key::Character("h") | Key::Character("H") => {
                        self.engine.reset_to_default();
                    }
                    _ => (),
                }
            }
            WindowEvent::RedrawRequested => {
                let now = self.now();
                let report = self.engine.tick(now);
                if let Some(callback) = self.frame_callback.as_mut() {
                    callback(&self.engine, &report);
                }

                let title = self.status();
                if let Some(window) = self.window.as_ref() {
                    if title != self.title {
                        window.set_title(&title);
                        self.title = title;
                    }
                }
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
