// src/lib.rs
//! Facet Focus
//!
//! Selection, tween and camera-focus engine for interactive 3D objects built
//! from selectable blocks, each carrying several clickable faces.
//!
//! Tapping a face zooms the orbit camera toward it, emphasizes the owning
//! block and dims the rest. Tapping it again (or the home block) returns to
//! the default view. A scripted tour drives the same engine unattended.

pub mod animation;
pub mod app;
pub mod config;
pub mod engine;
pub mod error;
pub mod gfx;
pub mod interaction;
pub mod playback;
pub mod prelude;

// Re-export main types for convenience
pub use app::FocusApp;
pub use config::EngineConfig;
pub use engine::FocusEngine;
pub use error::FocusError;
