//! # Facet Focus Prelude
//!
//! Commonly used types in one import:
//!
//! ```rust
//! use facet_focus::prelude::*;
//!
//! let scene = Scene::block_grid(3, 3, 2.0).unwrap();
//! let mut engine = FocusEngine::new(scene, EngineConfig::default()).unwrap();
//! let face = engine.scene().face_by_name("block-0-0", "top").unwrap();
//! let transition = engine.select_face(face, SelectOptions::default());
//! assert!(matches!(transition, Transition::BlockSwitch { .. }));
//! ```

// Re-export core engine types
pub use crate::app::FocusApp;
pub use crate::config::EngineConfig;
pub use crate::engine::FocusEngine;
pub use crate::error::FocusError;

// Re-export graphics and scene types
pub use crate::gfx::camera::{CameraManager, CameraPose, OrbitCamera, PoseSolver};
pub use crate::gfx::picking::{HitCandidate, ObjectPicker};
pub use crate::gfx::scene::{BlockId, FaceId, Scene, SceneBuilder, SceneGraph, Surface};

// Re-export interaction and playback types
pub use crate::interaction::{PointerEvent, PointerKind, PointerPhase, SelectOptions, Transition};
pub use crate::playback::{FaceRef, Script, ScriptHandle};

// Re-export common external dependencies
pub use cgmath::{InnerSpace, Vector2, Vector3, Zero};

// Re-export common standard library types
pub use std::time::Duration;
