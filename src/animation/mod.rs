//! # Animation Module
//!
//! Tween engine driving every visual transition of the focus engine.
//!
//! - [`easing`] - Easing curves
//! - [`tween`] - Scalar, camera and intro tweens
//! - [`registry`] - In-flight tweens keyed by target identity
//! - [`scheduler`] - Per-frame advancement in a fixed channel order

pub mod easing;
pub mod registry;
pub mod scheduler;
pub mod tween;

pub use easing::Easing;
pub use registry::TweenRegistry;
pub use scheduler::{CameraCompletion, FrameReport, FrameScheduler};
pub use tween::{CameraTween, IntroTween, Lerp, Tween, TweenSpec};
