//! # Playback Module
//!
//! Unattended, scripted selection sequences used for recordings. Scripts drive
//! the same selection path as live taps while the engine holds guided mode.

pub mod runner;
pub mod script;

pub use runner::{RunnerStatus, ScriptHandle, ScriptRunner, ScriptTarget};
pub use script::{most_separated_faces, FaceRef, Script, ScriptStep};
