//! # Error Types
//!
//! Errors surface from setup paths (scene construction, configuration) and
//! from script steps that name missing faces. Live selection on missing data
//! is a silent no-op and never produces one of these.

use thiserror::Error;

use crate::gfx::scene::FaceId;

/// Problems detected while assembling a [`Scene`](crate::gfx::scene::Scene).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SceneError {
    #[error("block `{0}` was added twice")]
    DuplicateBlock(String),

    #[error("face `{face}` of block `{block}` was added twice")]
    DuplicateFace { block: String, face: String },

    #[error("block `{0}` has no selectable faces")]
    EmptyBlock(String),

    #[error("home block `{0}` does not exist")]
    UnknownHomeBlock(String),

    #[error("face `{face}` refers to unknown block `{block}`")]
    UnknownBlock { block: String, face: String },
}

/// Invalid engine configuration values.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("`{0}` must be a positive duration")]
    NonPositiveDuration(&'static str),

    #[error("`{name}` must be greater than zero, got {value}")]
    NonPositive { name: &'static str, value: f32 },

    #[error("touch drag threshold ({touch}px) is smaller than the mouse threshold ({mouse}px)")]
    InvertedDragThresholds { mouse: f32, touch: f32 },

    #[error("polar epsilon {0} must lie strictly inside (0, pi/2)")]
    PolarEpsilon(f32),

    #[error("bounce split {0} must lie strictly inside (0, 1)")]
    BounceSplit(f32),

    #[error("distance lead factor {0} must be at least 1")]
    DistanceLead(f32),
}

/// Top-level error for the focus engine.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FocusError {
    #[error("unknown face {0:?}")]
    UnknownFace(FaceId),

    #[error("unknown face `{face}` on block `{block}`")]
    UnknownFaceName { block: String, face: String },

    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
