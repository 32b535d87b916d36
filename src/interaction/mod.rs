//! # Interaction Module
//!
//! Pointer input handling for the focus engine.
//!
//! - [`gesture`] - Tap versus drag classification
//! - [`selection`] - Selection state machine and its visual effects

pub mod gesture;
pub mod selection;

pub use gesture::{GestureClassifier, PointerEvent, PointerKind, PointerPhase, Rejection, Tap};
pub use selection::{
    EffectContext, IgnoreReason, SelectOptions, SelectionMachine, SelectionState, Transition,
};
