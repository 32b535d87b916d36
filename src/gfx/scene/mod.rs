//! # Scene Management Module
//!
//! Block and face topology for the focus engine. The engine talks to scenes
//! through the [`SceneGraph`] trait; [`Scene`] is the in-memory host used by
//! the viewer app, the tour binary and the tests.
//!
//! ## Key Components
//!
//! - [`Scene`] - Blocks, faces and the object-level transform
//! - [`SceneBuilder`] - Builder for scenes, collecting topology errors
//! - [`Block`] / [`Face`] - Selectable sub-objects and their clickable surfaces
//! - [`Surface`] - Classification of whatever a pointer ray hit
//!
//! ## Usage
//!
//! ```rust
//! use facet_focus::gfx::scene::{Scene, SceneGraph};
//!
//! let scene = Scene::block_grid(3, 3, 2.0).unwrap();
//! let home = scene.home_block().unwrap();
//! assert_eq!(scene.faces_of(home).unwrap().len(), 6);
//! ```

pub mod object;
pub mod scene;
pub mod traits;

// Re-export main types
pub use object::{Block, BlockId, Face, FaceId, RootTransform, Surface};
pub use scene::{Scene, SceneBuilder};
pub use traits::SceneGraph;
