//! Scene access trait used by the focus engine.
//!
//! The engine never owns scene loading or material styling. It only needs the
//! block/face topology, a handful of writable visual properties and world
//! positions. Anything that can answer these calls can host the engine;
//! [`Scene`](super::Scene) is the in-memory implementation.

use cgmath::Vector3;

use super::object::{BlockId, FaceId, RootTransform};

/// Topology queries and visual property writes the focus engine relies on.
///
/// Lookups return `None` for ids the host does not (yet) know; writes to
/// unknown ids are silently ignored.
pub trait SceneGraph {
    /// All blocks in stable order.
    fn block_ids(&self) -> Vec<BlockId>;

    /// Faces owned by `block`, in classification order.
    fn faces_of(&self, block: BlockId) -> Option<&[FaceId]>;

    /// Back-reference from a face to its block.
    fn block_of(&self, face: FaceId) -> Option<BlockId>;

    /// Lookup by block and face name.
    fn face_named(&self, block: &str, face: &str) -> Option<FaceId>;

    /// The designated home block, if the scene has one.
    fn home_block(&self) -> Option<BlockId>;

    fn block_scale(&self, block: BlockId) -> Option<f32>;

    fn set_block_scale(&mut self, block: BlockId, scale: f32);

    fn face_opacity(&self, face: FaceId) -> Option<f32>;

    fn set_face_opacity(&mut self, face: FaceId, opacity: f32);

    fn face_emphasis(&self, face: FaceId) -> Option<bool>;

    fn set_face_emphasis(&mut self, face: FaceId, emphasis: bool);

    /// Current world-space center of a face, including block scale and root transform.
    fn face_world_position(&self, face: FaceId) -> Option<Vector3<f32>>;

    fn root_transform(&self) -> RootTransform;

    fn set_root_transform(&mut self, transform: RootTransform);

    /// Every face of every block, in stable order.
    fn face_ids(&self) -> Vec<FaceId> {
        self.block_ids()
            .into_iter()
            .filter_map(|block| self.faces_of(block).map(<[FaceId]>::to_vec))
            .flatten()
            .collect()
    }

    fn is_home(&self, block: BlockId) -> bool {
        self.home_block() == Some(block)
    }
}
