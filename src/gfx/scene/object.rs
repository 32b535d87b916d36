use cgmath::{Vector3, Zero};

/// Stable arena index of a block inside its [`Scene`](super::Scene).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub usize);

/// Stable arena index of a face inside its [`Scene`](super::Scene).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceId(pub usize);

/// What a pointer ray hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    /// A selectable face.
    Face(FaceId),
    /// The shared structural body of a block; never selectable.
    Structural(BlockId),
    /// Anything the scene does not know about (backdrop, helpers, overlays).
    Other,
}

/// A selectable composite sub-object.
#[derive(Debug, Clone)]
pub struct Block {
    pub id: BlockId,
    pub name: String,
    /// Faces in the order the scene loader classified them.
    pub faces: Vec<FaceId>,
    pub is_home: bool,
    /// Block center in object space.
    pub center: Vector3<f32>,
    /// Half size of the structural body.
    pub half_extents: Vector3<f32>,
    /// Uniform scale, written by the tween scheduler.
    pub scale: f32,
}

impl Block {
    pub fn new(id: BlockId, name: &str, center: Vector3<f32>, half_extents: Vector3<f32>) -> Self {
        Self {
            id,
            name: name.to_string(),
            faces: Vec::new(),
            is_home: false,
            center,
            half_extents,
            scale: 1.0,
        }
    }
}

/// A clickable surface owned by exactly one block.
#[derive(Debug, Clone)]
pub struct Face {
    pub id: FaceId,
    pub block: BlockId,
    pub name: String,
    /// Face center relative to the owning block's center, before scaling.
    pub local_center: Vector3<f32>,
    pub half_extents: Vector3<f32>,
    pub opacity: f32,
    /// Glow flag used by the renderer.
    pub emphasis: bool,
}

impl Face {
    pub fn new(
        id: FaceId,
        block: BlockId,
        name: &str,
        local_center: Vector3<f32>,
        half_extents: Vector3<f32>,
    ) -> Self {
        Self {
            id,
            block,
            name: name.to_string(),
            local_center,
            half_extents,
            opacity: 1.0,
            emphasis: false,
        }
    }
}

/// Whole-object transform animated by the intro slide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootTransform {
    pub offset: Vector3<f32>,
    /// Rotation about the up axis in radians; may exceed a full turn.
    pub spin: f32,
}

impl Default for RootTransform {
    fn default() -> Self {
        Self {
            offset: Vector3::zero(),
            spin: 0.0,
        }
    }
}
