use cgmath::{Matrix4, Rad, Vector3};

use crate::error::SceneError;

use super::{
    object::{Block, BlockId, Face, FaceId, RootTransform},
    traits::SceneGraph,
};

/// Faces sit on the block surface and cover this share of each side.
const FACE_COVERAGE: f32 = 0.9;
/// Thickness of a face slab, as a fraction of the block's half size.
const FACE_THICKNESS: f32 = 0.02;

/// In-memory scene: blocks, their faces and the object-level transform.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub blocks: Vec<Block>,
    pub faces: Vec<Face>,
    pub root: RootTransform,
    home: Option<BlockId>,
}

impl Scene {
    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(id.0)
    }

    pub fn face(&self, id: FaceId) -> Option<&Face> {
        self.faces.get(id.0)
    }

    pub fn block_by_name(&self, name: &str) -> Option<BlockId> {
        self.blocks.iter().find(|b| b.name == name).map(|b| b.id)
    }

    pub fn face_by_name(&self, block: &str, face: &str) -> Option<FaceId> {
        let block = self.block(self.block_by_name(block)?)?;
        block
            .faces
            .iter()
            .copied()
            .find(|id| self.face(*id).is_some_and(|f| f.name == face))
    }

    /// Object-to-world matrix of a block (root transform, block offset, block scale).
    pub fn block_model_matrix(&self, id: BlockId) -> Option<Matrix4<f32>> {
        let block = self.block(id)?;
        Some(
            self.root_matrix()
                * Matrix4::from_translation(block.center)
                * Matrix4::from_scale(block.scale),
        )
    }

    pub fn root_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.root.offset) * Matrix4::from_angle_y(Rad(self.root.spin))
    }

    /// World-space center of a block.
    pub fn block_world_center(&self, id: BlockId) -> Option<Vector3<f32>> {
        let m = self.block_model_matrix(id)?;
        Some((m * Vector3::new(0.0, 0.0, 0.0).extend(1.0)).truncate())
    }

    /// Grid of cube blocks on the XZ plane with the middle block as home.
    ///
    /// Every block gets six faces: `top`, `bottom`, `front`, `back`, `left`, `right`.
    pub fn block_grid(cols: usize, rows: usize, spacing: f32) -> Result<Self, SceneError> {
        let mut builder = SceneBuilder::new();
        let half = Vector3::new(spacing * 0.4, spacing * 0.4, spacing * 0.4);
        let home = (rows / 2, cols / 2);
        for row in 0..rows {
            for col in 0..cols {
                let center = Vector3::new(
                    (col as f32 - (cols as f32 - 1.0) / 2.0) * spacing,
                    0.0,
                    (row as f32 - (rows as f32 - 1.0) / 2.0) * spacing,
                );
                let name = if (row, col) == home {
                    "home".to_string()
                } else {
                    format!("block-{}-{}", row, col)
                };
                builder = builder.cube_block(&name, center, half);
            }
        }
        builder.home_block("home").build()
    }
}

impl SceneGraph for Scene {
    fn block_ids(&self) -> Vec<BlockId> {
        self.blocks.iter().map(|b| b.id).collect()
    }

    fn faces_of(&self, block: BlockId) -> Option<&[FaceId]> {
        self.block(block).map(|b| b.faces.as_slice())
    }

    fn block_of(&self, face: FaceId) -> Option<BlockId> {
        self.face(face).map(|f| f.block)
    }

    fn face_named(&self, block: &str, face: &str) -> Option<FaceId> {
        self.face_by_name(block, face)
    }

    fn home_block(&self) -> Option<BlockId> {
        self.home
    }

    fn block_scale(&self, block: BlockId) -> Option<f32> {
        self.block(block).map(|b| b.scale)
    }

    fn set_block_scale(&mut self, block: BlockId, scale: f32) {
        if let Some(b) = self.blocks.get_mut(block.0) {
            b.scale = scale;
        }
    }

    fn face_opacity(&self, face: FaceId) -> Option<f32> {
        self.face(face).map(|f| f.opacity)
    }

    fn set_face_opacity(&mut self, face: FaceId, opacity: f32) {
        if let Some(f) = self.faces.get_mut(face.0) {
            f.opacity = opacity;
        }
    }

    fn face_emphasis(&self, face: FaceId) -> Option<bool> {
        self.face(face).map(|f| f.emphasis)
    }

    fn set_face_emphasis(&mut self, face: FaceId, emphasis: bool) {
        if let Some(f) = self.faces.get_mut(face.0) {
            f.emphasis = emphasis;
        }
    }

    fn face_world_position(&self, face: FaceId) -> Option<Vector3<f32>> {
        let face = self.face(face)?;
        let m = self.block_model_matrix(face.block)?;
        Some((m * face.local_center.extend(1.0)).truncate())
    }

    fn root_transform(&self) -> RootTransform {
        self.root
    }

    fn set_root_transform(&mut self, transform: RootTransform) {
        self.root = transform;
    }
}

struct PendingFace {
    name: String,
    local_center: Vector3<f32>,
    half_extents: Vector3<f32>,
}

struct PendingBlock {
    name: String,
    center: Vector3<f32>,
    half_extents: Vector3<f32>,
    faces: Vec<PendingFace>,
}

/// Builder for [`Scene`].
///
/// Faces are attached to blocks by name; errors are collected and reported
/// by [`SceneBuilder::build`].
///
/// ```rust
/// use cgmath::Vector3;
/// use facet_focus::gfx::scene::SceneBuilder;
///
/// let scene = SceneBuilder::new()
///     .cube_block("home", Vector3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 1.0, 1.0))
///     .cube_block("tower", Vector3::new(3.0, 0.0, 0.0), Vector3::new(1.0, 2.0, 1.0))
///     .home_block("home")
///     .build()
///     .unwrap();
/// assert_eq!(scene.blocks.len(), 2);
/// ```
#[derive(Default)]
pub struct SceneBuilder {
    blocks: Vec<PendingBlock>,
    home: Option<String>,
    errors: Vec<SceneError>,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn block(mut self, name: &str, center: Vector3<f32>, half_extents: Vector3<f32>) -> Self {
        if self.blocks.iter().any(|b| b.name == name) {
            self.errors.push(SceneError::DuplicateBlock(name.to_string()));
            return self;
        }
        self.blocks.push(PendingBlock {
            name: name.to_string(),
            center,
            half_extents,
            faces: Vec::new(),
        });
        self
    }

    /// Attach a face to an existing block; `local_center` is relative to the block center.
    pub fn face(
        mut self,
        block: &str,
        name: &str,
        local_center: Vector3<f32>,
        half_extents: Vector3<f32>,
    ) -> Self {
        let Some(pending) = self.blocks.iter_mut().find(|b| b.name == block) else {
            self.errors.push(SceneError::UnknownBlock {
                block: block.to_string(),
                face: name.to_string(),
            });
            return self;
        };
        if pending.faces.iter().any(|f| f.name == name) {
            self.errors.push(SceneError::DuplicateFace {
                block: block.to_string(),
                face: name.to_string(),
            });
            return self;
        }
        pending.faces.push(PendingFace {
            name: name.to_string(),
            local_center,
            half_extents,
        });
        self
    }

    /// Box-shaped block with one thin face slab on each of its six sides.
    pub fn cube_block(self, name: &str, center: Vector3<f32>, half: Vector3<f32>) -> Self {
        let sides = [
            ("top", Vector3::new(0.0, half.y, 0.0), Vector3::new(half.x, 0.0, half.z)),
            ("bottom", Vector3::new(0.0, -half.y, 0.0), Vector3::new(half.x, 0.0, half.z)),
            ("front", Vector3::new(0.0, 0.0, half.z), Vector3::new(half.x, half.y, 0.0)),
            ("back", Vector3::new(0.0, 0.0, -half.z), Vector3::new(half.x, half.y, 0.0)),
            ("right", Vector3::new(half.x, 0.0, 0.0), Vector3::new(0.0, half.y, half.z)),
            ("left", Vector3::new(-half.x, 0.0, 0.0), Vector3::new(0.0, half.y, half.z)),
        ];
        let thickness = half.x.min(half.y).min(half.z) * FACE_THICKNESS;
        let mut builder = self.block(name, center, half);
        for (face, local_center, span) in sides {
            let half_extents = Vector3::new(
                (span.x * FACE_COVERAGE).max(thickness),
                (span.y * FACE_COVERAGE).max(thickness),
                (span.z * FACE_COVERAGE).max(thickness),
            );
            builder = builder.face(name, face, local_center, half_extents);
        }
        builder
    }

    pub fn home_block(mut self, name: &str) -> Self {
        self.home = Some(name.to_string());
        self
    }

    pub fn build(self) -> Result<Scene, SceneError> {
        if let Some(error) = self.errors.into_iter().next() {
            return Err(error);
        }

        let mut scene = Scene::default();
        for pending in self.blocks {
            if pending.faces.is_empty() {
                return Err(SceneError::EmptyBlock(pending.name));
            }
            let block_id = BlockId(scene.blocks.len());
            let mut block =
                Block::new(block_id, &pending.name, pending.center, pending.half_extents);
            for face in pending.faces {
                let face_id = FaceId(scene.faces.len());
                scene.faces.push(Face::new(
                    face_id,
                    block_id,
                    &face.name,
                    face.local_center,
                    face.half_extents,
                ));
                block.faces.push(face_id);
            }
            scene.blocks.push(block);
        }

        if let Some(home) = self.home {
            let id = scene
                .block_by_name(&home)
                .ok_or(SceneError::UnknownHomeBlock(home))?;
            scene.blocks[id.0].is_home = true;
            scene.home = Some(id);
        }

        log::debug!(
            "Built scene with {} blocks and {} faces",
            scene.blocks.len(),
            scene.faces.len()
        );
        Ok(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::InnerSpace;

    #[test]
    fn grid_has_home_in_the_middle() {
        let scene = Scene::block_grid(3, 3, 2.0).unwrap();
        assert_eq!(scene.blocks.len(), 9);
        assert_eq!(scene.faces.len(), 54);
        let home = scene.home_block().unwrap();
        assert_eq!(scene.block(home).unwrap().name, "home");
        assert!(scene.block_world_center(home).unwrap().magnitude() < 1e-6);
        assert!(scene.is_home(home));
    }

    #[test]
    fn face_lookup_by_name_and_back_reference() {
        let scene = Scene::block_grid(3, 1, 2.0).unwrap();
        let face = scene.face_by_name("block-0-0", "top").unwrap();
        let block = scene.block_by_name("block-0-0").unwrap();
        assert_eq!(scene.block_of(face), Some(block));
        assert!(scene.faces_of(block).unwrap().contains(&face));
        assert!(scene.face_by_name("block-0-0", "roof").is_none());
    }

    #[test]
    fn face_world_position_follows_scale_and_root() {
        let mut scene = SceneBuilder::new()
            .cube_block("a", Vector3::new(2.0, 0.0, 0.0), Vector3::new(1.0, 1.0, 1.0))
            .build()
            .unwrap();
        let top = scene.face_by_name("a", "top").unwrap();
        let block = scene.block_of(top).unwrap();

        let top_at = |scene: &Scene| scene.face_world_position(top).unwrap();
        assert!((top_at(&scene) - Vector3::new(2.0, 1.0, 0.0)).magnitude() < 1e-6);

        scene.set_block_scale(block, 2.0);
        assert!((top_at(&scene) - Vector3::new(2.0, 2.0, 0.0)).magnitude() < 1e-6);

        scene.set_root_transform(RootTransform {
            offset: Vector3::new(0.0, 0.0, 5.0),
            spin: 0.0,
        });
        assert!((top_at(&scene) - Vector3::new(2.0, 2.0, 5.0)).magnitude() < 1e-6);
    }

    #[test]
    fn writes_to_unknown_ids_are_ignored() {
        let mut scene = Scene::block_grid(1, 1, 2.0).unwrap();
        scene.set_face_opacity(FaceId(999), 0.1);
        scene.set_block_scale(BlockId(999), 3.0);
        assert_eq!(scene.face_opacity(FaceId(999)), None);
        assert!(scene.faces.iter().all(|f| f.opacity == 1.0));
    }

    #[test]
    fn builder_reports_errors() {
        let duplicate = SceneBuilder::new()
            .cube_block("a", Vector3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 1.0, 1.0))
            .cube_block("a", Vector3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 1.0, 1.0))
            .build();
        assert_eq!(duplicate.unwrap_err(), SceneError::DuplicateBlock("a".into()));

        let empty = SceneBuilder::new()
            .block("bare", Vector3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 1.0, 1.0))
            .build();
        assert_eq!(empty.unwrap_err(), SceneError::EmptyBlock("bare".into()));

        let missing_home = SceneBuilder::new()
            .cube_block("a", Vector3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 1.0, 1.0))
            .home_block("nowhere")
            .build();
        assert_eq!(
            missing_home.unwrap_err(),
            SceneError::UnknownHomeBlock("nowhere".into())
        );
    }
}
