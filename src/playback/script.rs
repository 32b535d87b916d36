//! Scripted step sequences and tour generation.

use std::time::Duration;

use cgmath::{InnerSpace, Vector3, Zero};
use rand::Rng;

use crate::error::FocusError;
use crate::gfx::scene::{BlockId, FaceId, SceneGraph};

/// A face addressed either by id or by block and face name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaceRef {
    Id(FaceId),
    Named { block: String, face: String },
}

impl FaceRef {
    pub fn named(block: &str, face: &str) -> Self {
        Self::Named {
            block: block.to_string(),
            face: face.to_string(),
        }
    }

    pub fn resolve<S: SceneGraph + ?Sized>(&self, scene: &S) -> Result<FaceId, FocusError> {
        match self {
            FaceRef::Id(face) => scene
                .block_of(*face)
                .map(|_| *face)
                .ok_or(FocusError::UnknownFace(*face)),
            FaceRef::Named { block, face } => {
                scene
                    .face_named(block, face)
                    .ok_or_else(|| FocusError::UnknownFaceName {
                        block: block.clone(),
                        face: face.clone(),
                    })
            }
        }
    }
}

impl From<FaceId> for FaceRef {
    fn from(face: FaceId) -> Self {
        FaceRef::Id(face)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScriptStep {
    /// Wait while animations keep running.
    Pause(Duration),
    /// Select a face exactly as a live tap would.
    Select {
        face: FaceRef,
        distance: Option<f32>,
    },
    /// Move the cursor overlay to a face's projected screen position.
    Pointer(FaceRef),
}

/// An ordered list of steps run by a [`ScriptRunner`](super::ScriptRunner).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Script {
    pub steps: Vec<ScriptStep>,
}

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pause(mut self, duration: Duration) -> Self {
        self.steps.push(ScriptStep::Pause(duration));
        self
    }

    pub fn select(mut self, face: impl Into<FaceRef>) -> Self {
        self.steps.push(ScriptStep::Select {
            face: face.into(),
            distance: None,
        });
        self
    }

    pub fn select_at(mut self, face: impl Into<FaceRef>, distance: f32) -> Self {
        self.steps.push(ScriptStep::Select {
            face: face.into(),
            distance: Some(distance),
        });
        self
    }

    pub fn pointer(mut self, face: impl Into<FaceRef>) -> Self {
        self.steps.push(ScriptStep::Pointer(face.into()));
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Total time spent in pauses.
    pub fn paused_duration(&self) -> Duration {
        self.steps
            .iter()
            .map(|step| match step {
                ScriptStep::Pause(duration) => *duration,
                _ => Duration::ZERO,
            })
            .sum()
    }

    /// Recording tour: two well separated faces of a random non-home block,
    /// then back home. Returns `None` when no block has two faces.
    pub fn tour<S: SceneGraph + ?Sized, R: Rng + ?Sized>(scene: &S, rng: &mut R) -> Option<Self> {
        let blocks: Vec<BlockId> = scene
            .block_ids()
            .into_iter()
            .filter(|block| !scene.is_home(*block))
            .filter(|block| scene.faces_of(*block).is_some_and(|faces| faces.len() >= 2))
            .collect();
        if blocks.is_empty() {
            log::warn!("No block with two faces, tour not generated");
            return None;
        }

        let block = blocks[rng.random_range(0..blocks.len())];
        let (first, second) = most_separated_faces(scene, block)?;
        log::info!("Tour on {:?}: {:?} then {:?}", block, first, second);

        let mut script = Script::new()
            .pause(Duration::from_millis(800))
            .pointer(first)
            .pause(Duration::from_millis(400))
            .select(first)
            .pause(Duration::from_millis(2200))
            .pointer(second)
            .pause(Duration::from_millis(400))
            .select(second)
            .pause(Duration::from_millis(2200));

        let home_face = scene
            .home_block()
            .and_then(|home| scene.faces_of(home))
            .and_then(|faces| faces.first().copied());
        script = match home_face {
            Some(home) => script.pointer(home).pause(Duration::from_millis(400)).select(home),
            // Re-selecting the current face after the debounce window also resets.
            None => script.select(second),
        };
        Some(script.pause(Duration::from_millis(1800)))
    }
}

/// The pair of faces of `block` whose directions from the block's centroid
/// differ the most, scored by `1 - dot(a, b)`.
pub fn most_separated_faces<S: SceneGraph + ?Sized>(
    scene: &S,
    block: BlockId,
) -> Option<(FaceId, FaceId)> {
    let positions: Vec<(FaceId, Vector3<f32>)> = scene
        .faces_of(block)?
        .iter()
        .filter_map(|face| scene.face_world_position(*face).map(|p| (*face, p)))
        .collect();
    if positions.len() < 2 {
        return None;
    }

    let centroid = positions
        .iter()
        .fold(Vector3::zero(), |sum, (_, p)| sum + *p)
        / positions.len() as f32;
    let directions: Vec<(FaceId, Vector3<f32>)> = positions
        .iter()
        .map(|(face, p)| {
            let offset = *p - centroid;
            let direction = if offset.magnitude2() > f32::EPSILON {
                offset.normalize()
            } else {
                Vector3::zero()
            };
            (*face, direction)
        })
        .collect();

    let mut best: Option<(f32, FaceId, FaceId)> = None;
    for (i, (a, dir_a)) in directions.iter().enumerate() {
        for (b, dir_b) in &directions[i + 1..] {
            let score = 1.0 - dir_a.dot(*dir_b);
            match best {
                Some((top, _, _)) if score <= top => {}
                _ => best = Some((score, *a, *b)),
            }
        }
    }
    best.map(|(_, a, b)| (a, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::{Scene, SceneBuilder};
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn opposite_faces_are_most_separated() {
        let scene = SceneBuilder::new()
            .block("slab", Vector3::zero(), Vector3::new(1.0, 1.0, 1.0))
            .face("slab", "east", Vector3::new(1.0, 0.0, 0.0), Vector3::new(0.01, 0.5, 0.5))
            .face("slab", "north", Vector3::new(0.0, 0.0, -1.0), Vector3::new(0.5, 0.5, 0.01))
            .face("slab", "west", Vector3::new(-1.0, 0.0, 0.0), Vector3::new(0.01, 0.5, 0.5))
            .build()
            .unwrap();
        let block = scene.block_by_name("slab").unwrap();
        let (a, b) = most_separated_faces(&scene, block).unwrap();
        let name = |face: FaceId| scene.face(face).unwrap().name.as_str();
        let mut names = [name(a), name(b)];
        names.sort();
        assert_eq!(names, ["east", "west"]);
    }

    #[test]
    fn tour_is_deterministic_for_a_seed() {
        let scene = Scene::block_grid(3, 3, 2.0).unwrap();
        let first = Script::tour(&scene, &mut StdRng::seed_from_u64(7)).unwrap();
        let second = Script::tour(&scene, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn tour_visits_two_faces_of_one_block_then_home() {
        let scene = Scene::block_grid(3, 3, 2.0).unwrap();
        let script = Script::tour(&scene, &mut StdRng::seed_from_u64(42)).unwrap();
        let selected: Vec<FaceId> = script
            .steps
            .iter()
            .filter_map(|step| match step {
                ScriptStep::Select { face: FaceRef::Id(face), .. } => Some(*face),
                _ => None,
            })
            .collect();

        assert_eq!(selected.len(), 3);
        let block = scene.block_of(selected[0]).unwrap();
        assert_eq!(scene.block_of(selected[1]), Some(block));
        assert_ne!(selected[0], selected[1]);
        assert!(!scene.is_home(block));
        assert!(scene.is_home(scene.block_of(selected[2]).unwrap()));
        assert!(script.paused_duration() >= Duration::from_secs(7));
    }

    #[test]
    fn tour_needs_a_block_with_two_faces() {
        let scene = SceneBuilder::new()
            .block("single", Vector3::zero(), Vector3::new(1.0, 1.0, 1.0))
            .face("single", "top", Vector3::new(0.0, 1.0, 0.0), Vector3::new(0.5, 0.01, 0.5))
            .build()
            .unwrap();
        assert!(Script::tour(&scene, &mut StdRng::seed_from_u64(1)).is_none());
    }

    #[test]
    fn named_references_resolve_against_scene() {
        let scene = Scene::block_grid(2, 1, 2.0).unwrap();
        let face = FaceRef::named("home", "top").resolve(&scene).unwrap();
        assert_eq!(scene.face(face).unwrap().name, "top");
        assert_eq!(
            FaceRef::named("home", "roof").resolve(&scene),
            Err(FocusError::UnknownFaceName {
                block: "home".into(),
                face: "roof".into()
            })
        );
        assert_eq!(
            FaceRef::Id(FaceId(999)).resolve(&scene),
            Err(FocusError::UnknownFace(FaceId(999)))
        );
    }
}
