//! # Surface Picking System
//!
//! Ray-casts a screen position into the scene and reports every surface the
//! ray crosses, nearest first. The gesture classifier decides what to do with
//! that list; picking itself never filters occluders.
//!
//! ## How it works
//!
//! 1. **Screen to Ray**: Convert pointer coordinates to a world-space ray
//! 2. **Ray-Box Intersection**: Test the ray against every face slab and every structural body
//! 3. **Ordering**: Return all hits sorted by distance along the ray
//!
//! ## Usage
//!
//! ```rust
//! use cgmath::Vector3;
//! use facet_focus::gfx::camera::{CameraPose, OrbitCamera};
//! use facet_focus::gfx::picking::ObjectPicker;
//! use facet_focus::gfx::scene::Scene;
//!
//! let scene = Scene::block_grid(1, 1, 2.0).unwrap();
//! let camera = OrbitCamera::new(
//!     CameraPose::new(0.0, std::f32::consts::FRAC_PI_2, 8.0, Vector3::new(0.0, 0.0, 0.0), 0.8),
//!     1.0,
//! );
//! let hits = ObjectPicker::new().pick_surfaces((400.0, 400.0), (800.0, 800.0), &camera, &scene);
//! assert!(!hits.is_empty());
//! ```

use cgmath::{
    ElementWise, EuclideanSpace, InnerSpace, Matrix4, SquareMatrix, Vector3, Vector4, Zero,
};

use crate::gfx::{
    camera::orbit_camera::OrbitCamera,
    scene::{Scene, Surface},
};

/// Structural bodies are shrunk slightly so face slabs win ties on their own side.
const BODY_INSET: f32 = 0.98;

/// A 3D ray for intersection testing
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Ray origin point in world space
    pub origin: Vector3<f32>,
    /// Ray direction (normalized)
    pub direction: Vector3<f32>,
}

impl Ray {
    /// Create a new ray
    pub fn new(origin: Vector3<f32>, direction: Vector3<f32>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }
}

/// Axis-aligned bounding box for intersection testing
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy)]
pub struct AABB {
    /// Minimum corner of the bounding box
    pub min: Vector3<f32>,
    /// Maximum corner of the bounding box
    pub max: Vector3<f32>,
}

impl AABB {
    /// Create a new AABB
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    pub fn from_center(center: Vector3<f32>, half_extents: Vector3<f32>) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    /// Create AABB from a set of vertices
    pub fn from_vertices(vertices: &[[f32; 3]]) -> Self {
        if vertices.is_empty() {
            return Self::new(Vector3::zero(), Vector3::zero());
        }

        let mut min = Vector3::new(vertices[0][0], vertices[0][1], vertices[0][2]);
        let mut max = min;

        for vertex in vertices.iter().skip(1) {
            let v = Vector3::new(vertex[0], vertex[1], vertex[2]);
            min.x = min.x.min(v.x);
            min.y = min.y.min(v.y);
            min.z = min.z.min(v.z);
            max.x = max.x.max(v.x);
            max.y = max.y.max(v.y);
            max.z = max.z.max(v.z);
        }

        Self::new(min, max)
    }

    /// Test ray-AABB intersection
    /// Returns the distance to intersection point, or None if no intersection
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let inv_dir = Vector3::new(
            1.0 / ray.direction.x,
            1.0 / ray.direction.y,
            1.0 / ray.direction.z,
        );

        let t_min = (self.min - ray.origin).mul_element_wise(inv_dir);
        let t_max = (self.max - ray.origin).mul_element_wise(inv_dir);

        let t1 = Vector3::new(
            t_min.x.min(t_max.x),
            t_min.y.min(t_max.y),
            t_min.z.min(t_max.z),
        );
        let t2 = Vector3::new(
            t_min.x.max(t_max.x),
            t_min.y.max(t_max.y),
            t_min.z.max(t_max.z),
        );

        let t_near = t1.x.max(t1.y.max(t1.z));
        let t_far = t2.x.min(t2.y.min(t2.z));

        if t_near <= t_far && t_far >= 0.0 {
            Some(if t_near >= 0.0 { t_near } else { t_far })
        } else {
            None
        }
    }

    /// Apply a transformation matrix to the AABB
    pub fn transform(&self, matrix: &Matrix4<f32>) -> Self {
        // Transform all 8 corners of the AABB and compute new bounds
        let corners = [
            Vector3::new(self.min.x, self.min.y, self.min.z),
            Vector3::new(self.max.x, self.min.y, self.min.z),
            Vector3::new(self.min.x, self.max.y, self.min.z),
            Vector3::new(self.min.x, self.min.y, self.max.z),
            Vector3::new(self.max.x, self.max.y, self.min.z),
            Vector3::new(self.max.x, self.min.y, self.max.z),
            Vector3::new(self.min.x, self.max.y, self.max.z),
            Vector3::new(self.max.x, self.max.y, self.max.z),
        ];

        let transformed_corners: Vec<[f32; 3]> = corners
            .iter()
            .map(|corner| {
                let transformed = matrix * Vector4::new(corner.x, corner.y, corner.z, 1.0);
                [
                    transformed.x / transformed.w,
                    transformed.y / transformed.w,
                    transformed.z / transformed.w,
                ]
            })
            .collect();

        Self::from_vertices(&transformed_corners)
    }
}

/// One surface crossed by a pick ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitCandidate {
    pub surface: Surface,
    /// Distance from the ray origin to the intersection.
    pub distance: f32,
}

impl HitCandidate {
    pub fn new(surface: Surface, distance: f32) -> Self {
        Self { surface, distance }
    }
}

/// Surface picker for pointer selection
#[derive(Debug, Default)]
pub struct ObjectPicker;

impl ObjectPicker {
    /// Create a new surface picker
    pub fn new() -> Self {
        Self
    }

    /// Convert screen coordinates to a world-space ray
    pub fn screen_to_ray(
        &self,
        screen_pos: (f32, f32),
        screen_size: (f32, f32),
        camera: &OrbitCamera,
    ) -> Ray {
        let (mouse_x, mouse_y) = screen_pos;
        let (screen_width, screen_height) = screen_size;

        // Convert screen coordinates to normalized device coordinates (-1 to 1)
        let ndc_x = (2.0 * mouse_x) / screen_width - 1.0;
        let ndc_y = 1.0 - (2.0 * mouse_y) / screen_height; // Flip Y axis

        let eye = cgmath::Point3::from_vec(camera.eye);
        let target = cgmath::Point3::from_vec(camera.target);
        let view_matrix = Matrix4::look_at_rh(eye, target, camera.up);
        let proj_matrix =
            cgmath::perspective(camera.fovy, camera.aspect, camera.znear, camera.zfar);

        let inv_view_proj = (proj_matrix * view_matrix)
            .invert()
            .unwrap_or(Matrix4::from_scale(1.0));

        let world_near = inv_view_proj * Vector4::new(ndc_x, ndc_y, -1.0, 1.0);
        let world_far = inv_view_proj * Vector4::new(ndc_x, ndc_y, 1.0, 1.0);

        let near_3d = world_near.truncate() / world_near.w;
        let far_3d = world_far.truncate() / world_far.w;

        Ray::new(near_3d, far_3d - near_3d)
    }

    /// Every face and structural body under the pointer, nearest first.
    pub fn pick_surfaces(
        &self,
        screen_pos: (f32, f32),
        screen_size: (f32, f32),
        camera: &OrbitCamera,
        scene: &Scene,
    ) -> Vec<HitCandidate> {
        let ray = self.screen_to_ray(screen_pos, screen_size, camera);
        self.cast(&ray, scene)
    }

    /// Intersect a world-space ray with the scene, nearest first.
    pub fn cast(&self, ray: &Ray, scene: &Scene) -> Vec<HitCandidate> {
        let mut hits = Vec::new();

        for block in &scene.blocks {
            let Some(model) = scene.block_model_matrix(block.id) else {
                continue;
            };

            let body = AABB::from_center(Vector3::zero(), block.half_extents * BODY_INSET);
            if let Some(distance) = body.transform(&model).intersect_ray(ray) {
                hits.push(HitCandidate::new(Surface::Structural(block.id), distance));
            }

            for face_id in &block.faces {
                let Some(face) = scene.face(*face_id) else {
                    continue;
                };
                let slab = AABB::from_center(face.local_center, face.half_extents);
                if let Some(distance) = slab.transform(&model).intersect_ray(ray) {
                    hits.push(HitCandidate::new(Surface::Face(face.id), distance));
                }
            }
        }

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::orbit_camera::CameraPose;
    use crate::gfx::scene::SceneBuilder;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_aabb_creation() {
        let vertices = vec![[0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [-1.0, -1.0, -1.0]];
        let aabb = AABB::from_vertices(&vertices);

        assert_eq!(aabb.min, Vector3::new(-1.0, -1.0, -1.0));
        assert_eq!(aabb.max, Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_ray_aabb_intersection() {
        let aabb = AABB::new(Vector3::new(-1.0, -1.0, -1.0), Vector3::new(1.0, 1.0, 1.0));

        // Ray hitting the box
        let ray = Ray::new(Vector3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(aabb.intersect_ray(&ray).is_some());

        // Ray missing the box
        let ray_miss = Ray::new(Vector3::new(5.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(aabb.intersect_ray(&ray_miss).is_none());
    }

    fn two_blocks_in_a_row() -> Scene {
        let half = Vector3::new(0.5, 0.5, 0.5);
        SceneBuilder::new()
            .cube_block("near", Vector3::new(0.0, 0.0, 2.0), half)
            .cube_block("far", Vector3::new(0.0, 0.0, -2.0), half)
            .build()
            .unwrap()
    }

    #[test]
    fn cast_orders_hits_by_distance() {
        let scene = two_blocks_in_a_row();
        let ray = Ray::new(Vector3::new(0.0, 0.0, 10.0), Vector3::new(0.0, 0.0, -1.0));
        let hits = ObjectPicker::new().cast(&ray, &scene);

        assert!(hits.windows(2).all(|w| w[0].distance <= w[1].distance));
        let near_front = scene.face_by_name("near", "front").unwrap();
        assert_eq!(hits[0].surface, Surface::Face(near_front));
        let far_front = scene.face_by_name("far", "front").unwrap();
        assert!(hits.iter().any(|h| h.surface == Surface::Face(far_front)));
    }

    #[test]
    fn center_of_screen_hits_the_target() {
        let scene = two_blocks_in_a_row();
        let camera = OrbitCamera::new(
            CameraPose::new(0.0, FRAC_PI_2, 10.0, Vector3::zero(), 0.8),
            1.0,
        );
        let hits =
            ObjectPicker::new().pick_surfaces((300.0, 300.0), (600.0, 600.0), &camera, &scene);
        let near_front = scene.face_by_name("near", "front").unwrap();
        assert_eq!(hits.first().map(|h| h.surface), Some(Surface::Face(near_front)));
    }

    #[test]
    fn corner_of_screen_misses_everything() {
        let scene = two_blocks_in_a_row();
        let camera = OrbitCamera::new(
            CameraPose::new(0.0, FRAC_PI_2, 10.0, Vector3::zero(), 0.8),
            1.0,
        );
        let hits = ObjectPicker::new().pick_surfaces((1.0, 1.0), (600.0, 600.0), &camera, &scene);
        assert!(hits.is_empty());
    }
}
