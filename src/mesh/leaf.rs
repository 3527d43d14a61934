//! Leaf pool - bounded arena of leaf quads reused across regenerations
//!
//! Leaves are never freed while the tree lives:
//! - `clear_leaves` only deactivates records
//! - once the pool is as large as the leaf budget, new leaves reactivate the
//!   first inactive record instead of allocating

use crate::core::types::{Quat, Vec2, Vec3, Vec4};
use crate::material::{self, MaterialCategory, MaterialHandle, MaterialResolver};
use crate::procgen::rng::RandomStream;

/// Quad primitive shared by every leaf (4 vertices, 2 triangles)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeafQuad {
    pub vertices: [Vec3; 4],
    pub uvs: [Vec2; 4],
    pub triangles: [[u32; 3]; 2],
}

/// Leaf quads sit slightly in front of their pivot
const LEAF_DEPTH_OFFSET: f32 = 0.01;

impl LeafQuad {
    /// Quad spanning `±width` by `±height` in the leaf's local XY plane
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            vertices: [
                Vec3::new(-width, -height, LEAF_DEPTH_OFFSET),
                Vec3::new(width, -height, LEAF_DEPTH_OFFSET),
                Vec3::new(width, height, LEAF_DEPTH_OFFSET),
                Vec3::new(-width, height, LEAF_DEPTH_OFFSET),
            ],
            uvs: [
                Vec2::new(0.0, 0.0),
                Vec2::new(0.0, 1.0),
                Vec2::new(1.0, 1.0),
                Vec2::new(1.0, 0.0),
            ],
            triangles: [[0, 1, 2], [0, 2, 3]],
        }
    }
}

impl Default for LeafQuad {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

/// One pooled leaf
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeafRecord {
    pub position: Vec3,
    pub orientation: Quat,
    pub active: bool,
    pub material: MaterialHandle,
}

impl LeafRecord {
    /// World-space corners of `quad` placed at this leaf
    pub fn corners(&self, quad: &LeafQuad) -> [Vec3; 4] {
        quad.vertices.map(|v| self.position + self.orientation * v)
    }
}

/// Random unit quaternion from four uniform draws
fn random_orientation(rng: &mut RandomStream) -> Quat {
    let v = Vec4::new(rng.uniform(), rng.uniform(), rng.uniform(), rng.uniform());
    v.try_normalize().map(Quat::from_vec4).unwrap_or(Quat::IDENTITY)
}

/// Bounded, reusable collection of leaves
#[derive(Debug, Clone, Default)]
pub struct LeafPool {
    records: Vec<LeafRecord>,
    quad: LeafQuad,
    /// Leaves placed since the last `clear_leaves`
    grown: u32,
    /// Material shared by every leaf of the current pass
    material: Option<MaterialHandle>,
}

impl LeafPool {
    pub fn new(quad: LeafQuad) -> Self {
        Self {
            records: Vec::new(),
            quad,
            grown: 0,
            material: None,
        }
    }

    /// Place a leaf at `position` if the pass has leaf budget left
    ///
    /// Draws four values for the orientation and, for the first leaf of a pass,
    /// one more for the material. Returns the index of the record used.
    pub fn grow_leaf(
        &mut self,
        position: Vec3,
        max_leaves: u32,
        rng: &mut RandomStream,
        materials: &dyn MaterialResolver,
    ) -> Option<usize> {
        if self.grown >= max_leaves {
            return None;
        }

        let orientation = random_orientation(rng);
        let material = match self.material {
            Some(material) if self.grown > 0 => material,
            _ => {
                let picked = material::pick_random(materials, MaterialCategory::Leaf, rng);
                self.material = Some(picked);
                picked
            }
        };

        let record = LeafRecord {
            position,
            orientation,
            active: true,
            material,
        };

        let index = if self.records.len() < max_leaves as usize {
            self.records.push(record);
            self.records.len() - 1
        } else {
            let Some(index) = self.records.iter().position(|r| !r.active) else {
                log::warn!(
                    "Leaf pool exhausted: {} records all active, budget {}",
                    self.records.len(),
                    max_leaves
                );
                return None;
            };
            self.records[index] = record;
            index
        };

        self.grown += 1;
        Some(index)
    }

    /// Deactivate every leaf ahead of a regeneration, keeping the records
    pub fn clear_leaves(&mut self) {
        for record in &mut self.records {
            record.active = false;
        }
        self.grown = 0;
        self.material = None;
    }

    /// Leaves placed since the last clear
    pub fn grown(&self) -> u32 {
        self.grown
    }

    /// Material of the current pass, once a leaf has been placed
    pub fn material(&self) -> Option<MaterialHandle> {
        self.material
    }

    pub fn quad(&self) -> &LeafQuad {
        &self.quad
    }

    /// Every pooled record, active or not
    pub fn records(&self) -> &[LeafRecord] {
        &self.records
    }

    pub fn active(&self) -> impl Iterator<Item = &LeafRecord> {
        self.records.iter().filter(|r| r.active)
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    /// Total records allocated so far
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::MaterialLibrary;

    fn pool() -> LeafPool {
        LeafPool::new(LeafQuad::default())
    }

    #[test]
    fn test_quad_shape() {
        let quad = LeafQuad::new(0.5, 2.0);
        assert_eq!(quad.vertices[2], Vec3::new(0.5, 2.0, 0.01));
        assert_eq!(quad.triangles, [[0, 1, 2], [0, 2, 3]]);
    }

    #[test]
    fn test_grow_appends_until_budget() {
        let library = MaterialLibrary::default();
        let mut rng = RandomStream::new(1);
        let mut pool = pool();
        for i in 0..3 {
            let index = pool.grow_leaf(Vec3::splat(i as f32), 3, &mut rng, &library);
            assert_eq!(index, Some(i));
        }
        assert_eq!(pool.grow_leaf(Vec3::ZERO, 3, &mut rng, &library), None);
        assert_eq!(pool.len(), 3);
        assert_eq!(pool.active_count(), 3);
    }

    #[test]
    fn test_zero_budget_never_touches_pool() {
        let library = MaterialLibrary::default();
        let mut rng = RandomStream::new(1);
        let before = rng.clone();
        let mut pool = pool();
        for _ in 0..10 {
            assert_eq!(pool.grow_leaf(Vec3::ONE, 0, &mut rng, &library), None);
        }
        assert!(pool.is_empty());
        assert_eq!(rng, before, "no draws without leaf budget");
    }

    #[test]
    fn test_clear_then_reuse() {
        let library = MaterialLibrary::default();
        let mut rng = RandomStream::new(9);
        let mut pool = pool();
        for _ in 0..4 {
            pool.grow_leaf(Vec3::ZERO, 4, &mut rng, &library);
        }
        pool.clear_leaves();
        assert_eq!(pool.active_count(), 0);
        assert_eq!(pool.len(), 4, "clearing keeps capacity");

        let index = pool.grow_leaf(Vec3::new(1.0, 2.0, 3.0), 4, &mut rng, &library);
        assert_eq!(index, Some(0));
        assert_eq!(pool.len(), 4);
        assert_eq!(pool.records()[0].position, Vec3::new(1.0, 2.0, 3.0));
        assert!(pool.records()[0].active);
        assert_eq!(pool.active_count(), 1);
    }

    #[test]
    fn test_budget_shrink_reuses_first_inactive() {
        let library = MaterialLibrary::default();
        let mut rng = RandomStream::new(4);
        let mut pool = pool();
        for _ in 0..5 {
            pool.grow_leaf(Vec3::ZERO, 5, &mut rng, &library);
        }
        pool.clear_leaves();
        assert_eq!(pool.grow_leaf(Vec3::X, 2, &mut rng, &library), Some(0));
        assert_eq!(pool.grow_leaf(Vec3::Y, 2, &mut rng, &library), Some(1));
        assert_eq!(pool.grow_leaf(Vec3::Z, 2, &mut rng, &library), None);
        assert_eq!(pool.len(), 5);
        assert_eq!(pool.active_count(), 2);
    }

    #[test]
    fn test_material_shared_within_pass() {
        let library = MaterialLibrary::default();
        let mut rng = RandomStream::new(17);
        let mut pool = pool();
        for _ in 0..20 {
            pool.grow_leaf(Vec3::ZERO, 20, &mut rng, &library);
        }
        let first = pool.records()[0].material;
        assert!(pool.records().iter().all(|r| r.material == first));
        assert_eq!(pool.material(), Some(first));
        assert_eq!(MaterialLibrary::decode(first).unwrap().0, MaterialCategory::Leaf);
    }

    #[test]
    fn test_corners_follow_orientation() {
        let quad = LeafQuad::new(1.0, 1.0);
        let record = LeafRecord {
            position: Vec3::new(0.0, 5.0, 0.0),
            orientation: Quat::from_rotation_y(std::f32::consts::PI),
            active: true,
            material: MaterialHandle(0),
        };
        let corners = record.corners(&quad);
        assert!((corners[0] - Vec3::new(1.0, 4.0, -0.01)).length() < 1e-5);
    }

    #[test]
    fn test_orientation_is_unit() {
        let mut rng = RandomStream::new(3);
        for _ in 0..100 {
            let q = random_orientation(&mut rng);
            assert!((q.length() - 1.0).abs() < 1e-5);
        }
    }
}
