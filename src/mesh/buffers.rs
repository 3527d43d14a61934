//! Growing mesh buffers and the finalized tree mesh

use bytemuck::{Pod, Zeroable};

use crate::core::types::{Vec2, Vec3};
use crate::math::Aabb;

/// Vertex, UV and triangle buffers filled during a generation pass
///
/// The buffers keep their allocation across [`clear`](Self::clear) so that
/// regenerating a tree of similar size does not reallocate.
#[derive(Debug, Clone, Default)]
pub struct MeshBuffers {
    vertices: Vec<Vec3>,
    uvs: Vec<Vec2>,
    triangles: Vec<[u32; 3]>,
}

impl MeshBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty all three buffers, keeping capacity
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.uvs.clear();
        self.triangles.clear();
    }

    /// Append a vertex and its UV, returning the new vertex index
    pub fn push_vertex(&mut self, position: Vec3, uv: Vec2) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(position);
        self.uvs.push(uv);
        index
    }

    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        debug_assert!(
            (a.max(b).max(c) as usize) < self.vertices.len(),
            "triangle references a vertex that does not exist"
        );
        self.triangles.push([a, b, c]);
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn uvs(&self) -> &[Vec2] {
        &self.uvs
    }

    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Compute normals and bounds, producing an immutable mesh
    pub fn finalize(&self) -> TreeMesh {
        TreeMesh {
            vertices: self.vertices.clone(),
            uvs: self.uvs.clone(),
            triangles: self.triangles.clone(),
            normals: compute_normals(&self.vertices, &self.triangles),
            bounds: Aabb::from_points(self.vertices.iter().copied()).unwrap_or_default(),
        }
    }
}

/// Per-vertex normals as the normalized sum of adjacent unit face normals
///
/// Degenerate faces contribute nothing; vertices without a usable face get a
/// zero normal.
pub fn compute_normals(vertices: &[Vec3], triangles: &[[u32; 3]]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; vertices.len()];
    for &[a, b, c] in triangles {
        let (pa, pb, pc) = (
            vertices[a as usize],
            vertices[b as usize],
            vertices[c as usize],
        );
        let Some(face) = (pb - pa).cross(pc - pa).try_normalize() else {
            continue;
        };
        normals[a as usize] += face;
        normals[b as usize] += face;
        normals[c as usize] += face;
    }
    for n in &mut normals {
        *n = n.normalize_or_zero();
    }
    normals
}

/// Interleaved vertex layout for GPU upload
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct TreeVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Finalized bark mesh, ready to hand to a [`MeshSink`](crate::sink::MeshSink)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeMesh {
    pub vertices: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub triangles: Vec<[u32; 3]>,
    pub normals: Vec<Vec3>,
    pub bounds: Aabb,
}

impl TreeMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Position, normal and UV zipped into one vertex stream
    pub fn interleaved(&self) -> Vec<TreeVertex> {
        self.vertices
            .iter()
            .zip(&self.normals)
            .zip(&self.uvs)
            .map(|((p, n), uv)| TreeVertex {
                position: p.to_array(),
                normal: n.to_array(),
                uv: uv.to_array(),
            })
            .collect()
    }

    /// Flat triangle index list
    pub fn indices(&self) -> &[u32] {
        bytemuck::cast_slice(&self.triangles)
    }
}
