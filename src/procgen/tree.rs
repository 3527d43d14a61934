//! Procedural tree built from rings of vertices grown along branching paths
//!
//! A [`Tree`] owns everything that survives between regenerations:
//! - the mesh buffers and finalized mesh
//! - the leaf pool (records are reused, never freed)
//! - the fingerprint of the last generated parameter set
//!
//! One generation pass: reseed the stream from the parameters, derive the ring
//! shape, grow all branches, finalize normals and bounds. The caller's stream
//! position is restored afterwards.

use crate::config::GeneratorConfig;
use crate::core::Result;
use crate::material::MaterialResolver;
use crate::mesh::{LeafPool, LeafQuad, LeafRecord, MeshBuffers, TreeMesh};
use crate::procgen::fingerprint::{ChangeDetector, Fingerprint};
use crate::procgen::grower::{BranchGrower, GrowthStats};
use crate::procgen::params::TreeParameters;
use crate::procgen::ring::RingShape;
use crate::procgen::rng::RandomStream;
use crate::sink::MeshSink;

/// Summary of one completed generation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationStats {
    pub vertices: usize,
    pub triangles: usize,
    pub growth: GrowthStats,
}

/// Outcome of [`Tree::regenerate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regeneration {
    /// Fingerprint matched the last pass; nothing was touched
    Unchanged,
    Generated(GenerationStats),
}

/// A regenerable procedural tree
pub struct Tree {
    detector: ChangeDetector,
    params: Option<TreeParameters>,
    ring_shape: RingShape,
    buffers: MeshBuffers,
    leaves: LeafPool,
    mesh: Option<TreeMesh>,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new(&GeneratorConfig::default())
    }
}

impl Tree {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            detector: ChangeDetector::new(config.fingerprint_mode),
            params: None,
            ring_shape: RingShape::default(),
            buffers: MeshBuffers::new(),
            leaves: LeafPool::new(LeafQuad::new(config.leaf_width, config.leaf_height)),
            mesh: None,
        }
    }

    /// Regenerate unless `params` fingerprint like the last pass and a mesh exists
    pub fn regenerate(
        &mut self,
        params: &TreeParameters,
        rng: &mut RandomStream,
        materials: &dyn MaterialResolver,
    ) -> Result<Regeneration> {
        params.validate()?;
        let fingerprint = self.detector.fingerprint(params);
        if self.detector.is_noop(fingerprint, self.mesh.is_some()) {
            log::trace!("Tree parameters unchanged ({:#x}), skipping", fingerprint.value());
            return Ok(Regeneration::Unchanged);
        }
        let stats = self.run_pass(params, rng, materials);
        self.detector.commit(fingerprint);
        Ok(Regeneration::Generated(stats))
    }

    /// Generate unconditionally, bypassing the fingerprint check
    pub fn generate(
        &mut self,
        params: &TreeParameters,
        rng: &mut RandomStream,
        materials: &dyn MaterialResolver,
    ) -> Result<GenerationStats> {
        params.validate()?;
        let fingerprint = self.detector.fingerprint(params);
        let stats = self.run_pass(params, rng, materials);
        self.detector.commit(fingerprint);
        Ok(stats)
    }

    fn run_pass(
        &mut self,
        params: &TreeParameters,
        rng: &mut RandomStream,
        materials: &dyn MaterialResolver,
    ) -> GenerationStats {
        let incoming = rng.snapshot();

        self.buffers.clear();
        self.leaves.clear_leaves();

        rng.reseed(params.seed as u64);
        self.ring_shape
            .regenerate(params.num_sides, params.branch_roundness, rng);

        let growth = BranchGrower::new(
            params,
            &self.ring_shape,
            &mut self.buffers,
            &mut self.leaves,
            materials,
            rng,
        )
        .grow();

        rng.restore(incoming);

        let mesh = self.buffers.finalize();
        let stats = GenerationStats {
            vertices: mesh.vertex_count(),
            triangles: mesh.triangle_count(),
            growth,
        };
        log::debug!(
            "Generated tree (seed {}): {} vertices, {} triangles, {} rings, {} forks, {} leaves",
            params.seed,
            stats.vertices,
            stats.triangles,
            growth.rings,
            growth.forks,
            growth.leaves
        );

        self.mesh = Some(mesh);
        self.params = Some(params.clone());
        stats
    }

    /// Push the current mesh and active leaves to `sink`; false if nothing was generated yet
    pub fn submit(&self, sink: &mut dyn MeshSink) -> bool {
        let Some(mesh) = &self.mesh else {
            return false;
        };
        sink.upload_tree(mesh);
        let active: Vec<LeafRecord> = self.leaves.active().copied().collect();
        sink.upload_leaves(self.leaves.quad(), &active);
        true
    }

    pub fn mesh(&self) -> Option<&TreeMesh> {
        self.mesh.as_ref()
    }

    pub fn leaves(&self) -> &LeafPool {
        &self.leaves
    }

    /// Parameters of the last generated pass
    pub fn parameters(&self) -> Option<&TreeParameters> {
        self.params.as_ref()
    }

    pub fn fingerprint(&self) -> Option<Fingerprint> {
        self.detector.last()
    }

    pub fn ring_shape(&self) -> &RingShape {
        &self.ring_shape
    }
}
