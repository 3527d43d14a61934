//! Hand-off of finished geometry to the host's renderer

use crate::mesh::{LeafQuad, LeafRecord, TreeMesh};

/// Consumer of finalized tree geometry (GPU upload, scene graph, ...)
pub trait MeshSink {
    /// Receive the finalized bark mesh
    fn upload_tree(&mut self, mesh: &TreeMesh);

    /// Receive the active leaves and the quad they all instance
    fn upload_leaves(&mut self, quad: &LeafQuad, leaves: &[LeafRecord]);
}
