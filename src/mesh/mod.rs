//! Mesh assembly: bark buffers and the leaf pool

pub mod buffers;
pub mod leaf;

pub use buffers::{MeshBuffers, TreeMesh, TreeVertex};
pub use leaf::{LeafPool, LeafQuad, LeafRecord};
