//! Arbor - procedural tree meshes with reusable leaf pools

pub mod core;
pub mod math;
pub mod procgen;
pub mod mesh;
pub mod material;
pub mod sink;
pub mod config;
