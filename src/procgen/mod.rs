//! Procedural tree generation
//!
//! Draw order within one pass is fixed: the ring shape consumes the first
//! `num_sides` values after the reseed, then growth and leaf placement draw in
//! work-list order. Changing that order changes every tree.

pub mod rng;
pub mod params;
pub mod ring;
pub mod grower;
pub mod fingerprint;
pub mod tree;

pub use rng::{RandomStream, StreamSnapshot};
pub use params::{ParameterRanges, TreeParameters};
pub use ring::RingShape;
pub use grower::{BranchGrower, GrowthStats};
pub use fingerprint::{ChangeDetector, Fingerprint, FingerprintMode};
pub use tree::{GenerationStats, Regeneration, Tree};
