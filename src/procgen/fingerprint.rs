//! Parameter fingerprints for skipping redundant regeneration

use serde::{Deserialize, Serialize};

use crate::procgen::params::TreeParameters;

/// How parameter sets are reduced to a fingerprint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FingerprintMode {
    /// Sum of all eleven parameters (low 16 seed bits). Cheap, but distinct
    /// parameter sets with equal sums collide and suppress a regeneration.
    #[default]
    Additive,
    /// FNV-1a over every field's bit pattern in declaration order
    Structural,
}

/// Scalar summary of a parameter set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint(u64);

const FNV_OFFSET: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

fn fnv_mix(mut h: u64, word: u32) -> u64 {
    for byte in word.to_le_bytes() {
        h ^= byte as u64;
        h = h.wrapping_mul(FNV_PRIME);
    }
    h
}

impl Fingerprint {
    pub fn of(params: &TreeParameters, mode: FingerprintMode) -> Self {
        match mode {
            FingerprintMode::Additive => Self::additive(params),
            FingerprintMode::Structural => Self::structural(params),
        }
    }

    pub fn additive(params: &TreeParameters) -> Self {
        let sum = (params.seed & 0xFFFF) as f64
            + params.num_sides as f64
            + params.segment_length as f64
            + params.trunk_radius as f64
            + params.max_vertices as f64
            + params.radius_step as f64
            + params.branch_tip_radius as f64
            + params.twist as f64
            + params.branch_probability as f64
            + params.branch_roundness as f64
            + params.max_leaves as f64;
        Self(sum.to_bits())
    }

    pub fn structural(params: &TreeParameters) -> Self {
        let words = [
            params.seed,
            params.max_vertices,
            params.num_sides,
            params.trunk_radius.to_bits(),
            params.radius_step.to_bits(),
            params.branch_tip_radius.to_bits(),
            params.branch_roundness.to_bits(),
            params.segment_length.to_bits(),
            params.twist.to_bits(),
            params.branch_probability.to_bits(),
            params.max_leaves,
        ];
        Self(words.into_iter().fold(FNV_OFFSET, fnv_mix))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Remembers the fingerprint of the last completed generation
#[derive(Debug, Clone, Default)]
pub struct ChangeDetector {
    mode: FingerprintMode,
    last: Option<Fingerprint>,
}

impl ChangeDetector {
    pub fn new(mode: FingerprintMode) -> Self {
        Self { mode, last: None }
    }

    pub fn fingerprint(&self, params: &TreeParameters) -> Fingerprint {
        Fingerprint::of(params, self.mode)
    }

    /// A request is a no-op when a mesh exists and the fingerprint is unchanged
    pub fn is_noop(&self, fingerprint: Fingerprint, mesh_exists: bool) -> bool {
        mesh_exists && self.last == Some(fingerprint)
    }

    /// Record a successful generation
    pub fn commit(&mut self, fingerprint: Fingerprint) {
        self.last = Some(fingerprint);
    }

    pub fn last(&self) -> Option<Fingerprint> {
        self.last
    }

    pub fn mode(&self) -> FingerprintMode {
        self.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two parameter sets whose sums are identical
    fn colliding_pair() -> (TreeParameters, TreeParameters) {
        let a = TreeParameters { num_sides: 6, max_leaves: 10, ..Default::default() };
        let b = TreeParameters { num_sides: 7, max_leaves: 9, ..Default::default() };
        (a, b)
    }

    #[test]
    fn test_same_params_same_fingerprint() {
        let params = TreeParameters::default();
        for mode in [FingerprintMode::Additive, FingerprintMode::Structural] {
            assert_eq!(Fingerprint::of(&params, mode), Fingerprint::of(&params.clone(), mode));
        }
    }

    #[test]
    fn test_additive_ignores_high_seed_bits() {
        let a = TreeParameters { seed: 0x0001_0005, ..Default::default() };
        let b = TreeParameters { seed: 0x0000_0005, ..Default::default() };
        assert_eq!(Fingerprint::additive(&a), Fingerprint::additive(&b));
        assert_ne!(Fingerprint::structural(&a), Fingerprint::structural(&b));
    }

    #[test]
    fn test_additive_collides_structural_does_not() {
        let (a, b) = colliding_pair();
        assert_eq!(Fingerprint::additive(&a), Fingerprint::additive(&b));
        assert_ne!(Fingerprint::structural(&a), Fingerprint::structural(&b));
    }

    #[test]
    fn test_single_field_change_detected() {
        let base = TreeParameters::default();
        let changed = TreeParameters { twist: 25.0, ..base.clone() };
        for mode in [FingerprintMode::Additive, FingerprintMode::Structural] {
            assert_ne!(Fingerprint::of(&base, mode), Fingerprint::of(&changed, mode));
        }
    }

    #[test]
    fn test_detector_requires_mesh() {
        let mut detector = ChangeDetector::new(FingerprintMode::Additive);
        let fp = detector.fingerprint(&TreeParameters::default());
        assert!(!detector.is_noop(fp, true));
        detector.commit(fp);
        assert!(detector.is_noop(fp, true));
        assert!(!detector.is_noop(fp, false));
        assert_eq!(detector.last(), Some(fp));
    }
}
