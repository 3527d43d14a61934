//! Cross-section profile shared by every ring of one tree

use crate::procgen::rng::RandomStream;

/// Per-side radius multipliers, `num_sides + 1` long with the last entry
/// repeating the first so the ring closes on itself
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RingShape {
    offsets: Vec<f32>,
}

impl RingShape {
    /// Rebuild the profile in place for `num_sides` sides
    ///
    /// Draws exactly `num_sides` values from `rng`. Roundness 1.0 yields a unit
    /// circle; lower roundness scatters each side within `±(1 - roundness) / 4`.
    pub fn regenerate(&mut self, num_sides: u32, roundness: f32, rng: &mut RandomStream) {
        let k = (1.0 - roundness) * 0.5;
        self.offsets.clear();
        self.offsets.reserve(num_sides as usize + 1);
        for _ in 0..num_sides {
            self.offsets.push(1.0 - (rng.uniform() - 0.5) * k);
        }
        let first = self.offsets.first().copied().unwrap_or(1.0);
        self.offsets.push(first);
    }

    /// Build a fresh profile
    pub fn generate(num_sides: u32, roundness: f32, rng: &mut RandomStream) -> Self {
        let mut shape = Self::default();
        shape.regenerate(num_sides, roundness, rng);
        shape
    }

    /// Number of sides the profile was built for
    pub fn num_sides(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    pub fn offsets(&self) -> &[f32] {
        &self.offsets
    }

    /// Multiplier for side `n` (`0..=num_sides`)
    pub fn get(&self, n: usize) -> f32 {
        self.offsets[n]
    }
}
