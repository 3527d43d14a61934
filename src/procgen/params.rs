//! Tree parameter set, validation, and control-panel ranges

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};
use crate::procgen::rng::RandomStream;

/// Parameters for one generation pass
///
/// A value of this type is an immutable snapshot: the tree copies it on every
/// regeneration and never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeParameters {
    /// Seed the whole pass is derived from
    pub seed: u32,
    /// Vertex budget for the bark mesh
    pub max_vertices: u32,
    /// Sides per ring (at least 3)
    pub num_sides: u32,
    /// Radius of the first ring at the trunk base
    pub trunk_radius: f32,
    /// Per-ring radius multiplier, in (0, 1)
    pub radius_step: f32,
    /// Branches end once their radius drops below this
    pub branch_tip_radius: f32,
    /// 1.0 gives circular rings, 0.0 the most irregular ones
    pub branch_roundness: f32,
    /// Distance between consecutive rings
    pub segment_length: f32,
    /// Maximum random bend per segment, in degrees
    pub twist: f32,
    /// Chance of a side branch at each segment
    pub branch_probability: f32,
    /// Leaf budget per pass
    pub max_leaves: u32,
}

impl Default for TreeParameters {
    fn default() -> Self {
        Self {
            seed: 0,
            max_vertices: 65000,
            num_sides: 16,
            trunk_radius: 2.0,
            radius_step: 0.9,
            branch_tip_radius: 0.02,
            branch_roundness: 0.8,
            segment_length: 0.5,
            twist: 20.0,
            branch_probability: 0.1,
            max_leaves: 2000,
        }
    }
}

fn check_finite(name: &'static str, value: f32) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::invalid(name, format!("must be finite, got {}", value)))
    }
}

fn check_unit(name: &'static str, value: f32) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::invalid(name, format!("must be within [0, 1], got {}", value)))
    }
}

impl TreeParameters {
    /// Same parameters with a different seed
    pub fn with_seed(&self, seed: u32) -> Self {
        Self { seed, ..self.clone() }
    }

    /// Parse parameters from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    /// Reject parameter sets growth is not guaranteed to terminate for
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("trunk_radius", self.trunk_radius),
            ("radius_step", self.radius_step),
            ("branch_tip_radius", self.branch_tip_radius),
            ("branch_roundness", self.branch_roundness),
            ("segment_length", self.segment_length),
            ("twist", self.twist),
            ("branch_probability", self.branch_probability),
        ] {
            check_finite(name, value)?;
        }

        if self.max_vertices == 0 {
            return Err(Error::invalid("max_vertices", "must be greater than 0"));
        }
        if self.num_sides < 3 {
            return Err(Error::invalid(
                "num_sides",
                format!("must be at least 3, got {}", self.num_sides),
            ));
        }
        if self.trunk_radius <= 0.0 {
            return Err(Error::invalid(
                "trunk_radius",
                format!("must be positive, got {}", self.trunk_radius),
            ));
        }
        if !(self.radius_step > 0.0 && self.radius_step < 1.0) {
            return Err(Error::invalid(
                "radius_step",
                format!("must be within (0, 1), got {}", self.radius_step),
            ));
        }
        if self.branch_tip_radius <= 0.0 || self.branch_tip_radius >= self.trunk_radius {
            return Err(Error::invalid(
                "branch_tip_radius",
                format!(
                    "must be within (0, trunk_radius = {}), got {}",
                    self.trunk_radius, self.branch_tip_radius
                ),
            ));
        }
        check_unit("branch_roundness", self.branch_roundness)?;
        if self.segment_length <= 0.0 {
            return Err(Error::invalid(
                "segment_length",
                format!("must be positive, got {}", self.segment_length),
            ));
        }
        if self.twist < 0.0 {
            return Err(Error::invalid(
                "twist",
                format!("must not be negative, got {}", self.twist),
            ));
        }
        check_unit("branch_probability", self.branch_probability)?;
        Ok(())
    }
}

/// Inclusive value ranges offered by the parameter control panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterRanges {
    pub max_vertices: (u32, u32),
    pub num_sides: (u32, u32),
    pub max_leaves: (u32, u32),
    pub trunk_radius: (f32, f32),
    pub radius_step: (f32, f32),
    pub branch_tip_radius: (f32, f32),
    pub branch_roundness: (f32, f32),
    pub segment_length: (f32, f32),
    pub twist: (f32, f32),
    pub branch_probability: (f32, f32),
}

impl Default for ParameterRanges {
    fn default() -> Self {
        Self {
            max_vertices: (1024, 65000),
            num_sides: (3, 32),
            max_leaves: (0, 2000),
            trunk_radius: (0.25, 4.0),
            radius_step: (0.82, 0.95),
            branch_tip_radius: (0.01, 0.1),
            branch_roundness: (0.0, 1.0),
            segment_length: (0.35, 0.75),
            twist: (0.0, 40.0),
            branch_probability: (0.065, 0.25),
        }
    }
}

/// Seeds are drawn from `[0, SEED_RANGE)`
pub const SEED_RANGE: i32 = 65536;

fn draw_u32(rng: &mut RandomStream, (min, max): (u32, u32)) -> u32 {
    let min = min.min(i32::MAX as u32) as i32;
    let max = max.min(i32::MAX as u32) as i32;
    rng.range_int(min, max) as u32
}

fn draw_f32(rng: &mut RandomStream, (min, max): (f32, f32)) -> f32 {
    rng.range(min, max)
}

impl ParameterRanges {
    /// Draw a fresh random seed
    pub fn random_seed(&self, rng: &mut RandomStream) -> u32 {
        rng.range_int(0, SEED_RANGE) as u32
    }

    /// Draw an entirely random parameter set within these ranges
    ///
    /// Integer upper bounds are exclusive, float bounds half-open.
    pub fn random_parameters(&self, rng: &mut RandomStream) -> TreeParameters {
        TreeParameters {
            seed: self.random_seed(rng),
            max_vertices: draw_u32(rng, self.max_vertices),
            num_sides: draw_u32(rng, self.num_sides),
            trunk_radius: draw_f32(rng, self.trunk_radius),
            radius_step: draw_f32(rng, self.radius_step),
            branch_tip_radius: draw_f32(rng, self.branch_tip_radius),
            branch_roundness: draw_f32(rng, self.branch_roundness),
            segment_length: draw_f32(rng, self.segment_length),
            twist: draw_f32(rng, self.twist),
            branch_probability: draw_f32(rng, self.branch_probability),
            max_leaves: draw_u32(rng, self.max_leaves),
        }
    }
}
