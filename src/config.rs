//! Generator configuration loaded from JSON

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};
use crate::material::MaterialLibrary;
use crate::procgen::fingerprint::FingerprintMode;
use crate::procgen::params::ParameterRanges;

/// Settings that stay fixed across regenerations of a tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// How regeneration requests are compared
    pub fingerprint_mode: FingerprintMode,
    /// Half-width of the leaf quad
    pub leaf_width: f32,
    /// Half-height of the leaf quad
    pub leaf_height: f32,
    /// Available material variants
    pub materials: MaterialLibrary,
    /// Ranges used when randomizing a tree
    pub ranges: ParameterRanges,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            fingerprint_mode: FingerprintMode::Additive,
            leaf_width: 1.0,
            leaf_height: 1.0,
            materials: MaterialLibrary::default(),
            ranges: ParameterRanges::default(),
        }
    }
}

impl GeneratorConfig {
    /// Parse and validate a JSON document; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::debug!("Loaded generator config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.leaf_width > 0.0 && self.leaf_height > 0.0) {
            return Err(Error::Config(format!(
                "leaf quad must have positive size, got {} x {}",
                self.leaf_width, self.leaf_height
            )));
        }
        let ranges = &self.ranges;
        if ranges.num_sides.0 < 3 || ranges.num_sides.0 >= ranges.num_sides.1 {
            return Err(Error::Config(format!(
                "num_sides range {:?} must start at 3 or more and not be empty",
                ranges.num_sides
            )));
        }
        if ranges.max_vertices.0 == 0 || ranges.max_vertices.0 >= ranges.max_vertices.1 {
            return Err(Error::Config(format!(
                "max_vertices range {:?} must be positive and not empty",
                ranges.max_vertices
            )));
        }
        if !(ranges.radius_step.0 > 0.0 && ranges.radius_step.1 < 1.0) {
            return Err(Error::Config(format!(
                "radius_step range {:?} must lie within (0, 1)",
                ranges.radius_step
            )));
        }
        if ranges.branch_tip_radius.0 <= 0.0 || ranges.branch_tip_radius.1 >= ranges.trunk_radius.0 {
            return Err(Error::Config(format!(
                "branch_tip_radius range {:?} must be positive and below trunk_radius range {:?}",
                ranges.branch_tip_radius, ranges.trunk_radius
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_valid() {
        GeneratorConfig::default().validate().unwrap();
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = GeneratorConfig::from_json(
            r#"{ "fingerprint_mode": "Structural", "materials": { "leaf_variants": 3 } }"#,
        )
        .unwrap();
        assert_eq!(config.fingerprint_mode, FingerprintMode::Structural);
        assert_eq!(config.materials.leaf_variants, 3);
        assert_eq!(config.materials.bark_variants, 18);
        assert_eq!(config.leaf_width, 1.0);
    }

    #[test]
    fn test_rejects_bad_leaf_size() {
        let err = GeneratorConfig::from_json(r#"{ "leaf_width": 0.0 }"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_rejects_bad_ranges() {
        let err = GeneratorConfig::from_json(r#"{ "ranges": { "num_sides": [2, 8] } }"#)
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "leaf_height": 0.5 }}"#).unwrap();
        let config = GeneratorConfig::load(file.path()).unwrap();
        assert_eq!(config.leaf_height, 0.5);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = GeneratorConfig::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
