//! Material categories and the resolver seam to the host's resource loader

use serde::{Deserialize, Serialize};

use crate::procgen::rng::RandomStream;

/// Kind of surface a material is requested for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialCategory {
    Bark,
    Leaf,
    /// Ground platform the tree stands on
    Grass,
}

impl MaterialCategory {
    /// Name stem of the category's variants ("bark7", "leaves3", ...)
    pub fn stem(self) -> &'static str {
        match self {
            MaterialCategory::Bark => "bark",
            MaterialCategory::Leaf => "leaves",
            MaterialCategory::Grass => "grass",
        }
    }
}

/// Opaque renderable material handed out by a [`MaterialResolver`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialHandle(pub u64);

/// Resolves material variants to handles; resource loading lives with the host
pub trait MaterialResolver {
    /// Number of variants available, addressed by 1-based index
    fn variant_count(&self, category: MaterialCategory) -> u32;

    /// Handle for variant `index` (1-based) of `category`
    fn resolve(&self, category: MaterialCategory, index: u32) -> MaterialHandle;
}

/// Pick a uniformly random variant of `category`, one stream draw
pub fn pick_random(
    resolver: &dyn MaterialResolver,
    category: MaterialCategory,
    rng: &mut RandomStream,
) -> MaterialHandle {
    let count = resolver.variant_count(category).max(1);
    let index = rng.range_int(1, count as i32 + 1) as u32;
    resolver.resolve(category, index)
}

/// Variant counts of the bundled material sets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialLibrary {
    pub bark_variants: u32,
    pub leaf_variants: u32,
    pub grass_variants: u32,
}

impl Default for MaterialLibrary {
    fn default() -> Self {
        Self {
            bark_variants: 18,
            leaf_variants: 14,
            grass_variants: 11,
        }
    }
}

impl MaterialLibrary {
    /// Variant name such as `bark7`
    pub fn variant_name(category: MaterialCategory, index: u32) -> String {
        format!("{}{}", category.stem(), index)
    }

    /// Recover category and index from a handle issued by this library
    pub fn decode(handle: MaterialHandle) -> Option<(MaterialCategory, u32)> {
        let category = match handle.0 >> 32 {
            0 => MaterialCategory::Bark,
            1 => MaterialCategory::Leaf,
            2 => MaterialCategory::Grass,
            _ => return None,
        };
        Some((category, handle.0 as u32))
    }
}

impl MaterialResolver for MaterialLibrary {
    fn variant_count(&self, category: MaterialCategory) -> u32 {
        match category {
            MaterialCategory::Bark => self.bark_variants,
            MaterialCategory::Leaf => self.leaf_variants,
            MaterialCategory::Grass => self.grass_variants,
        }
    }

    fn resolve(&self, category: MaterialCategory, index: u32) -> MaterialHandle {
        let tag: u64 = match category {
            MaterialCategory::Bark => 0,
            MaterialCategory::Leaf => 1,
            MaterialCategory::Grass => 2,
        };
        MaterialHandle((tag << 32) | index as u64)
    }
}

/// Bark and ground materials chosen together for a freshly randomized tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceMaterials {
    pub bark: MaterialHandle,
    pub platform: MaterialHandle,
}

impl SurfaceMaterials {
    /// Draw bark then grass, one draw each
    pub fn random(rng: &mut RandomStream, resolver: &dyn MaterialResolver) -> Self {
        let bark = pick_random(resolver, MaterialCategory::Bark, rng);
        let platform = pick_random(resolver, MaterialCategory::Grass, rng);
        Self { bark, platform }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_round_trips_handles() {
        let library = MaterialLibrary::default();
        let handle = library.resolve(MaterialCategory::Grass, 4);
        assert_eq!(MaterialLibrary::decode(handle), Some((MaterialCategory::Grass, 4)));
        assert_eq!(MaterialLibrary::decode(MaterialHandle(9 << 32)), None);
    }

    #[test]
    fn test_pick_random_within_variants() {
        let library = MaterialLibrary::default();
        let mut rng = RandomStream::new(31);
        for _ in 0..500 {
            let handle = pick_random(&library, MaterialCategory::Leaf, &mut rng);
            let (category, index) = MaterialLibrary::decode(handle).unwrap();
            assert_eq!(category, MaterialCategory::Leaf);
            assert!((1..=14).contains(&index));
        }
    }

    #[test]
    fn test_pick_random_with_no_variants() {
        let library = MaterialLibrary { bark_variants: 0, ..Default::default() };
        let mut rng = RandomStream::new(2);
        let handle = pick_random(&library, MaterialCategory::Bark, &mut rng);
        assert_eq!(MaterialLibrary::decode(handle), Some((MaterialCategory::Bark, 1)));
    }

    #[test]
    fn test_surface_materials_categories() {
        let library = MaterialLibrary::default();
        let mut rng = RandomStream::new(12);
        let surfaces = SurfaceMaterials::random(&mut rng, &library);
        assert_eq!(MaterialLibrary::decode(surfaces.bark).unwrap().0, MaterialCategory::Bark);
        assert_eq!(MaterialLibrary::decode(surfaces.platform).unwrap().0, MaterialCategory::Grass);
    }

    #[test]
    fn test_variant_name() {
        assert_eq!(MaterialLibrary::variant_name(MaterialCategory::Leaf, 3), "leaves3");
    }
}
