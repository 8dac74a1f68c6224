//! Material Policy: which voxels a tunnel may hollow out.

use delve_voxel::{VoxelTypeId, VoxelTypeRegistry};

use crate::biome::BiomeMaterials;

/// Materials carved regardless of biome.
const ALWAYS_CARVEABLE: [&str; 4] = ["hardened_clay", "sandstone", "red_sandstone", "snow"];

const LIQUID: u8 = 0b001;
const FALLS: u8 = 0b010;
const BOUNDARY: u8 = 0b100;

/// Per-material flags snapshotted from a [`VoxelTypeRegistry`].
#[derive(Clone, Debug)]
pub struct MaterialPolicy {
    /// Flag bits indexed by `VoxelTypeId.0`.
    flags: Vec<u8>,
    always_carveable: Vec<VoxelTypeId>,
}

impl MaterialPolicy {
    /// Builds the policy from a registry. Allow-list names missing from the
    /// registry are ignored.
    pub fn from_registry(registry: &VoxelTypeRegistry) -> Self {
        let flags = registry
            .iter()
            .map(|(_, def)| {
                let mut bits = 0;
                if def.liquid {
                    bits |= LIQUID;
                }
                if def.falls {
                    bits |= FALLS;
                }
                if def.indestructible {
                    bits |= BOUNDARY;
                }
                bits
            })
            .collect();

        let always_carveable = ALWAYS_CARVEABLE
            .iter()
            .filter_map(|name| registry.lookup_by_name(name))
            .collect();

        Self {
            flags,
            always_carveable,
        }
    }

    #[inline]
    fn has(&self, id: VoxelTypeId, flag: u8) -> bool {
        self.flags
            .get(id.0 as usize)
            .is_some_and(|bits| bits & flag != 0)
    }

    /// `true` for liquids, which block carving nearby.
    #[inline]
    pub fn is_liquid(&self, id: VoxelTypeId) -> bool {
        self.has(id, LIQUID)
    }

    /// `true` for gravity-affected materials.
    #[inline]
    pub fn can_fall(&self, id: VoxelTypeId) -> bool {
        self.has(id, FALLS)
    }

    /// `true` for indestructible boundary materials such as bedrock.
    #[inline]
    pub fn is_boundary(&self, id: VoxelTypeId) -> bool {
        self.has(id, BOUNDARY)
    }

    /// Decides whether `material` may be replaced with air.
    ///
    /// First match wins: biome stone; then gravity-affected material, carved only
    /// when no liquid rests on it; then biome ground, biome surface, and the fixed
    /// allow-list. Everything else (bedrock, liquids, placed blocks) is kept.
    pub fn is_carveable(
        &self,
        material: VoxelTypeId,
        above: VoxelTypeId,
        biome: &BiomeMaterials,
    ) -> bool {
        if material == biome.stone {
            return true;
        }
        if self.can_fall(material) {
            return !self.is_liquid(above);
        }
        material == biome.ground
            || material == biome.surface
            || self.always_carveable.contains(&material)
    }
}
